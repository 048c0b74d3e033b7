use surrealdb::sql::Thing;

/// Accepts both bare ids and "table:id" forms, returning the id part.
pub fn parse_id_part(id: &str) -> &str {
    if let Some(id_part) = id.split(':').nth(1) {
        id_part
    } else {
        id
    }
}

pub fn create_track_thing(track_id: &str) -> Thing {
    let clean_id = parse_id_part(track_id);
    Thing::from(("track".to_string(), clean_id.to_string()))
}

pub fn create_token_thing(token_id: &str) -> Thing {
    let clean_id = parse_id_part(token_id);
    Thing::from(("upload_token".to_string(), clean_id.to_string()))
}
