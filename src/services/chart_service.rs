use serde::Deserialize;
use surrealdb::{engine::any::Any, Surreal};

use crate::error::Result;
use crate::models::pagination::{ChartsQuery, PaginatedResponse, PaginationInfo};
use crate::models::track::TrackSummary;

#[derive(Deserialize)]
struct CountRow {
    total: u64,
}

pub struct ChartService;

impl ChartService {
    /// Public chart feed. Ordering is rating-centric and total: highest
    /// average rating first, ties broken by newest `created_at`, then by id
    /// ascending so equal rows always page out in the same order. Only
    /// approved tracks are listed; an offset past the end is an empty page,
    /// not an error.
    pub async fn list_charts(
        db: &Surreal<Any>,
        query: &ChartsQuery,
    ) -> Result<PaginatedResponse<TrackSummary>> {
        let offset = query.offset();
        let limit = query.limit();
        let genre = query.genre_filter();

        let page_sql = if genre.is_some() {
            "SELECT * FROM track \
                WHERE approved = true AND genre = $genre \
                ORDER BY average_rating DESC, created_at DESC, id ASC \
                LIMIT $limit START $offset;"
        } else {
            "SELECT * FROM track \
                WHERE approved = true \
                ORDER BY average_rating DESC, created_at DESC, id ASC \
                LIMIT $limit START $offset;"
        };

        let mut page_query = db
            .query(page_sql)
            .bind(("limit", limit))
            .bind(("offset", offset));
        if let Some(genre) = genre.clone() {
            page_query = page_query.bind(("genre", genre));
        }
        let mut response = page_query.await?;
        let tracks: Vec<TrackSummary> = response.take(0)?;

        let count_sql = if genre.is_some() {
            "SELECT count() AS total FROM track \
                WHERE approved = true AND genre = $genre GROUP ALL;"
        } else {
            "SELECT count() AS total FROM track WHERE approved = true GROUP ALL;"
        };

        let mut count_query = db.query(count_sql);
        if let Some(genre) = genre {
            count_query = count_query.bind(("genre", genre));
        }
        let mut count_response = count_query.await?;
        let count_row: Option<CountRow> = count_response.take(0)?;
        let total_items = count_row.map(|row| row.total).unwrap_or(0);

        let has_more = offset + tracks.len() as u64 < total_items;

        Ok(PaginatedResponse {
            data: tracks,
            pagination: PaginationInfo {
                offset,
                limit,
                total_items,
                has_more,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pagination::MAX_PAGE_SIZE;
    use crate::models::track::Track;
    use chrono::{TimeZone, Utc};
    use surrealdb::engine::any::connect;
    use surrealdb::sql::Datetime;

    async fn seed_track(
        db: &Surreal<Any>,
        title: &str,
        genre: &str,
        approved: bool,
        average_rating: f64,
        vote_count: u64,
        day: u32,
    ) {
        let _: Option<Track> = db
            .create("track")
            .content(Track {
                id: None,
                artist: "Seed Artist".to_string(),
                title: title.to_string(),
                genre: genre.to_string(),
                audio_url: format!("http://localhost:8080/media/audio/{title}.mp3"),
                preview_url: None,
                artwork_url: "http://localhost:8080/media/defaults/artwork.png".to_string(),
                owner_email: "seed@example.com".to_string(),
                allow_download: true,
                approved,
                play_count: 0,
                vote_count,
                average_rating,
                created_at: Datetime::from(Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap()),
            })
            .await
            .unwrap();
    }

    async fn setup_db() -> Surreal<Any> {
        let db = connect("mem://").await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();

        seed_track(&db, "House A", "house", true, 9.5, 12, 1).await;
        seed_track(&db, "House B", "house", true, 8.0, 4, 2).await;
        seed_track(&db, "House C", "house", true, 7.5, 9, 3).await;
        seed_track(&db, "House D", "house", true, 6.0, 2, 4).await;
        seed_track(&db, "House E", "house", true, 2.5, 1, 5).await;
        seed_track(&db, "Hidden House", "house", false, 10.0, 50, 6).await;
        seed_track(&db, "Techno A", "techno", true, 9.0, 7, 7).await;
        seed_track(&db, "Techno B", "techno", true, 5.0, 3, 8).await;

        db
    }

    fn titles(page: &PaginatedResponse<TrackSummary>) -> Vec<String> {
        page.data.iter().map(|t| t.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_genre_pages_are_ordered_and_complete() {
        let db = setup_db().await;

        let first = ChartService::list_charts(
            &db,
            &ChartsQuery {
                genre: Some("house".to_string()),
                offset: Some(0),
                limit: Some(2),
            },
        )
        .await
        .unwrap();
        assert_eq!(titles(&first), vec!["House A", "House B"]);
        assert_eq!(first.pagination.total_items, 5);
        assert!(first.pagination.has_more);

        let last = ChartService::list_charts(
            &db,
            &ChartsQuery {
                genre: Some("house".to_string()),
                offset: Some(4),
                limit: Some(2),
            },
        )
        .await
        .unwrap();
        assert_eq!(titles(&last), vec!["House E"]);
        assert!(!last.pagination.has_more);
    }

    #[tokio::test]
    async fn test_unapproved_tracks_never_list() {
        let db = setup_db().await;

        let page = ChartService::list_charts(&db, &ChartsQuery::default()).await.unwrap();
        assert_eq!(page.pagination.total_items, 7);
        assert!(!titles(&page).contains(&"Hidden House".to_string()));
    }

    #[tokio::test]
    async fn test_all_sentinel_disables_filter() {
        let db = setup_db().await;

        let page = ChartService::list_charts(
            &db,
            &ChartsQuery {
                genre: Some("all".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.data.len(), 7);
        // Rating-centric ordering across genres.
        assert_eq!(titles(&page)[0], "House A");
        assert_eq!(titles(&page)[1], "Techno A");
    }

    #[tokio::test]
    async fn test_offset_past_end_is_empty_not_error() {
        let db = setup_db().await;

        let page = ChartService::list_charts(
            &db,
            &ChartsQuery {
                genre: Some("house".to_string()),
                offset: Some(40),
                limit: Some(10),
            },
        )
        .await
        .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_items, 5);
    }

    #[tokio::test]
    async fn test_oversized_limit_is_clamped() {
        let db = setup_db().await;

        let page = ChartService::list_charts(
            &db,
            &ChartsQuery {
                limit: Some(10_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.limit, MAX_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_page_union_reproduces_full_set_once() {
        let db = setup_db().await;

        let full = ChartService::list_charts(&db, &ChartsQuery::default()).await.unwrap();
        let expected = titles(&full);

        let mut collected = Vec::new();
        let mut offset = 0;
        loop {
            let page = ChartService::list_charts(
                &db,
                &ChartsQuery {
                    genre: None,
                    offset: Some(offset),
                    limit: Some(3),
                },
            )
            .await
            .unwrap();
            if page.data.is_empty() {
                break;
            }
            collected.extend(titles(&page));
            offset += 3;
        }

        assert_eq!(collected, expected, "pages must union to the full ordered set");
    }

    #[tokio::test]
    async fn test_rating_ties_break_newest_first() {
        let db = connect("mem://").await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();

        seed_track(&db, "Older", "house", true, 7.0, 3, 1).await;
        seed_track(&db, "Newer", "house", true, 7.0, 3, 20).await;

        let page = ChartService::list_charts(&db, &ChartsQuery::default()).await.unwrap();
        assert_eq!(titles(&page), vec!["Newer", "Older"]);
    }
}
