pub mod track;
pub mod upload_token;
pub mod winner;

pub mod pagination;
