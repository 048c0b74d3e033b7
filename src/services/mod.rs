pub mod admission_service;
pub mod blob_service;
pub mod chart_service;
pub mod email_service;
pub mod rating_service;
pub mod token_service;
pub mod track_service;
pub mod upload_service;
pub mod winner_service;
