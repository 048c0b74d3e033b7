pub mod admin_controller;
pub mod chart_controller;
pub mod track_controller;
pub mod upload_controller;
pub mod winner_controller;
