pub mod admin_routes;
pub mod chart_routes;
pub mod track_routes;
pub mod winner_routes;
