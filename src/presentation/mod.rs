// Presentation layer - HTTP surface for the render sink
pub mod app_state;
pub mod handlers;
pub mod routes;
