//! HTTP API handlers for reading-ai

pub mod book;
pub mod cards;
pub mod health;

pub use book::book_routes;
pub use cards::card_routes;
pub use health::health_routes;
