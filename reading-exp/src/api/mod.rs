//! HTTP API handlers for reading-exp

pub mod auth;
pub mod experiences;
pub mod health;

pub use auth::ProvidedToken;
pub use experiences::experience_routes;
pub use health::health_routes;
