pub mod auth;
pub mod health;
pub mod profile;
mod router;

pub use router::router;
