pub mod bootstrap;
pub mod jwt;
pub mod password;
pub mod providers;
mod types;

pub use types::{Claims, TokenBundle};
