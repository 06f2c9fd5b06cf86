pub mod endpoints;
pub mod health;
