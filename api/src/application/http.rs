pub mod health;
pub mod kitchen;
pub mod server;
