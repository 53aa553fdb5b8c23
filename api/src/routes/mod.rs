pub mod advisory;
pub mod health;
