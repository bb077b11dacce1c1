pub mod addresses;
pub mod contacts;
pub mod health;
