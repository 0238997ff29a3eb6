pub mod advertisements;
pub mod health;
pub mod products;
pub mod temp_uploads;
