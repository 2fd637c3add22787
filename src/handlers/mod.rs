pub mod auth;
pub mod health;
pub mod moods;
pub mod reading;
pub mod sport;
pub mod stats;
