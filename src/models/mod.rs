pub mod mood;
pub mod reading;
pub mod sport;
pub mod user;
