pub mod gym;
pub mod models;
pub mod token;
