//! Client library for the gym tracker REST API: paginated list loading for
//! categories, exercises and meals, and a timed workout session that links
//! itself to a server-side workout plan.

pub mod clients;
pub mod config;
pub mod error;
pub mod services;

pub use error::{GymError, Result};
