pub mod media;
pub mod pagination;
pub mod sources;
pub mod summary;
pub mod training;
pub mod workout_session;
