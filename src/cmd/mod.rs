pub mod browse;
pub mod show;
pub mod summary;
