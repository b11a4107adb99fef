pub mod api;
pub mod config;
pub mod fetch;
pub mod flatten;
pub mod retry;
pub mod walk;
