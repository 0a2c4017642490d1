// src/lib.rs

pub mod config;
pub mod error;
pub mod grader;
pub mod handlers;
pub mod importer;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

// Re-export specific items for convenience if needed
pub use routes::create_router;
