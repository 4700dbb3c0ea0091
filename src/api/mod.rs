//! HTTP surface: router, handlers and the error-to-status mapping.

pub mod error;
pub mod handlers;
pub mod models;
pub mod server;

pub use error::ApiError;
pub use server::{create_router, serve};
