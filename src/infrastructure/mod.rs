//! Infrastructure layer - External service implementations

pub mod cache;
pub mod logging;
pub mod persistence;
pub mod services;
pub mod wikipedia;
