pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod sanitize;
pub mod service;
pub mod storage;
pub mod types;
pub mod validation;

pub use config::{Config, Environment};
pub use error::{Error, Result};
