#[cfg(feature = "server")]
pub mod config;

pub mod api;

#[cfg(feature = "server")]
pub mod error_convert;

#[cfg(feature = "server")]
pub mod health;

#[cfg(feature = "server")]
pub mod auth;

// Hosted backend access
#[cfg(feature = "server")]
pub mod backend;

#[cfg(feature = "server")]
pub mod gateway;

#[cfg(feature = "server")]
pub mod repo;

#[cfg(feature = "server")]
pub mod export;
