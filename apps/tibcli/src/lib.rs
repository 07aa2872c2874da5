//! tibcli library
//!
//! The session core and its collaborators, exposed for the binary and for
//! integration tests.

pub mod api;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod models;
pub mod output;
pub mod session;
