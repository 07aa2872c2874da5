//! Session lifecycle management

mod controller;
mod version;

pub use controller::{LoadedSettings, Services, SessionController, RELOGIN_NOTICE};
pub use version::{ensure_compatible, major};
