//! Configuration management for Skitter.
//!
//! Provides XDG-compliant settings storage; see [`Settings`].

mod settings;

pub use settings::Settings;
