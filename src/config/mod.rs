//! # Configuration
//!
//! Process configuration loaded from environment variables.

mod notifier;

pub use notifier::NotifierConfig;
