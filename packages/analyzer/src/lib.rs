//! # Keyprobe Analyzer
//!
//! Security rules for JSON Web Keys and the manager that runs them.
//!
//! ## Features
//!
//! - **Rule registry**: ordered, duplicate-free, frozen once shared
//! - **Built-in rules**: key size, algorithm safety, curve safety, usage and identifier hygiene
//! - **Isolation**: a failing or panicking rule becomes a critical message, analysis goes on
//! - **Configuration**: thresholds and rule selection through `AnalyzerConfig`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keyprobe_analyzer::{AnalyzerConfig, AnalyzerManager, KeyRecord};
//!
//! let manager = AnalyzerManager::with_default_rules(&AnalyzerConfig::default())?;
//! let key = KeyRecord::from_json(r#"{"kty":"oct","k":"AAAA"}"#)?;
//! for message in manager.analyze(&key) {
//!     println!("{message}");
//! }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod message;
pub mod rules;

pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, AnalyzerResult};
pub use keyprobe_jwk::KeyRecord;
pub use manager::AnalyzerManager;
pub use message::{DiagnosticMessage, MessageKind, Severity};
pub use rules::AnalyzerRule;
