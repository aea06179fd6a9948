#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use config::SocShieldConfig;
pub use error::{ConfigError, NormalizeError, RuleError, SocShieldError, StorageError};
pub use pipeline::{Detector, EventStore, Normalizer};
pub use types::{AlertRecord, ParsedEvent, RawLog};
