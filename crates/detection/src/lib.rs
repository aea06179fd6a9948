#![doc = include_str!("../README.md")]

pub mod alert;
pub mod config;
pub mod error;
pub mod ingest;
pub mod normalizer;
pub mod rule;

pub use config::{DetectionConfig, DetectionConfigBuilder};
pub use error::DetectionError;
pub use ingest::{IngestReceipt, IngestService, MemoryStore};
pub use normalizer::LogNormalizer;
pub use rule::{DetectionRule, RuleEngine, RuleLoader, RuleSet};
