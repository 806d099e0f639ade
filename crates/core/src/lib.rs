//! Core types and shared functionality for interscribe.
//!
//! This crate provides:
//! - Filter file parsing into a rotation pool
//! - Round-robin cursor with a persisted restart index
//! - File-backed cache materialization with TTL expiry
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod render;
pub mod request;
pub mod rotation;
pub mod service;

pub use cache::{CacheMaterializer, CacheResult, KeepPolicy, SkipReason};
pub use config::{ConfigError, InterscribeConfig};
pub use document::{DocumentRef, QualitySignal};
pub use error::Error;
pub use filter::{AcceptanceRule, RotationPool};
pub use rotation::{RestartFile, RotationCursor};
pub use service::{Interscriber, ProcessOutcome, ServeLocation, Status};
