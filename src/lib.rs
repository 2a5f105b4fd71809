//! # taleforge
//!
//! Content cache and generation-pipeline coordinator for an AI storybook
//! backend. The crate deduplicates expensive external calls (story text,
//! illustration, speech synthesis), bounds an on-disk artifact cache with LRU
//! eviction, and fans the independent generation branches of a job out across
//! a small worker pool before joining them for conversion and persistence.
//!
//! ## Overview
//!
//! A generation request enters the [`pipeline::Orchestrator`], which consults
//! the [`cache::ContentCache`] for every stage's content key. On a miss the
//! stage calls its external provider, writes the raw result through the
//! cache, and returns it. The orchestrator joins the parallel branches, runs
//! the dependent line-art conversion, persists the final artifacts through
//! the [`storage`] backend, and writes a story record through the repository
//! seam.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Content-keyed, file-backed cache with LRU eviction |
//! | [`providers`] | External collaborator seams (text, image, speech) |
//! | [`stages`] | Cache-wrapped generation stage functions |
//! | [`pipeline`] | Parallel orchestration of a generation job |
//! | [`storage`] | Artifact persistence (local fs / object store) and the record seam |
//! | [`config`] | Engine configuration |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taleforge::cache::ContentCache;
//! use taleforge::config::EngineConfig;
//!
//! # fn main() -> taleforge::Result<()> {
//! let config = EngineConfig::from_env();
//! let cache = Arc::new(ContentCache::open(
//!     &config.cache_dir,
//!     config.max_cache_size,
//! )?);
//! // Wire providers, an artifact store and a repository into
//! // `pipeline::Orchestrator::new(...)` and call `run(request)`.
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod pipeline;
pub mod providers;
pub mod stages;
pub mod storage;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;

// Re-export main types for convenience
pub use cache::{ContentCache, ContentKind, StoreOutcome};
pub use config::EngineConfig;
pub use pipeline::{GenerationRequest, Orchestrator, StoryArtifacts};
pub use providers::Voice;
