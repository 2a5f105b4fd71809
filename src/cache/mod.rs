//! Content cache: the single point of truth consulted before any expensive
//! external generation call.
//!
//! Every `(content kind, semantic content)` pair maps to one canonical
//! artifact file under the cache root, named by a deterministic digest. The
//! index document lives alongside the artifacts and is flushed after every
//! mutation, so identical requests resolve to the same artifact across
//! process restarts.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ContentCache`] | File-backed cache with strict LRU eviction |
//! | [`ContentKey`] | Deterministic digest of kind + content |
//! | [`ContentKind`] | Artifact kind, determines the on-disk extension |
//! | [`CacheEntry`] | Per-artifact index metadata |
//! | [`StoreOutcome`] | Path plus an explicit "was it cached" flag |

mod index;
mod key;
mod store;

pub use index::CacheEntry;
pub use key::{image_prompt_tag, ContentKey, ContentKind};
pub use store::{ContentCache, StoreOutcome};
