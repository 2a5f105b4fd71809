//! Artifact persistence and the story-record seam.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ArtifactStore`] | Saves generated images locally or to an object store, with per-artifact fallback |
//! | [`ObjectStore`] | Remote object-storage collaborator (S3-compatible) |
//! | [`HttpObjectStore`] | PUT-based default implementation |
//! | [`StoryRepository`] | Database collaborator owning the story table |

mod artifacts;
mod object;
mod repository;

pub use artifacts::{ArtifactStore, ImageVariant, SavedArtifact};
pub use object::{HttpObjectStore, ObjectStore};
pub use repository::{NewStory, StoryId, StoryRepository};
