//! Story record persistence seam.

use crate::providers::Voice;
use crate::Result;
use async_trait::async_trait;

/// Identifier of a persisted story record.
pub type StoryId = i64;

/// Fields for a new story record.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub user_id: i64,
    pub theme: String,
    pub voice: Voice,
    pub content: String,
    pub voice_content: String,
    /// Location of the color illustration (local path or URL).
    pub image: String,
    /// Location of the line-art variant, when one was produced.
    pub bw_image: Option<String>,
}

/// Database collaborator owning the story table.
///
/// Implementations open and close their own session per call, on both the
/// success and the failure path. Cached artifacts referenced by a failed
/// persist are never rolled back; a retry may reuse them.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    async fn persist(&self, story: NewStory) -> Result<StoryId>;
}
