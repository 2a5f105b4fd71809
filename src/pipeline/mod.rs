//! Parallel generation orchestration.
//!
//! The illustration and narration branches depend only on the generated
//! story text, so they run concurrently on a small worker pool. The
//! line-art conversion depends on the color illustration and runs after the
//! join; persistence closes out the job. A failed branch never cancels its
//! sibling — partial results are reported as such.

use crate::cache::ContentCache;
use crate::providers::{SpeechProvider, Voice};
use crate::stages::{convert_to_line_art, synthesize_narration, Illustrator};
use crate::storage::{ArtifactStore, ImageVariant, NewStory, StoryId, StoryRepository};
use crate::{Error, Result};
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

const WORKER_POOL_SIZE: usize = 3;

/// Semantic inputs for one generation job. Owned by the orchestrator call
/// that created it; never shared across requests.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub user_id: i64,
    pub username: String,
    pub theme: String,
    /// The already-generated story text both branches consume.
    pub story_text: String,
    pub voice: Voice,
    /// Text to narrate (usually the story, sometimes a condensed version).
    pub voice_content: String,
    pub speed: f32,
}

// Keyed results of the two independent branches, joined by name rather than
// by comparing task handles.
struct BranchResults {
    image: Result<PathBuf>,
    voice: Result<Bytes>,
}

/// Final artifacts of a completed job.
///
/// `bw_image` and `audio` are optional: the job distinguishes partial
/// success (color image present, audio or line art absent) from failure
/// (no usable image at all).
#[derive(Debug)]
pub struct StoryArtifacts {
    pub story_id: StoryId,
    pub color_image: String,
    pub bw_image: Option<String>,
    pub audio: Option<Bytes>,
}

/// Fans a job's independent stages out over a bounded worker pool, joins
/// them, then runs conversion and persistence.
pub struct Orchestrator {
    cache: Arc<ContentCache>,
    illustrator: Arc<Illustrator>,
    speech: Arc<dyn SpeechProvider>,
    store: ArtifactStore,
    repository: Arc<dyn StoryRepository>,
    workers: Arc<Semaphore>,
}

impl Orchestrator {
    pub fn new(
        cache: Arc<ContentCache>,
        illustrator: Illustrator,
        speech: Arc<dyn SpeechProvider>,
        store: ArtifactStore,
        repository: Arc<dyn StoryRepository>,
    ) -> Self {
        Self {
            cache,
            illustrator: Arc::new(illustrator),
            speech,
            store,
            repository,
            workers: Arc::new(Semaphore::new(WORKER_POOL_SIZE)),
        }
    }

    /// Runs one job end to end.
    ///
    /// The image branch is mandatory: its failure fails the job. The voice
    /// branch is optional: its failure is recorded and the job continues
    /// without audio.
    pub async fn run(&self, request: GenerationRequest) -> Result<StoryArtifacts> {
        let branches = self.run_branches(&request).await;

        let color_local = match branches.image {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "illustration branch failed, generation incomplete");
                return Err(e);
            }
        };
        let audio = match branches.voice {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(error = %e, "narration branch failed, continuing without audio");
                None
            }
        };

        // Line art depends on the color image, so it runs after the join.
        let bw_local = match convert_to_line_art(&self.cache, &color_local) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "line-art conversion failed, continuing without it");
                None
            }
        };

        let color_saved = match self
            .store
            .save(
                &request.username,
                ImageVariant::Color,
                &color_local.to_string_lossy(),
            )
            .await
        {
            Ok(saved) => saved,
            Err(e) => {
                error!(error = %e, "failed to persist color illustration");
                return Err(e);
            }
        };
        let bw_saved = match &bw_local {
            Some(path) => match self
                .store
                .save(&request.username, ImageVariant::Bw, &path.to_string_lossy())
                .await
            {
                Ok(saved) => Some(saved),
                Err(e) => {
                    warn!(error = %e, "failed to persist line art");
                    None
                }
            },
            None => None,
        };

        let story_id = match self
            .repository
            .persist(NewStory {
                user_id: request.user_id,
                theme: request.theme.clone(),
                voice: request.voice,
                content: request.story_text.clone(),
                voice_content: request.voice_content.clone(),
                image: color_saved.location.clone(),
                bw_image: bw_saved.as_ref().map(|s| s.location.clone()),
            })
            .await
        {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "failed to persist story record");
                return Err(e);
            }
        };

        info!(
            story_id,
            has_audio = audio.is_some(),
            has_bw = bw_saved.is_some(),
            "generation job complete"
        );
        Ok(StoryArtifacts {
            story_id,
            color_image: color_saved.location,
            bw_image: bw_saved.map(|s| s.location),
            audio,
        })
    }

    async fn run_branches(&self, request: &GenerationRequest) -> BranchResults {
        let image_task = {
            let illustrator = Arc::clone(&self.illustrator);
            let cache = Arc::clone(&self.cache);
            let workers = Arc::clone(&self.workers);
            let story = request.story_text.clone();
            tokio::spawn(async move {
                let _permit = workers.acquire_owned().await.expect("worker pool closed");
                illustrator.generate(&cache, &story).await
            })
        };
        let voice_task = {
            let speech = Arc::clone(&self.speech);
            let workers = Arc::clone(&self.workers);
            let text = request.voice_content.clone();
            let voice = request.voice;
            let speed = request.speed;
            tokio::spawn(async move {
                let _permit = workers.acquire_owned().await.expect("worker pool closed");
                synthesize_narration(speech.as_ref(), &text, voice, speed).await
            })
        };

        // Join both in either order; neither branch cancels the other.
        let (image, voice) = futures::future::join(image_task, voice_task).await;
        BranchResults {
            image: flatten_branch("illustration", image),
            voice: flatten_branch("narration", voice),
        }
    }
}

fn flatten_branch<T>(
    branch: &str,
    joined: std::result::Result<Result<T>, tokio::task::JoinError>,
) -> Result<T> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(Error::provider(format!("{} branch panicked: {}", branch, e))),
    }
}
