//! End-to-end orchestration tests with mock collaborators.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use taleforge::cache::ContentCache;
use taleforge::providers::{ImageProvider, SpeechProvider, TextProvider, Voice};
use taleforge::stages::Illustrator;
use taleforge::storage::{ArtifactStore, NewStory, StoryId, StoryRepository};
use taleforge::{Error, GenerationRequest, Orchestrator, Result};

struct FixedText(&'static str);

#[async_trait]
impl TextProvider for FixedText {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct PngImage;

#[async_trait]
impl ImageProvider for PngImage {
    async fn generate(&self, _prompt: &str, _size: &str) -> Result<Bytes> {
        Ok(test_png())
    }
}

struct FailingImage;

#[async_trait]
impl ImageProvider for FailingImage {
    async fn generate(&self, _prompt: &str, _size: &str) -> Result<Bytes> {
        Err(Error::provider("render farm on fire"))
    }
}

struct FixedSpeech;

#[async_trait]
impl SpeechProvider for FixedSpeech {
    async fn synthesize(&self, _text: &str, _voice: Voice, _speed: f32) -> Result<Bytes> {
        Ok(Bytes::from_static(b"mp3 frames"))
    }
}

struct FailingSpeech;

#[async_trait]
impl SpeechProvider for FailingSpeech {
    async fn synthesize(&self, _text: &str, _voice: Voice, _speed: f32) -> Result<Bytes> {
        Err(Error::provider_timeout("tts deadline expired"))
    }
}

#[derive(Default)]
struct RecordingRepository {
    next_id: AtomicI64,
    stories: Mutex<Vec<NewStory>>,
}

#[async_trait]
impl StoryRepository for RecordingRepository {
    async fn persist(&self, story: NewStory) -> Result<StoryId> {
        self.stories.lock().unwrap().push(story);
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

struct FailingRepository;

#[async_trait]
impl StoryRepository for FailingRepository {
    async fn persist(&self, _story: NewStory) -> Result<StoryId> {
        Err(Error::persistence("connection pool exhausted"))
    }
}

// A 64x64 image with a dark square so edge detection has work to do.
fn test_png() -> Bytes {
    let img = image::GrayImage::from_fn(64, 64, |x, y| {
        if (16..48).contains(&x) && (16..48).contains(&y) {
            image::Luma([30u8])
        } else {
            image::Luma([210u8])
        }
    });
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageOutputFormat::Png).unwrap();
    Bytes::from(buf.into_inner())
}

fn request() -> GenerationRequest {
    GenerationRequest {
        user_id: 7,
        username: "luna".to_string(),
        theme: "courage".to_string(),
        story_text: "Once upon a time, a fox learned to be brave.".to_string(),
        voice: Voice::Nova,
        voice_content: "Once upon a time, a fox learned to be brave.".to_string(),
        speed: 1.0,
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    orchestrator: Orchestrator,
    repository: Arc<RecordingRepository>,
}

fn harness(
    image: Arc<dyn ImageProvider>,
    speech: Arc<dyn SpeechProvider>,
) -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("taleforge=debug")
        .try_init();
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(ContentCache::open(dir.path().join("cache"), 100).unwrap());
    let illustrator = Illustrator::new(
        Arc::new(FixedText("a fox under a paper moon")),
        image,
        "512x512",
    );
    let store = ArtifactStore::local(dir.path().join("static"));
    let repository = Arc::new(RecordingRepository::default());
    let orchestrator = Orchestrator::new(cache, illustrator, speech, store, repository.clone());
    Harness {
        _dir: dir,
        orchestrator,
        repository,
    }
}

#[tokio::test]
async fn full_job_produces_all_artifacts() {
    let h = harness(Arc::new(PngImage), Arc::new(FixedSpeech));

    let artifacts = h.orchestrator.run(request()).await.unwrap();

    assert_eq!(artifacts.story_id, 1);
    assert!(artifacts.color_image.ends_with("luna_color_1.png"));
    assert!(Path::new(&artifacts.color_image).exists());
    let bw = artifacts.bw_image.expect("line art should be produced");
    assert!(bw.ends_with("luna_bw_1.png"));
    assert!(Path::new(&bw).exists());
    assert_eq!(artifacts.audio.unwrap(), Bytes::from_static(b"mp3 frames"));

    let stories = h.repository.stories.lock().unwrap();
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].user_id, 7);
    assert_eq!(stories[0].theme, "courage");
    assert!(stories[0].bw_image.is_some());
}

#[tokio::test]
async fn voice_failure_yields_partial_success() {
    let h = harness(Arc::new(PngImage), Arc::new(FailingSpeech));

    let artifacts = h.orchestrator.run(request()).await.unwrap();

    // The sibling branch ran to completion; only audio is marked absent.
    assert!(artifacts.audio.is_none());
    assert!(Path::new(&artifacts.color_image).exists());
    assert_eq!(h.repository.stories.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn image_failure_fails_the_job() {
    let h = harness(Arc::new(FailingImage), Arc::new(FixedSpeech));

    let err = h.orchestrator.run(request()).await.unwrap_err();
    assert!(err.is_provider());
    // Nothing was persisted for an incomplete generation.
    assert!(h.repository.stories.lock().unwrap().is_empty());
}

#[tokio::test]
async fn persistence_failure_surfaces_after_artifacts_are_saved() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(ContentCache::open(dir.path().join("cache"), 100).unwrap());
    let illustrator = Illustrator::new(
        Arc::new(FixedText("a fox under a paper moon")),
        Arc::new(PngImage),
        "512x512",
    );
    let store = ArtifactStore::local(dir.path().join("static"));
    let orchestrator = Orchestrator::new(
        cache.clone(),
        illustrator,
        Arc::new(FixedSpeech),
        store,
        Arc::new(FailingRepository),
    );

    let err = orchestrator.run(request()).await.unwrap_err();
    assert!(matches!(err, Error::Persistence(_)));
    // Cached artifacts outlive the failed persist and can serve a retry.
    assert!(!cache.is_empty());
}

#[tokio::test]
async fn second_run_reuses_cached_illustration() {
    let h = harness(Arc::new(PngImage), Arc::new(FixedSpeech));

    let first = h.orchestrator.run(request()).await.unwrap();
    let second = h.orchestrator.run(request()).await.unwrap();

    // Same cached illustration, distinct persisted copies.
    assert!(first.color_image.ends_with("luna_color_1.png"));
    assert!(second.color_image.ends_with("luna_color_2.png"));
    assert_eq!(
        std::fs::read(&first.color_image).unwrap(),
        std::fs::read(&second.color_image).unwrap()
    );
}
