//! Generation stages, each wrapped with cache-first semantics.
//!
//! A stage computes a content key from its semantic input, consults the
//! [`crate::cache::ContentCache`], and only calls its external provider on a
//! miss, writing the raw result back through the cache.
//!
//! | Stage | Cached | Key |
//! |-------|--------|-----|
//! | [`StoryGenerator`] | disk + 50-entry process memo | `{name}_{theme}` |
//! | prompt derivation | no (cheap) | — |
//! | [`Illustrator`] | disk | bounded tag of the derived prompt |
//! | [`convert_to_line_art`] | disk | `bw_{basename}` |
//! | [`synthesize_narration`] | no (voice/speed space too wide) | — |

mod image;
mod monochrome;
mod text;
mod voice;

pub use image::{derive_image_prompt, Illustrator};
pub use monochrome::{convert_to_line_art, render_line_art};
pub use text::StoryGenerator;
pub use voice::{audio_to_base64, synthesize_narration};
