//! Thin clients for the external AI collaborators.
//!
//! Each collaborator is a trait (so the pipeline runners can be driven
//! by mocks in tests) with one production implementation:
//!
//! - [`StoryGenerator`] / [`GeminiStoryboard`] -- script + image generation
//! - [`SpeechSynthesizer`] / [`ElevenLabsSpeech`] -- narration synthesis
//! - [`FrameAnimator`] / [`FalAnimator`] -- image-to-video animation
//! - [`MusicResolver`] / [`YtDlpResolver`] -- background-music download

pub mod animation;
pub mod error;
pub mod music;
pub mod speech;
pub mod storyboard;

pub use animation::{FalAnimator, FrameAnimator};
pub use error::ProviderError;
pub use music::{MusicResolver, YtDlpResolver};
pub use speech::{ElevenLabsSpeech, SpeechSynthesizer};
pub use storyboard::{GeminiStoryboard, GeneratedScene, StoryGenerator};
