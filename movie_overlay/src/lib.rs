//! Movie overlay bookkeeping for the interactive-fiction renderer.
//!
//! A single movie plays on a reserved audio channel. The playback controller
//! queues it and decides, once per interaction, whether it is shown
//! fullscreen; movie displayables render it windowed through a cached
//! surface that is reallocated whenever the movie or the requested size
//! changes. Decoding and texture upload live behind the [`AudioChannels`] and
//! [`Renderer`] traits.

pub mod audio;
pub mod controller;
pub mod displayable;
pub mod recording;
pub mod render;
pub mod session;
pub mod settings;
pub mod state;
pub mod surface;
pub mod surface_cache;

pub use audio::{AudioChannels, MOVIE_CHANNEL};
pub use controller::{Looping, PlaybackController, Presentation, StartRequest, StopRequest};
pub use displayable::{DisplayProperties, HostEvent, MovieDisplayable, DEFAULT_MOVIE_FPS};
pub use render::{DisplayableId, Renderer};
pub use session::MovieSession;
pub use settings::{MovieSettings, SettingsError};
pub use state::{MovieHandle, PlaybackPhase, PlaybackState, Size, DEFAULT_MOVIE_SIZE};
pub use surface::{RenderNode, Surface, SurfaceId, TextureHandle};
