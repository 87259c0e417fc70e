use anyhow::Result;

use crate::audio::AudioChannels;
use crate::controller::PlaybackController;
use crate::render::Renderer;
use crate::settings::MovieSettings;
use crate::state::{PlaybackState, Size};
use crate::surface::TextureHandle;
use crate::surface_cache::movie_texture;

/// Per-engine-session movie context: playback state plus the collaborators
/// it talks to.
#[derive(Debug)]
pub struct MovieSession<A, R> {
    state: PlaybackState,
    audio: A,
    renderer: R,
    settings: MovieSettings,
}

impl<A: AudioChannels, R: Renderer> MovieSession<A, R> {
    pub fn new(audio: A, renderer: R, settings: MovieSettings) -> Self {
        Self {
            state: PlaybackState::new(settings.default_size),
            audio,
            renderer,
            settings,
        }
    }

    pub fn controller(&mut self) -> PlaybackController<'_, A> {
        PlaybackController::new(&mut self.state, &self.audio, &self.settings)
    }

    /// Texture for the movie channel at `size`; see [`movie_texture`].
    pub fn movie_texture(&mut self, size: Size) -> Result<Option<TextureHandle>> {
        movie_texture(
            &mut self.state,
            &self.audio,
            &self.renderer,
            &self.settings.channel,
            size,
        )
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn settings(&self) -> &MovieSettings {
        &self.settings
    }
}
