//! Movie surface bookkeeping.
//!
//! The cached surface is keyed by the identity playing on the movie channel
//! and by the requested size. Frame contents are written by the decode path;
//! this module only keeps a correctly sized, fully initialised buffer around
//! and asks the renderer for a texture over it.

use anyhow::Result;

use crate::audio::AudioChannels;
use crate::render::Renderer;
use crate::state::{PlaybackState, Size};
use crate::surface::TextureHandle;

/// Returns a texture of exactly `size` for the movie playing on `channel`,
/// or `None` when the channel is idle.
pub fn movie_texture<A, R>(
    state: &mut PlaybackState,
    audio: &A,
    renderer: &R,
    channel: &str,
    size: Size,
) -> Result<Option<TextureHandle>>
where
    A: AudioChannels + ?Sized,
    R: Renderer + ?Sized,
{
    let playing = audio.playing(channel);

    if !state.surface_matches(size, playing.as_ref()) {
        let surface = state.reallocate_surface(size, playing.clone());
        log::debug!(
            "[movie_overlay] allocated {} ({}) for {}",
            surface.id(),
            size,
            playing
                .as_ref()
                .map(|movie| movie.name())
                .unwrap_or("<idle>")
        );
    }

    if playing.is_none() {
        return Ok(None);
    }

    let Some(surface) = state.surface() else {
        return Ok(None);
    };
    renderer.mutated_surface(surface);
    let texture = renderer.load_texture(surface)?;
    Ok(Some(texture))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MOVIE_CHANNEL;
    use crate::recording::{RecordingAudio, RecordingRenderer, RenderEvent};
    use crate::surface::OPAQUE_BLACK;

    fn texture(
        state: &mut PlaybackState,
        audio: &RecordingAudio,
        renderer: &RecordingRenderer,
        size: Size,
    ) -> Result<Option<TextureHandle>> {
        movie_texture(state, audio, renderer, MOVIE_CHANNEL, size)
    }

    #[test]
    fn same_size_and_movie_reuses_surface() -> Result<()> {
        let audio = RecordingAudio::new();
        let renderer = RecordingRenderer::new();
        let mut state = PlaybackState::default();
        audio.play(MOVIE_CHANNEL, &["intro.ogv".into()], true)?;

        let first = texture(&mut state, &audio, &renderer, Size::new(800, 600))?
            .expect("texture while playing");
        let second = texture(&mut state, &audio, &renderer, Size::new(800, 600))?
            .expect("texture while playing");

        assert_eq!(first.surface, second.surface);
        assert_eq!(first.size, Size::new(800, 600));
        assert_eq!(state.surface_key().map(|key| key.name()), Some("intro.ogv"));

        let mutations = renderer
            .events()
            .iter()
            .filter(|event| matches!(event, RenderEvent::MutatedSurface { .. }))
            .count();
        assert_eq!(mutations, 2);
        Ok(())
    }

    #[test]
    fn size_change_reallocates_black_surface() -> Result<()> {
        let audio = RecordingAudio::new();
        let renderer = RecordingRenderer::new();
        let mut state = PlaybackState::default();
        audio.play(MOVIE_CHANNEL, &["intro.ogv".into()], false)?;

        let first = texture(&mut state, &audio, &renderer, Size::new(16, 9))?
            .expect("texture while playing");
        let second = texture(&mut state, &audio, &renderer, Size::new(32, 18))?
            .expect("texture while playing");

        assert_ne!(first.surface, second.surface);
        assert_eq!(second.size, Size::new(32, 18));
        let surface = state.surface().expect("surface cached");
        assert_eq!(surface.size(), Size::new(32, 18));
        assert!(surface.pixels().pixels().all(|pixel| *pixel == OPAQUE_BLACK));
        Ok(())
    }

    #[test]
    fn movie_change_reallocates_surface() -> Result<()> {
        let audio = RecordingAudio::new();
        let renderer = RecordingRenderer::new();
        let mut state = PlaybackState::default();

        audio.play(MOVIE_CHANNEL, &["a.ogv".into()], false)?;
        let first = texture(&mut state, &audio, &renderer, Size::new(8, 8))?
            .expect("texture while playing");

        audio.play(MOVIE_CHANNEL, &["b.ogv".into()], false)?;
        let second = texture(&mut state, &audio, &renderer, Size::new(8, 8))?
            .expect("texture while playing");

        assert_ne!(first.surface, second.surface);
        assert_eq!(state.surface_key().map(|key| key.name()), Some("b.ogv"));
        Ok(())
    }

    #[test]
    fn idle_channel_returns_none_without_touching_renderer() -> Result<()> {
        let audio = RecordingAudio::new();
        let renderer = RecordingRenderer::new();
        let mut state = PlaybackState::default();

        assert!(texture(&mut state, &audio, &renderer, Size::new(8, 8))?.is_none());
        assert!(renderer.events().is_empty());
        // The placeholder buffer stays until a mismatch or mode check frees it.
        assert!(state.surface().is_some());
        assert!(state.surface_key().is_none());
        Ok(())
    }

    #[test]
    fn surface_from_idle_period_is_replaced_once_playback_starts() -> Result<()> {
        let audio = RecordingAudio::new();
        let renderer = RecordingRenderer::new();
        let mut state = PlaybackState::default();

        texture(&mut state, &audio, &renderer, Size::new(8, 8))?;
        let idle_surface = state.surface().map(|surface| surface.id());

        audio.play(MOVIE_CHANNEL, &["intro.ogv".into()], false)?;
        let tex = texture(&mut state, &audio, &renderer, Size::new(8, 8))?
            .expect("texture while playing");
        assert_ne!(Some(tex.surface), idle_surface);
        Ok(())
    }
}
