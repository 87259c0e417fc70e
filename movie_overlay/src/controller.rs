use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::audio::AudioChannels;
use crate::settings::MovieSettings;
use crate::state::{MovieHandle, PlaybackPhase, PlaybackState, Size};

/// How a movie should be presented once it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    Fullscreen,
    Windowed,
}

/// Number of times a movie is played back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "plays", rename_all = "snake_case")]
pub enum Looping {
    Forever,
    Plays(u32),
}

impl Looping {
    /// Maps a loop count onto a play count: `-1` loops forever, `n >= 0`
    /// plays `n + 1` times. Anything below `-1` plays nothing.
    pub fn from_loop_count(loops: i32) -> Self {
        match loops {
            -1 => Looping::Forever,
            n if n >= 0 => Looping::Plays(n as u32 + 1),
            _ => Looping::Plays(0),
        }
    }

    fn playlist(self, movie: &MovieHandle) -> (Vec<MovieHandle>, bool) {
        match self {
            Looping::Forever => (vec![movie.clone()], true),
            Looping::Plays(count) => (vec![movie.clone(); count as usize], false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub movie: MovieHandle,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub loops: i32,
    #[serde(default)]
    pub presentation: Option<Presentation>,
}

impl StartRequest {
    pub fn new(movie: impl Into<MovieHandle>) -> Self {
        Self {
            movie: movie.into(),
            size: None,
            loops: 0,
            presentation: None,
        }
    }

    /// Cutscene-style start that takes over the whole screen.
    pub fn fullscreen(movie: impl Into<MovieHandle>) -> Self {
        Self::new(movie).presentation(Presentation::Fullscreen)
    }

    /// Start intended for a windowed movie displayable.
    pub fn displayable(movie: impl Into<MovieHandle>) -> Self {
        Self::new(movie).presentation(Presentation::Windowed)
    }

    pub fn size(mut self, size: impl Into<Size>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn loops(mut self, loops: i32) -> Self {
        self.loops = loops;
        self
    }

    pub fn presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = Some(presentation);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopRequest {
    /// Accepted for call-site compatibility; the channel stop always clears
    /// its queue.
    pub clear_audio: bool,
    /// Only stop when the current movie is fullscreen.
    pub only_if_fullscreen: bool,
}

impl Default for StopRequest {
    fn default() -> Self {
        Self {
            clear_audio: true,
            only_if_fullscreen: false,
        }
    }
}

impl StopRequest {
    pub fn fullscreen_only() -> Self {
        Self {
            only_if_fullscreen: true,
            ..Self::default()
        }
    }
}

/// Couples the playback state with the audio subsystem for start/stop and
/// fullscreen arbitration.
pub struct PlaybackController<'a, A: AudioChannels + ?Sized> {
    state: &'a mut PlaybackState,
    audio: &'a A,
    settings: &'a MovieSettings,
}

impl<'a, A: AudioChannels + ?Sized> PlaybackController<'a, A> {
    pub fn new(state: &'a mut PlaybackState, audio: &'a A, settings: &'a MovieSettings) -> Self {
        Self {
            state,
            audio,
            settings,
        }
    }

    fn channel(&self) -> &str {
        &self.settings.channel
    }

    /// Stops the movie channel. Returns whether a stop was issued.
    pub fn stop(&mut self, request: StopRequest) -> Result<bool> {
        if request.only_if_fullscreen && !self.state.is_fullscreen() {
            log::debug!("[movie_overlay] stop skipped: movie is not fullscreen");
            return Ok(false);
        }
        log::debug!(
            "[movie_overlay] stop channel={} clear_audio={}",
            self.channel(),
            request.clear_audio
        );
        self.audio.stop(self.channel())?;
        Ok(true)
    }

    /// Queues `request.movie` on the movie channel. Returns whether a play
    /// request was issued.
    pub fn start(&mut self, request: StartRequest) -> Result<bool> {
        if self.settings.less_updates {
            log::debug!(
                "[movie_overlay] start {} ignored in reduced-update mode",
                request.movie
            );
            return Ok(false);
        }

        if let Some(size) = request.size {
            self.state.set_default_size(size);
        }

        let looping = Looping::from_loop_count(request.loops);
        if looping == Looping::Plays(0) {
            log::warn!(
                "[movie_overlay] loop count {} for {} yields an empty playlist",
                request.loops,
                request.movie
            );
        }
        let (playlist, looped) = looping.playlist(&request.movie);

        match request.presentation {
            Some(Presentation::Fullscreen) => self.state.set_fullscreen(true),
            Some(Presentation::Windowed) => self.state.set_fullscreen(false),
            None => {}
        }

        log::debug!(
            "[movie_overlay] start {} plays={:?} channel={}",
            request.movie,
            looping,
            self.channel()
        );
        self.audio.play(self.channel(), &playlist, looped)?;
        Ok(true)
    }

    /// Called early in every interaction; arms fullscreen until a movie
    /// displayable clears it again.
    pub fn mark_interaction_start(&mut self) {
        self.state.set_fullscreen(true);
    }

    /// Called by movie displayables once per interaction.
    pub fn per_interact_reset(&mut self) {
        self.state.set_fullscreen(false);
    }

    /// Decides whether this frame shows the movie fullscreen. Releases the
    /// cached surface once the channel has gone idle.
    pub fn mode_check(&mut self) -> bool {
        if self.audio.playing(self.channel()).is_none() {
            self.state.release_surface();
            return false;
        }
        self.state.is_fullscreen()
    }

    pub fn phase(&self) -> PlaybackPhase {
        match self.audio.playing(self.channel()) {
            Some(movie) => PlaybackPhase::Playing {
                movie,
                fullscreen: self.state.is_fullscreen(),
            },
            None => PlaybackPhase::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MOVIE_CHANNEL;
    use crate::recording::{AudioEvent, RecordingAudio};

    fn play_events(audio: &RecordingAudio) -> Vec<(Vec<MovieHandle>, bool)> {
        audio
            .events()
            .into_iter()
            .filter_map(|event| match event {
                AudioEvent::Play {
                    playlist, looped, ..
                } => Some((playlist, looped)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn loop_counts_map_to_play_counts() {
        assert_eq!(Looping::from_loop_count(-1), Looping::Forever);
        assert_eq!(Looping::from_loop_count(0), Looping::Plays(1));
        assert_eq!(Looping::from_loop_count(2), Looping::Plays(3));
        assert_eq!(Looping::from_loop_count(-5), Looping::Plays(0));
    }

    #[test]
    fn start_shapes_playlist_from_loop_count() -> Result<()> {
        let audio = RecordingAudio::new();
        let settings = MovieSettings::default();
        let mut state = PlaybackState::default();
        let mut controller = PlaybackController::new(&mut state, &audio, &settings);

        controller.start(StartRequest::new("intro.ogv").loops(-1))?;
        controller.start(StartRequest::new("intro.ogv").loops(2))?;
        controller.start(StartRequest::new("intro.ogv"))?;

        let intro = MovieHandle::new("intro.ogv");
        assert_eq!(
            play_events(&audio),
            vec![
                (vec![intro.clone()], true),
                (vec![intro.clone(), intro.clone(), intro.clone()], false),
                (vec![intro], false),
            ]
        );
        Ok(())
    }

    #[test]
    fn sized_start_updates_default_size_until_next_sized_start() -> Result<()> {
        let audio = RecordingAudio::new();
        let settings = MovieSettings::default();
        let mut state = PlaybackState::default();

        {
            let mut controller = PlaybackController::new(&mut state, &audio, &settings);
            controller.start(StartRequest::new("a.ogv").size((800, 600)))?;
            controller.start(StartRequest::new("b.ogv"))?;
        }
        assert_eq!(state.default_size(), Size::new(800, 600));

        PlaybackController::new(&mut state, &audio, &settings)
            .start(StartRequest::new("c.ogv").size((320, 240)))?;
        assert_eq!(state.default_size(), Size::new(320, 240));
        Ok(())
    }

    #[test]
    fn fullscreen_only_stop_respects_mode() -> Result<()> {
        let audio = RecordingAudio::new();
        let settings = MovieSettings::default();
        let mut state = PlaybackState::default();
        let mut controller = PlaybackController::new(&mut state, &audio, &settings);

        controller.start(StartRequest::new("intro.ogv"))?;
        controller.per_interact_reset();
        assert!(!controller.stop(StopRequest::fullscreen_only())?);
        assert_eq!(audio.playing(MOVIE_CHANNEL), Some("intro.ogv".into()));

        controller.mark_interaction_start();
        assert!(controller.stop(StopRequest::fullscreen_only())?);
        assert_eq!(audio.playing(MOVIE_CHANNEL), None);
        Ok(())
    }

    #[test]
    fn stopping_idle_channel_is_harmless() -> Result<()> {
        let audio = RecordingAudio::new();
        let settings = MovieSettings::default();
        let mut state = PlaybackState::default();
        let mut controller = PlaybackController::new(&mut state, &audio, &settings);

        assert!(controller.stop(StopRequest::default())?);
        assert!(controller.stop(StopRequest::default())?);
        assert_eq!(controller.phase(), PlaybackPhase::Idle);
        Ok(())
    }

    #[test]
    fn mode_check_follows_last_arbitration_call() -> Result<()> {
        let audio = RecordingAudio::new();
        let settings = MovieSettings::default();
        let mut state = PlaybackState::default();
        let mut controller = PlaybackController::new(&mut state, &audio, &settings);

        controller.start(StartRequest::new("intro.ogv"))?;

        controller.mark_interaction_start();
        controller.per_interact_reset();
        assert!(!controller.mode_check());

        controller.per_interact_reset();
        controller.mark_interaction_start();
        assert!(controller.mode_check());
        assert_eq!(
            controller.phase(),
            PlaybackPhase::Playing {
                movie: "intro.ogv".into(),
                fullscreen: true,
            }
        );
        Ok(())
    }

    #[test]
    fn mode_check_is_false_whenever_channel_is_idle() -> Result<()> {
        let audio = RecordingAudio::new();
        let settings = MovieSettings::default();
        let mut state = PlaybackState::default();
        state.reallocate_surface(Size::new(4, 4), Some("intro.ogv".into()));

        let mut controller = PlaybackController::new(&mut state, &audio, &settings);
        controller.start(StartRequest::fullscreen("intro.ogv"))?;
        assert!(controller.mode_check());

        audio.finish(MOVIE_CHANNEL);
        controller.mark_interaction_start();
        assert!(!controller.mode_check());

        assert!(state.surface().is_none());
        assert!(state.surface_key().is_none());
        Ok(())
    }

    #[test]
    fn explicit_presentation_sets_mode_without_arbitration() -> Result<()> {
        let audio = RecordingAudio::new();
        let settings = MovieSettings::default();
        let mut state = PlaybackState::default();
        let mut controller = PlaybackController::new(&mut state, &audio, &settings);

        controller.start(StartRequest::fullscreen("cutscene.ogv"))?;
        assert!(controller.mode_check());

        controller.start(StartRequest::displayable("window.ogv"))?;
        assert!(!controller.mode_check());
        Ok(())
    }

    #[test]
    fn reduced_update_mode_ignores_start() -> Result<()> {
        let audio = RecordingAudio::new();
        let settings = MovieSettings {
            less_updates: true,
            ..MovieSettings::default()
        };
        let mut state = PlaybackState::default();
        let mut controller = PlaybackController::new(&mut state, &audio, &settings);

        assert!(!controller.start(StartRequest::new("intro.ogv").size((10, 10)))?);
        assert!(audio.events().is_empty());
        assert_eq!(state.default_size(), Size::new(400, 300));
        Ok(())
    }

    #[test]
    fn custom_channel_is_used_for_requests() -> Result<()> {
        let audio = RecordingAudio::new();
        let settings = MovieSettings {
            channel: "cinema".to_string(),
            ..MovieSettings::default()
        };
        let mut state = PlaybackState::default();
        let mut controller = PlaybackController::new(&mut state, &audio, &settings);

        controller.start(StartRequest::new("intro.ogv"))?;
        assert_eq!(audio.playing("cinema"), Some("intro.ogv".into()));
        assert_eq!(audio.playing(MOVIE_CHANNEL), None);
        Ok(())
    }
}
