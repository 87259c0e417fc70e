use std::fmt;

use anyhow::Result;

use crate::state::MovieHandle;

/// Channel reserved for movie playback on the audio/decode subsystem.
pub const MOVIE_CHANNEL: &str = "movie";

/// Narrow view of the audio/decode subsystem used for movie playback.
///
/// Implementations own decoding and frame delivery; this crate only queues
/// playlists, stops channels and polls what is playing.
pub trait AudioChannels {
    /// Replaces whatever is queued on `channel` with `playlist`.
    fn play(&self, channel: &str, playlist: &[MovieHandle], looped: bool) -> Result<()>;

    /// Stops `channel`. Stopping an idle channel must succeed.
    fn stop(&self, channel: &str) -> Result<()>;

    /// Identity of the resource currently playing on `channel`, if any.
    fn playing(&self, channel: &str) -> Option<MovieHandle>;
}

impl fmt::Debug for dyn AudioChannels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AudioChannels")
    }
}

impl<T: AudioChannels + ?Sized> AudioChannels for &T {
    fn play(&self, channel: &str, playlist: &[MovieHandle], looped: bool) -> Result<()> {
        (**self).play(channel, playlist, looped)
    }

    fn stop(&self, channel: &str) -> Result<()> {
        (**self).stop(channel)
    }

    fn playing(&self, channel: &str) -> Option<MovieHandle> {
        (**self).playing(channel)
    }
}
