use std::fmt;

use serde::{Deserialize, Serialize};

use crate::surface::{Surface, SurfaceId};

/// Pixel dimensions of a movie placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<Size> for (u32, u32) {
    fn from(size: Size) -> Self {
        (size.width, size.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Identity of a media resource queued on the movie channel.
///
/// Two handles name the same resource only when their names match exactly;
/// the surface cache relies on this to decide when a buffer is stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieHandle(String);

impl MovieHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MovieHandle {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MovieHandle {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for MovieHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observed state of the movie channel, as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PlaybackPhase {
    Idle,
    Playing { movie: MovieHandle, fullscreen: bool },
}

/// Session-wide movie bookkeeping shared by the controller, the surface
/// cache and every movie displayable.
#[derive(Debug)]
pub struct PlaybackState {
    fullscreen: bool,
    default_size: Size,
    surface_key: Option<MovieHandle>,
    surface: Option<Surface>,
    next_surface_id: u64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(DEFAULT_MOVIE_SIZE)
    }
}

/// Size used by displayables that never received an explicit one.
pub const DEFAULT_MOVIE_SIZE: Size = Size::new(400, 300);

impl PlaybackState {
    pub fn new(default_size: Size) -> Self {
        Self {
            fullscreen: false,
            default_size,
            surface_key: None,
            surface: None,
            next_surface_id: 0,
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub(crate) fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn default_size(&self) -> Size {
        self.default_size
    }

    pub(crate) fn set_default_size(&mut self, size: Size) {
        self.default_size = size;
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn surface_key(&self) -> Option<&MovieHandle> {
        self.surface_key.as_ref()
    }

    /// True when the cached surface can be reused for `size` while `playing`
    /// is on the channel.
    pub(crate) fn surface_matches(&self, size: Size, playing: Option<&MovieHandle>) -> bool {
        match self.surface.as_ref() {
            Some(surface) => surface.size() == size && self.surface_key.as_ref() == playing,
            None => false,
        }
    }

    /// Replaces the cached surface with a fresh opaque black buffer tagged
    /// with `key`.
    pub(crate) fn reallocate_surface(&mut self, size: Size, key: Option<MovieHandle>) -> &Surface {
        let id = SurfaceId(self.next_surface_id);
        self.next_surface_id += 1;
        self.surface_key = key;
        self.surface.insert(Surface::opaque_black(id, size))
    }

    pub(crate) fn release_surface(&mut self) {
        if let Some(surface) = self.surface.take() {
            log::debug!(
                "[movie_overlay] releasing surface {} ({})",
                surface.id(),
                surface.size()
            );
        }
        self.surface_key = None;
    }
}
