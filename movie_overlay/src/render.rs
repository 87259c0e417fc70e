use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::surface::{Surface, TextureHandle};

/// Identity of a displayable in the host render tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayableId(pub u32);

impl fmt::Display for DisplayableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "displayable#{}", self.0)
    }
}

/// Renderer services consumed by the surface cache and movie displayables.
pub trait Renderer {
    /// Flags `surface` as changed so the next upload re-reads its pixels.
    fn mutated_surface(&self, surface: &Surface);

    /// Uploads (or refreshes) a texture backed by `surface`.
    fn load_texture(&self, surface: &Surface) -> Result<TextureHandle>;

    /// Schedules a redraw of `displayable` after `frames` frames.
    fn redraw(&self, displayable: DisplayableId, frames: u32);
}

impl fmt::Debug for dyn Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Renderer")
    }
}

impl<T: Renderer + ?Sized> Renderer for &T {
    fn mutated_surface(&self, surface: &Surface) {
        (**self).mutated_surface(surface)
    }

    fn load_texture(&self, surface: &Surface) -> Result<TextureHandle> {
        (**self).load_texture(surface)
    }

    fn redraw(&self, displayable: DisplayableId, frames: u32) {
        (**self).redraw(displayable, frames)
    }
}
