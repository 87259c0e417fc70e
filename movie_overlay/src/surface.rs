use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::state::Size;

/// Opaque black, the initial contents of every movie surface.
pub const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Allocation serial of a surface within one playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// RGBA pixel buffer that movie frames are composited into before upload.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    pixels: RgbaImage,
}

impl Surface {
    pub(crate) fn opaque_black(id: SurfaceId, size: Size) -> Self {
        let mut surface = Self {
            id,
            pixels: RgbaImage::new(size.width, size.height),
        };
        surface.fill(OPAQUE_BLACK);
        surface
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn size(&self) -> Size {
        Size::new(self.pixels.width(), self.pixels.height())
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    /// True when every pixel has full alpha.
    pub fn is_opaque(&self) -> bool {
        self.pixels.pixels().all(|pixel| pixel.0[3] == u8::MAX)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.pixels
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("writing {} to {}", self.id, path.display()))
    }
}

/// Renderer-side handle for an uploaded surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureHandle {
    pub id: u64,
    pub surface: SurfaceId,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blit {
    pub texture: TextureHandle,
    pub offset: (i32, i32),
}

/// Leaf of the host render tree produced by a movie displayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderNode {
    pub size: Size,
    pub opaque: bool,
    pub blits: Vec<Blit>,
}

impl RenderNode {
    pub fn opaque(size: Size) -> Self {
        Self {
            size,
            opaque: true,
            blits: Vec::new(),
        }
    }

    pub fn blit(&mut self, texture: TextureHandle, offset: (i32, i32)) {
        self.blits.push(Blit { texture, offset });
    }

    pub fn is_empty(&self) -> bool {
        self.blits.is_empty()
    }
}
