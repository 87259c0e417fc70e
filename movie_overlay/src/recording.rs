use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use anyhow::Result;
use serde::Serialize;

use crate::audio::AudioChannels;
use crate::render::{DisplayableId, Renderer};
use crate::state::{MovieHandle, Size};
use crate::surface::{Surface, SurfaceId, TextureHandle};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioEvent {
    Play {
        channel: String,
        playlist: Vec<MovieHandle>,
        looped: bool,
    },
    Stop {
        channel: String,
    },
    Finished {
        channel: String,
        movie: Option<MovieHandle>,
    },
}

#[derive(Debug, Default)]
struct AudioLog {
    events: Vec<AudioEvent>,
    playing: BTreeMap<String, MovieHandle>,
}

/// In-memory audio subsystem that records every request. Clones share the
/// same log and channel table.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    inner: Rc<RefCell<AudioLog>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.inner.borrow().events.clone()
    }

    /// Simulates the decoder reaching the end of the media on `channel`.
    pub fn finish(&self, channel: &str) {
        let mut inner = self.inner.borrow_mut();
        let movie = inner.playing.remove(channel);
        inner.events.push(AudioEvent::Finished {
            channel: channel.to_string(),
            movie,
        });
    }
}

impl AudioChannels for RecordingAudio {
    fn play(&self, channel: &str, playlist: &[MovieHandle], looped: bool) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.events.push(AudioEvent::Play {
            channel: channel.to_string(),
            playlist: playlist.to_vec(),
            looped,
        });
        match playlist.first() {
            Some(movie) => {
                inner.playing.insert(channel.to_string(), movie.clone());
            }
            None => {
                inner.playing.remove(channel);
            }
        }
        Ok(())
    }

    fn stop(&self, channel: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.events.push(AudioEvent::Stop {
            channel: channel.to_string(),
        });
        inner.playing.remove(channel);
        Ok(())
    }

    fn playing(&self, channel: &str) -> Option<MovieHandle> {
        self.inner.borrow().playing.get(channel).cloned()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderEvent {
    MutatedSurface {
        surface: SurfaceId,
    },
    LoadTexture {
        texture: u64,
        surface: SurfaceId,
        size: Size,
    },
    Redraw {
        displayable: DisplayableId,
        frames: u32,
    },
}

#[derive(Debug, Default)]
struct RenderLog {
    events: Vec<RenderEvent>,
    next_texture: u64,
    textures: BTreeMap<SurfaceId, u64>,
}

/// In-memory renderer that hands out one texture id per surface and records
/// every call. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    inner: Rc<RefCell<RenderLog>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.inner.borrow().events.clone()
    }

    pub fn redraws(&self) -> Vec<(DisplayableId, u32)> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Redraw {
                    displayable,
                    frames,
                } => Some((*displayable, *frames)),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn mutated_surface(&self, surface: &Surface) {
        self.inner
            .borrow_mut()
            .events
            .push(RenderEvent::MutatedSurface {
                surface: surface.id(),
            });
    }

    fn load_texture(&self, surface: &Surface) -> Result<TextureHandle> {
        let mut inner = self.inner.borrow_mut();
        let existing = inner.textures.get(&surface.id()).copied();
        let id = match existing {
            Some(id) => id,
            None => {
                let id = inner.next_texture;
                inner.next_texture += 1;
                inner.textures.insert(surface.id(), id);
                id
            }
        };
        inner.events.push(RenderEvent::LoadTexture {
            texture: id,
            surface: surface.id(),
            size: surface.size(),
        });
        Ok(TextureHandle {
            id,
            surface: surface.id(),
            size: surface.size(),
        })
    }

    fn redraw(&self, displayable: DisplayableId, frames: u32) {
        self.inner.borrow_mut().events.push(RenderEvent::Redraw {
            displayable,
            frames,
        });
    }
}
