use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audio::AudioChannels;
use crate::render::{DisplayableId, Renderer};
use crate::session::MovieSession;
use crate::state::Size;
use crate::surface::RenderNode;

/// Default framerate hint for movie displayables.
pub const DEFAULT_MOVIE_FPS: u32 = 24;

/// Events delivered to displayables by the host loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The decoder has a new frame ready.
    MediaRefresh,
    Other { name: String },
}

/// Positioning properties forwarded untouched to the host displayable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayProperties(BTreeMap<String, Value>);

impl DisplayProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Windowed movie widget. Shows whatever plays on the movie channel.
#[derive(Debug, Clone)]
pub struct MovieDisplayable {
    id: DisplayableId,
    fps: u32,
    size: Option<Size>,
    properties: DisplayProperties,
}

impl MovieDisplayable {
    /// `fps` is advisory; pacing belongs to the decoder.
    pub fn new(
        id: DisplayableId,
        fps: u32,
        size: Option<Size>,
        properties: DisplayProperties,
    ) -> Self {
        Self {
            id,
            fps,
            size,
            properties,
        }
    }

    pub fn id(&self) -> DisplayableId {
        self.id
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn properties(&self) -> &DisplayProperties {
        &self.properties
    }

    /// Effective size: the explicit one, else the session default.
    pub fn resolved_size<A, R>(&self, session: &MovieSession<A, R>) -> Size
    where
        A: AudioChannels,
        R: Renderer,
    {
        self.size.unwrap_or_else(|| session.state().default_size())
    }

    /// Renders an opaque node of the movie size. The offered area is ignored
    /// so layout stays stable whether or not a movie is playing.
    pub fn render<A, R>(
        &self,
        session: &mut MovieSession<A, R>,
        _width: f32,
        _height: f32,
        _st: f64,
        _at: f64,
    ) -> Result<RenderNode>
    where
        A: AudioChannels,
        R: Renderer,
    {
        let size = self.resolved_size(session);
        let mut node = RenderNode::opaque(size);
        if let Some(texture) = session.movie_texture(size)? {
            node.blit(texture, (0, 0));
        }
        Ok(node)
    }

    pub fn event<A, R>(
        &self,
        session: &MovieSession<A, R>,
        event: &HostEvent,
        _x: f32,
        _y: f32,
        _st: f64,
    ) where
        A: AudioChannels,
        R: Renderer,
    {
        if matches!(event, HostEvent::MediaRefresh) {
            session
                .renderer()
                .redraw(self.id, session.settings().refresh_redraw_delay);
        }
    }

    pub fn per_interact<A, R>(&self, session: &mut MovieSession<A, R>)
    where
        A: AudioChannels,
        R: Renderer,
    {
        session.controller().per_interact_reset();
    }
}
