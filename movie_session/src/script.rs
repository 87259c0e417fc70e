use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use movie_overlay::recording::{AudioEvent, RecordingAudio, RecordingRenderer, RenderEvent};
use movie_overlay::{
    DisplayProperties, DisplayableId, HostEvent, MovieDisplayable, MovieSession, MovieSettings,
    PlaybackPhase, RenderNode, Size, StartRequest, StopRequest, DEFAULT_MOVIE_FPS,
};
use serde::{Deserialize, Serialize};

pub type RecordingSession = MovieSession<RecordingAudio, RecordingRenderer>;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    #[serde(default)]
    pub displayables: Vec<DisplayableConfig>,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayableConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub properties: DisplayProperties,
}

fn default_fps() -> u32 {
    DEFAULT_MOVIE_FPS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Start(StartRequest),
    Stop(StopRequest),
    BeginInteraction,
    PerInteract,
    ModeCheck,
    Render {
        displayable: usize,
        #[serde(default)]
        width: f32,
        #[serde(default)]
        height: f32,
    },
    Refresh,
    Finish,
}

impl SessionScript {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read session script: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse session script json: {}", path.display()))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    Started { issued: bool },
    Stopped { issued: bool },
    InteractionStarted,
    InteractReset { displayables: usize },
    Mode { fullscreen: bool, phase: PlaybackPhase },
    Rendered { displayable: DisplayableId, node: RenderNode },
    Refreshed { displayables: usize },
    Finished,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub marker: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Serialize)]
pub struct EventLog<'a> {
    pub steps: &'a [StepRecord],
    pub audio: Vec<AudioEvent>,
    pub render: Vec<RenderEvent>,
    pub final_phase: PlaybackPhase,
    pub default_size: Size,
}

/// Finished session plus the per-step results that produced it.
pub struct SessionRun {
    pub session: RecordingSession,
    pub records: Vec<StepRecord>,
}

impl SessionRun {
    pub fn event_log(&mut self) -> EventLog<'_> {
        let final_phase = self.session.controller().phase();
        EventLog {
            steps: &self.records,
            audio: self.session.audio().events(),
            render: self.session.renderer().events(),
            final_phase,
            default_size: self.session.state().default_size(),
        }
    }
}

pub fn run_script(script: &SessionScript, settings: MovieSettings) -> Result<SessionRun> {
    let mut session = MovieSession::new(RecordingAudio::new(), RecordingRenderer::new(), settings);
    let displayables: Vec<MovieDisplayable> = script
        .displayables
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            MovieDisplayable::new(
                DisplayableId(index as u32),
                entry.fps,
                entry.size,
                entry.properties.clone(),
            )
        })
        .collect();

    let mut records = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let (marker, outcome) = run_step(&mut session, &displayables, step)
            .with_context(|| format!("running script step {index}"))?;
        records.push(StepRecord {
            index,
            marker,
            outcome,
        });
    }

    Ok(SessionRun { session, records })
}

fn run_step(
    session: &mut RecordingSession,
    displayables: &[MovieDisplayable],
    step: &ScriptStep,
) -> Result<(String, StepOutcome)> {
    let result = match step {
        ScriptStep::Start(request) => {
            let issued = session.controller().start(request.clone())?;
            let marker = if issued {
                format!("movie.start {}", request.movie)
            } else {
                format!("movie.start {} (ignored)", request.movie)
            };
            (marker, StepOutcome::Started { issued })
        }
        ScriptStep::Stop(request) => {
            let issued = session.controller().stop(*request)?;
            let marker = if issued {
                "movie.stop".to_string()
            } else {
                "movie.stop (skipped, not fullscreen)".to_string()
            };
            (marker, StepOutcome::Stopped { issued })
        }
        ScriptStep::BeginInteraction => {
            session.controller().mark_interaction_start();
            (
                "movie.interaction.begin".to_string(),
                StepOutcome::InteractionStarted,
            )
        }
        ScriptStep::PerInteract => {
            for displayable in displayables {
                displayable.per_interact(session);
            }
            (
                format!("movie.per_interact {}", displayables.len()),
                StepOutcome::InteractReset {
                    displayables: displayables.len(),
                },
            )
        }
        ScriptStep::ModeCheck => {
            let mut controller = session.controller();
            let fullscreen = controller.mode_check();
            let phase = controller.phase();
            let label = match (&phase, fullscreen) {
                (PlaybackPhase::Idle, _) => "idle",
                (_, true) => "fullscreen",
                (_, false) => "windowed",
            };
            (
                format!("movie.mode {label}"),
                StepOutcome::Mode { fullscreen, phase },
            )
        }
        ScriptStep::Render {
            displayable,
            width,
            height,
        } => {
            let Some(target) = displayables.get(*displayable) else {
                bail!(
                    "render step targets displayable {} but the script declares {}",
                    displayable,
                    displayables.len()
                );
            };
            let node = target.render(session, *width, *height, 0.0, 0.0)?;
            let marker = match node.blits.first() {
                Some(blit) => format!(
                    "movie.render {} {} texture={}",
                    target.id(),
                    node.size,
                    blit.texture.id
                ),
                None => format!("movie.render {} {} empty", target.id(), node.size),
            };
            (
                marker,
                StepOutcome::Rendered {
                    displayable: target.id(),
                    node,
                },
            )
        }
        ScriptStep::Refresh => {
            for displayable in displayables {
                displayable.event(session, &HostEvent::MediaRefresh, 0.0, 0.0, 0.0);
            }
            (
                format!("movie.refresh {}", displayables.len()),
                StepOutcome::Refreshed {
                    displayables: displayables.len(),
                },
            )
        }
        ScriptStep::Finish => {
            let channel = session.settings().channel.clone();
            session.audio().finish(&channel);
            ("movie.finish".to_string(), StepOutcome::Finished)
        }
    };
    Ok(result)
}
