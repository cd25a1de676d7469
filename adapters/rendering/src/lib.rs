#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Maze Walker adapters.
//!
//! Nothing in this crate draws pixels or plays sounds. It turns world state
//! into plain descriptors that a renderer, a UI layer and an audio mixer can
//! consume, and defines the [`RenderingBackend`] seam those layers plug into.

pub mod assets;

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::{Vec2, Vec3};
use maze_walker_core::{CellCoord, Command, Event, MovementIntent, Rgb, SessionPhase};
use maze_walker_system_day_night::{CycleState, TimeOfDayIcon};
use maze_walker_world::{query, MazeLayout, Session, World};

/// Edge length of the sun and moon sprites.
pub const CELESTIAL_SPRITE_SCALE: f32 = 30.0;

/// Color of the light carried by the handheld torch.
pub const TORCH_LIGHT_COLOR: Rgb = Rgb::new(1.0, 170.0 / 255.0, 51.0 / 255.0);

/// Torch light reach, in tiles.
const TORCH_RANGE_TILES: f32 = 5.0;

/// Placement of a single wall block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallInstance {
    /// Maze cell the block occupies.
    pub cell: CellCoord,
    /// Center of the block in world space.
    pub center: Vec3,
    /// Full extents of the block.
    pub size: Vec3,
}

/// Static geometry of a maze, built once per session.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescription {
    /// Every wall block in row-major order.
    pub walls: Vec<WallInstance>,
    /// Camera position at spawn.
    pub spawn: Vec3,
    /// Center of the exit block.
    pub exit_marker: Vec3,
    /// Extents of the exit block.
    pub exit_size: Vec3,
    /// Width and depth of the ground plane.
    pub ground_size: Vec2,
    /// Number of ground texture repetitions along each axis.
    pub ground_repeat: [u32; 2],
    /// Distance at which fog fully hides the scene.
    pub fog_far: f32,
    /// Reach of the torch light.
    pub torch_range: f32,
}

impl SceneDescription {
    /// Describes the geometry of `layout`.
    #[must_use]
    pub fn from_layout(layout: &MazeLayout) -> Self {
        let tile = layout.tile_size();
        let block = Vec3::new(tile, layout.wall_height(), tile);
        let walls = layout
            .grid()
            .walls()
            .map(|cell| WallInstance {
                cell,
                center: layout.cell_center(cell),
                size: block,
            })
            .collect();
        let dimensions = layout.grid().dimensions();

        Self {
            walls,
            spawn: layout.spawn_point(),
            exit_marker: layout.exit_point(),
            exit_size: block,
            ground_size: layout.floor_size(),
            ground_repeat: [dimensions.columns(), dimensions.rows()],
            fog_far: layout.fog_far(),
            torch_range: tile * TORCH_RANGE_TILES,
        }
    }
}

/// Sun or moon sprite placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CelestialPresentation {
    /// Whether the sprite is drawn.
    pub visible: bool,
    /// World-space position of the sprite.
    pub position: Vec3,
    /// Tint applied to the sprite.
    pub tint: Rgb,
}

/// Intensities of the scene lights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightLevels {
    /// Ambient fill.
    pub ambient: f32,
    /// Directional light placed at the sun.
    pub directional: f32,
    /// Hemisphere light.
    pub hemisphere: f32,
}

/// Everything the renderer needs to draw sky, fog, clouds and lights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentPresentation {
    /// Background color.
    pub clear_color: Rgb,
    /// Fog color; always matches the background.
    pub fog_color: Rgb,
    /// Tint applied to every cloud sprite.
    pub cloud_tint: Rgb,
    /// Sun sprite.
    pub sun: CelestialPresentation,
    /// Moon sprite.
    pub moon: CelestialPresentation,
    /// Whether the star field is drawn.
    pub stars_visible: bool,
    /// Whether rain particles are drawn.
    pub rain_visible: bool,
    /// Light intensities.
    pub lights: LightLevels,
    /// Icon shown on the time-of-day control.
    pub toggle_icon: TimeOfDayIcon,
}

impl EnvironmentPresentation {
    /// Converts a simulator sample into renderer inputs.
    #[must_use]
    pub fn from_cycle(state: &CycleState) -> Self {
        Self {
            clear_color: state.sky_color,
            fog_color: state.sky_color,
            cloud_tint: state.cloud_color,
            sun: CelestialPresentation {
                visible: state.sun_visible,
                position: state.sun_position,
                tint: state.sun_color,
            },
            moon: CelestialPresentation {
                visible: state.moon_visible,
                position: state.moon_position,
                tint: Rgb::WHITE,
            },
            stars_visible: state.stars_visible,
            rain_visible: state.rain_visible,
            lights: LightLevels {
                ambient: state.ambient_intensity,
                directional: state.directional_intensity,
                hemisphere: state.hemisphere_intensity,
            },
            toggle_icon: state.toggle_icon,
        }
    }
}

/// One-shot sounds triggered by world events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// The player left the ground.
    Jump,
    /// The player reached the exit.
    Victory,
}

/// Desired state of every audio channel for a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioMix {
    /// Volume of the night ambience loop; zero when stopped.
    pub night_volume: f32,
    /// Volume of the rain loop; zero when stopped.
    pub rain_volume: f32,
    /// Whether the footstep loop plays.
    pub running: bool,
    /// Cues to start from the beginning this frame.
    pub cues: Vec<AudioCue>,
}

impl AudioMix {
    /// Derives the mix from the environment, the session phase and this frame's events.
    ///
    /// Ambient loops start with the first engagement, keep playing while the
    /// session is paused and stop for good once the exit is reached.
    #[must_use]
    pub fn new(state: &CycleState, phase: SessionPhase, running: bool, events: &[Event]) -> Self {
        let ambient = matches!(phase, SessionPhase::Active | SessionPhase::Paused);
        let cues = events
            .iter()
            .filter_map(|event| match event {
                Event::PlayerJumped => Some(AudioCue::Jump),
                Event::ExitReached { .. } => Some(AudioCue::Victory),
                _ => None,
            })
            .collect();

        Self {
            night_volume: if ambient { state.night_ambience_volume } else { 0.0 },
            rain_volume: if ambient { state.rain_volume } else { 0.0 },
            running: running && phase == SessionPhase::Active,
            cues,
        }
    }

    /// Mix with every channel stopped.
    #[must_use]
    pub const fn silent() -> Self {
        Self {
            night_volume: 0.0,
            rain_volume: 0.0,
            running: false,
            cues: Vec::new(),
        }
    }
}

/// Text shown by the user interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Instructions overlay; present while the pointer is released.
    pub overlay: Option<&'static str>,
    /// Running session timer.
    pub timer: Option<String>,
    /// Completion message.
    pub victory: Option<String>,
}

impl Hud {
    /// Builds the interface text for the session.
    #[must_use]
    pub fn new(session: &Session, banner: &'static str) -> Self {
        match session.phase() {
            SessionPhase::Idle => Self {
                overlay: Some(banner),
                timer: None,
                victory: None,
            },
            SessionPhase::Active => Self {
                overlay: None,
                timer: Some(timer_text(session.elapsed())),
                victory: None,
            },
            SessionPhase::Paused => Self {
                overlay: Some(banner),
                timer: Some(timer_text(session.elapsed())),
                victory: None,
            },
            SessionPhase::Won => {
                let elapsed = session.final_time().unwrap_or_else(|| session.elapsed());
                Self {
                    overlay: None,
                    timer: Some(timer_text(elapsed)),
                    victory: Some(victory_text(elapsed)),
                }
            }
        }
    }
}

/// Formats the running timer, e.g. `Time: 12.3s`.
#[must_use]
pub fn timer_text(elapsed: Duration) -> String {
    format!("Time: {:.1}s", elapsed.as_secs_f64())
}

/// Formats the completion message, e.g. `Your time: 12.3 seconds.`.
#[must_use]
pub fn victory_text(elapsed: Duration) -> String {
    format!("Your time: {:.1} seconds.", elapsed.as_secs_f64())
}

/// Camera placement for the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPresentation {
    /// Eye position.
    pub position: Vec3,
    /// Rotation about the vertical axis in radians.
    pub yaw: f32,
}

/// Handheld torch state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TorchPresentation {
    /// Whether the torch model is shown at all.
    pub visible: bool,
    /// Whether its light is on.
    pub lit: bool,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer lock change requested this frame, if any.
    pub engage: Option<bool>,
    /// Movement keys currently held.
    pub intent: MovementIntent,
    /// Camera yaw in radians, when the pointer moved.
    pub yaw: Option<f32>,
    /// Jump key pressed this frame.
    pub jump: bool,
    /// Torch key pressed this frame.
    pub toggle_torch: bool,
    /// Time-of-day control clicked this frame.
    pub toggle_time_of_day: bool,
}

impl FrameInput {
    /// Translates the snapshot into world commands, ending with the tick for `dt`.
    #[must_use]
    pub fn commands(&self, dt: Duration) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Some(engaged) = self.engage {
            commands.push(Command::SetEngaged { engaged });
        }
        if self.toggle_time_of_day {
            commands.push(Command::ToggleTimeOfDay);
        }
        commands.push(Command::SetMovement {
            intent: self.intent,
        });
        if let Some(yaw) = self.yaw {
            commands.push(Command::Look { yaw });
        }
        if self.jump {
            commands.push(Command::Jump);
        }
        if self.toggle_torch {
            commands.push(Command::ToggleTorch);
        }
        commands.push(Command::Tick { dt });
        commands
    }
}

/// Per-frame state handed to the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Sky, fog, clouds and lights.
    pub environment: EnvironmentPresentation,
    /// Camera placement.
    pub camera: CameraPresentation,
    /// Handheld torch.
    pub torch: TorchPresentation,
    /// Audio channel targets.
    pub audio: AudioMix,
    /// Interface text.
    pub hud: Hud,
}

impl Scene {
    /// Captures the current world state along with the events the frame produced.
    #[must_use]
    pub fn capture(world: &World, events: &[Event]) -> Self {
        let cycle = query::cycle_state(world);
        let session = query::session(world);

        Self {
            environment: EnvironmentPresentation::from_cycle(&cycle),
            camera: CameraPresentation {
                position: query::player_position(world),
                yaw: query::yaw(world),
            },
            torch: TorchPresentation {
                visible: query::torch_available(world),
                lit: query::torch_lit(world),
            },
            audio: AudioMix::new(&cycle, session.phase(), query::is_running(world), events),
            hud: Hud::new(session, query::welcome_banner(world)),
        }
    }
}

/// Describes the scene that should be presented by a rendering backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Static maze geometry.
    pub description: SceneDescription,
    /// Initial frame state.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, description: SceneDescription, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            description,
            scene,
        }
    }

    /// Builds the descriptor for a freshly created world.
    #[must_use]
    pub fn for_world<T>(window_title: T, world: &World) -> Self
    where
        T: Into<String>,
    {
        Self::new(
            window_title,
            SceneDescription::from_layout(query::layout(world)),
            Scene::capture(world, &[]),
        )
    }
}

/// Rendering backends capable of presenting Maze Walker scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and refreshes the scene before
    /// it is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_walker_core::{Capabilities, MazeGrid};
    use maze_walker_system_day_night::{DayNightConfig, DayNightSimulator};
    use maze_walker_world::{apply, GameConfig};

    const LOOP: &str = "\
###########
#S.......E#
#.#######.#
#.........#
###########";

    fn world() -> World {
        let grid = MazeGrid::from_ascii(LOOP).expect("valid grid");
        World::with_grid(GameConfig::default(), grid, Capabilities { torch: true })
            .expect("valid config")
    }

    fn night_state() -> CycleState {
        let mut simulator = DayNightSimulator::new(DayNightConfig::default()).expect("valid");
        simulator.set_game_time(90.0);
        simulator.sample()
    }

    #[test]
    fn description_mirrors_layout() {
        let world = world();
        let layout = query::layout(&world);
        let description = SceneDescription::from_layout(layout);

        assert_eq!(description.walls.len(), layout.wall_boxes().len());
        assert_eq!(description.walls[0].size, Vec3::new(8.0, 7.0, 8.0));
        assert_eq!(description.ground_size, Vec2::new(88.0, 40.0));
        assert_eq!(description.ground_repeat, [11, 5]);
        assert_eq!(description.exit_marker, layout.exit_point());
        assert_eq!(description.torch_range, 40.0);
        assert!((description.fog_far - 61.6).abs() < 1e-4);
    }

    #[test]
    fn environment_copies_the_sky_into_fog() {
        let state = night_state();
        let environment = EnvironmentPresentation::from_cycle(&state);

        assert_eq!(environment.clear_color, environment.fog_color);
        assert_eq!(environment.clear_color, state.sky_color);
        assert!(environment.moon.visible);
        assert!(environment.stars_visible);
        assert!(environment.rain_visible);
        assert_eq!(environment.toggle_icon, TimeOfDayIcon::Sun);
    }

    #[test]
    fn audio_is_silent_before_engagement_and_after_victory() {
        let state = night_state();
        assert_eq!(
            AudioMix::new(&state, SessionPhase::Idle, true, &[]),
            AudioMix::silent()
        );

        let won = AudioMix::new(
            &state,
            SessionPhase::Won,
            false,
            &[Event::ExitReached {
                elapsed: Duration::from_secs(3),
            }],
        );
        assert_eq!(won.night_volume, 0.0);
        assert_eq!(won.rain_volume, 0.0);
        assert_eq!(won.cues, vec![AudioCue::Victory]);
    }

    #[test]
    fn ambience_continues_while_paused_but_footsteps_stop() {
        let state = night_state();
        let paused = AudioMix::new(&state, SessionPhase::Paused, true, &[]);
        assert_eq!(paused.night_volume, state.night_ambience_volume);
        assert_eq!(paused.rain_volume, state.rain_volume);
        assert!(!paused.running);

        let active = AudioMix::new(&state, SessionPhase::Active, true, &[Event::PlayerJumped]);
        assert!(active.running);
        assert_eq!(active.cues, vec![AudioCue::Jump]);
    }

    #[test]
    fn hud_text_follows_session() {
        let mut world = world();
        let hud = Hud::new(query::session(&world), query::welcome_banner(&world));
        assert_eq!(hud.overlay, Some(query::welcome_banner(&world)));
        assert_eq!(hud.timer, None);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetEngaged { engaged: true },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(12_340),
            },
            &mut events,
        );
        let hud = Hud::new(query::session(&world), query::welcome_banner(&world));
        assert_eq!(hud.overlay, None);
        assert_eq!(hud.timer.as_deref(), Some("Time: 12.3s"));
        assert_eq!(hud.victory, None);
    }

    #[test]
    fn victory_text_uses_one_decimal() {
        assert_eq!(
            victory_text(Duration::from_millis(41_260)),
            "Your time: 41.3 seconds."
        );
        assert_eq!(timer_text(Duration::ZERO), "Time: 0.0s");
    }

    #[test]
    fn frame_input_ends_with_tick() {
        let input = FrameInput {
            engage: Some(true),
            yaw: Some(0.5),
            jump: true,
            ..FrameInput::default()
        };
        let dt = Duration::from_millis(16);
        assert_eq!(
            input.commands(dt),
            vec![
                Command::SetEngaged { engaged: true },
                Command::SetMovement {
                    intent: MovementIntent::IDLE
                },
                Command::Look { yaw: 0.5 },
                Command::Jump,
                Command::Tick { dt },
            ]
        );
    }

    #[test]
    fn captured_scene_tracks_world() {
        let world = world();
        let presentation = Presentation::for_world("Maze Walker", &world);
        assert_eq!(presentation.window_title, "Maze Walker");
        assert_eq!(
            presentation.scene.camera.position,
            presentation.description.spawn
        );
        assert!(presentation.scene.torch.visible);
        assert!(!presentation.scene.torch.lit);
        assert_eq!(presentation.scene.audio, AudioMix::silent());
    }
}
