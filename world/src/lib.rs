#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Walker.
//!
//! The world owns the maze layout, the day/night simulator, the player
//! controller, and the session lifecycle. Adapters mutate it exclusively
//! through [`apply`] and observe it through the [`query`] module and the
//! [`Event`] values pushed by each command.

mod config;
mod layout;

use std::time::Duration;

use maze_walker_core::{
    Capabilities, Command, ConfigError, Event, MazeGrid, MovementIntent, SessionPhase,
    WELCOME_BANNER,
};
use maze_walker_system_day_night::DayNightSimulator;
use maze_walker_system_maze_generation::MazeGenerator;
use maze_walker_system_movement::PlayerController;

pub use config::GameConfig;
pub use layout::MazeLayout;

/// Progress of the current play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Session {
    phase: SessionPhase,
    elapsed: Duration,
    final_time: Option<Duration>,
}

impl Session {
    const fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            elapsed: Duration::ZERO,
            final_time: None,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Active play time accumulated so far.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Play time at which the exit was reached.
    #[must_use]
    pub const fn final_time(&self) -> Option<Duration> {
        self.final_time
    }
}

/// Represents the authoritative Maze Walker world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    layout: MazeLayout,
    simulator: DayNightSimulator,
    player: PlayerController,
    session: Session,
    intent: MovementIntent,
    yaw: f32,
    running: bool,
    night: bool,
}

impl World {
    /// Generates a maze from `config` and places the player at its start.
    pub fn new(config: GameConfig, capabilities: Capabilities) -> Result<Self, ConfigError> {
        config.validate()?;
        let dimensions = config.dimensions()?;
        let grid = MazeGenerator::new().generate(dimensions, config.seed);
        Self::assemble(config, grid, capabilities)
    }

    /// Builds a world around an existing maze. The maze extents replace the configured ones.
    pub fn with_grid(
        mut config: GameConfig,
        grid: MazeGrid,
        capabilities: Capabilities,
    ) -> Result<Self, ConfigError> {
        config.validate_environment()?;
        let dimensions = grid.dimensions();
        config.columns = dimensions.columns();
        config.rows = dimensions.rows();
        Self::assemble(config, grid, capabilities)
    }

    fn assemble(
        config: GameConfig,
        grid: MazeGrid,
        capabilities: Capabilities,
    ) -> Result<Self, ConfigError> {
        let simulator = DayNightSimulator::new(config.day_night)?;
        let layout = MazeLayout::new(grid, config.tile_size, config.wall_height);
        let player = PlayerController::new(
            config.player_tuning(),
            layout.spawn_point(),
            capabilities.torch,
        );

        tracing::info!(
            columns = config.columns,
            rows = config.rows,
            walls = layout.wall_boxes().len(),
            torch = capabilities.torch,
            "world assembled"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            night: simulator.is_night(),
            config,
            layout,
            simulator,
            player,
            session: Session::new(),
            intent: MovementIntent::IDLE,
            yaw: 0.0,
            running: false,
        })
    }

    fn is_engaged(&self) -> bool {
        self.session.phase.is_active()
    }

    fn set_engaged(&mut self, engaged: bool, out_events: &mut Vec<Event>) {
        let next = match (self.session.phase, engaged) {
            (SessionPhase::Idle | SessionPhase::Paused, true) => SessionPhase::Active,
            (SessionPhase::Active, false) => SessionPhase::Paused,
            _ => return,
        };

        tracing::info!(from = ?self.session.phase, to = ?next, "session phase changed");
        self.session.phase = next;
        if !engaged {
            self.intent = MovementIntent::IDLE;
            self.running = false;
        }
        out_events.push(Event::EngagementChanged { engaged });
    }

    fn observe_nightfall(&mut self, out_events: &mut Vec<Event>) {
        let night = self.simulator.is_night();
        if night != self.night {
            self.night = night;
            tracing::debug!(is_night = night, "nightfall changed");
            out_events.push(Event::NightfallChanged { is_night: night });
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let active = self.is_engaged();
        self.simulator.advance(dt, active);
        if !active {
            return;
        }

        self.session.elapsed = self.session.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });
        self.observe_nightfall(out_events);

        let step = self.player.update(
            dt,
            self.intent,
            self.yaw,
            self.layout.wall_boxes(),
            self.night,
        );
        self.running = step.running;
        if step.moved() {
            out_events.push(Event::PlayerMoved {
                from: step.from.to_array(),
                to: step.to.to_array(),
            });
        }
        if step.landed {
            out_events.push(Event::PlayerLanded);
        }
        if let Some(lit) = step.torch_changed {
            out_events.push(Event::TorchChanged { lit });
        }

        let reach = self.player.tuning().exit_reach;
        if step.to.distance(self.layout.exit_point()) < reach {
            self.win(out_events);
        }
    }

    fn win(&mut self, out_events: &mut Vec<Event>) {
        let elapsed = self.session.elapsed;
        self.session.final_time = Some(elapsed);
        self.session.phase = SessionPhase::Won;
        self.intent = MovementIntent::IDLE;
        self.running = false;
        self.player.halt();

        tracing::info!(elapsed_secs = elapsed.as_secs_f64(), "exit reached");
        out_events.push(Event::EngagementChanged { engaged: false });
        out_events.push(Event::ExitReached { elapsed });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetEngaged { engaged } => world.set_engaged(engaged, out_events),
        Command::SetMovement { intent } => {
            if world.is_engaged() {
                world.intent = intent;
            }
        }
        Command::Look { yaw } => {
            if world.is_engaged() && yaw.is_finite() {
                world.yaw = yaw;
            }
        }
        Command::Jump => {
            if world.is_engaged() && world.player.jump() {
                out_events.push(Event::PlayerJumped);
            }
        }
        Command::ToggleTorch => {
            if !world.is_engaged() {
                return;
            }
            if let Some(lit) = world.player.toggle_torch(world.night) {
                out_events.push(Event::TorchChanged { lit });
            }
        }
        Command::ToggleTimeOfDay => {
            if world.session.phase == SessionPhase::Won {
                return;
            }
            let progress = world.simulator.toggle_time_of_day();
            tracing::info!(progress, "time of day overridden");
            out_events.push(Event::TimeOfDayChanged { progress });
            world.observe_nightfall(out_events);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec3;
    use maze_walker_core::{MazeGrid, MovementIntent, SessionPhase};
    use maze_walker_system_day_night::CycleState;
    use maze_walker_system_movement::PlayerState;

    use super::{GameConfig, MazeLayout, Session, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Immutable maze the session is played on.
    #[must_use]
    pub fn maze(world: &World) -> &MazeGrid {
        world.layout.grid()
    }

    /// World-space placement of the maze.
    #[must_use]
    pub fn layout(world: &World) -> &MazeLayout {
        &world.layout
    }

    /// Environment derived from the current game time.
    #[must_use]
    pub fn cycle_state(world: &World) -> CycleState {
        world.simulator.sample()
    }

    /// Accumulated game time in seconds.
    #[must_use]
    pub fn game_time(world: &World) -> f64 {
        world.simulator.game_time()
    }

    /// Reports whether the cycle is in its night window.
    #[must_use]
    pub fn is_night(world: &World) -> bool {
        world.night
    }

    /// Current state of the player body.
    #[must_use]
    pub fn player_state(world: &World) -> &PlayerState {
        world.player.state()
    }

    /// Current camera position.
    #[must_use]
    pub fn player_position(world: &World) -> Vec3 {
        world.player.position()
    }

    /// Whether a torch model is available.
    #[must_use]
    pub fn torch_available(world: &World) -> bool {
        world.player.torch_available()
    }

    /// Whether the handheld torch is lit.
    #[must_use]
    pub fn torch_lit(world: &World) -> bool {
        world.player.state().torch_lit
    }

    /// Whether the running cue should play.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.running
    }

    /// Movement keys currently held.
    #[must_use]
    pub fn movement_intent(world: &World) -> MovementIntent {
        world.intent
    }

    /// Camera yaw in radians.
    #[must_use]
    pub fn yaw(world: &World) -> f32 {
        world.yaw
    }

    /// Progress of the play session.
    #[must_use]
    pub fn session(world: &World) -> &Session {
        &world.session
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn session_phase(world: &World) -> SessionPhase {
        world.session.phase()
    }

    /// Active play time accumulated so far.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.session.elapsed()
    }

    /// Distance from the camera to the exit marker.
    #[must_use]
    pub fn distance_to_exit(world: &World) -> f32 {
        world.player.position().distance(world.layout.exit_point())
    }
}
