//! Rendering backend that simulates frames without a window.

use std::time::Duration;

use anyhow::{ensure, Result as AnyResult};
use maze_walker_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

use crate::autopilot::Autopilot;

/// Drives a fixed number of frames at a constant step.
#[derive(Debug)]
pub(crate) struct HeadlessBackend {
    frames: u32,
    frame_duration: Duration,
    pilot: Option<Autopilot>,
}

impl HeadlessBackend {
    /// Creates a backend that runs `frames` steps of `frame_duration`.
    pub(crate) fn new(frames: u32, frame_duration: Duration, pilot: Option<Autopilot>) -> Self {
        Self {
            frames,
            frame_duration,
            pilot,
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        ensure!(
            !self.frame_duration.is_zero(),
            "frame duration must be positive"
        );

        let Self {
            frames,
            frame_duration,
            mut pilot,
        } = self;
        let mut scene = presentation.scene;
        tracing::info!(
            title = %presentation.window_title,
            walls = presentation.description.walls.len(),
            frames,
            frame_ms = frame_duration.as_millis() as u64,
            autopilot = pilot.is_some(),
            "headless run started"
        );

        for frame in 0..frames {
            let mut input = match pilot.as_mut() {
                Some(pilot) => pilot.steer(&scene.camera),
                None => FrameInput::default(),
            };
            if frame == 0 {
                input.engage = Some(true);
            }

            update_scene(frame_duration, input, &mut scene);

            if scene.hud.victory.is_some() {
                tracing::debug!(frame, "session finished");
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use maze_walker_core::{Capabilities, MazeGrid, SessionPhase};
    use maze_walker_world::{apply, query, GameConfig, World};

    const SMALL: &str = "\
#######
#S....#
#####.#
#.....#
#.#####
#....E#
#######";

    fn world() -> World {
        let grid = MazeGrid::from_ascii(SMALL).expect("valid grid");
        World::with_grid(GameConfig::default(), grid, Capabilities::default())
            .expect("valid config")
    }

    #[test]
    fn first_frame_engages_the_session() {
        let world = world();
        let presentation = Presentation::for_world("test", &world);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);

        HeadlessBackend::new(3, Duration::from_millis(16), None)
            .run(presentation, move |_, input, _| log.borrow_mut().push(input.engage))
            .expect("runs");

        assert_eq!(*seen.borrow(), vec![Some(true), None, None]);
    }

    #[test]
    fn autopilot_solves_the_maze() {
        let world = world();
        let presentation = Presentation::for_world("test", &world);
        let pilot = Autopilot::plan(query::layout(&world)).expect("solvable");
        let outcome = Rc::new(RefCell::new(None));
        let result = Rc::clone(&outcome);
        let mut world = world;

        HeadlessBackend::new(2_000, Duration::from_millis(16), Some(pilot))
            .run(presentation, move |dt, input, scene| {
                let mut events = Vec::new();
                for command in input.commands(dt) {
                    apply(&mut world, command, &mut events);
                }
                *scene = Scene::capture(&world, &events);
                *result.borrow_mut() = Some((query::session_phase(&world), query::elapsed(&world)));
            })
            .expect("runs");

        let (phase, elapsed) = (*outcome.borrow()).expect("frames ran");
        assert_eq!(phase, SessionPhase::Won);
        assert!(elapsed < Duration::from_secs(20));
    }

    #[test]
    fn zero_frame_duration_is_rejected() {
        let world = world();
        let presentation = Presentation::for_world("test", &world);
        let result = HeadlessBackend::new(1, Duration::ZERO, None).run(presentation, |_, _, _| {});
        assert!(result.is_err());
    }
}
