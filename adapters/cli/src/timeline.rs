//! Frame-by-frame record of a headless run.

use maze_walker_core::{Event, SessionPhase};
use maze_walker_system_day_night::CycleState;
use maze_walker_world::{query, World};
use serde::Serialize;

/// Environment and player snapshot taken at one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct TimelineSample {
    /// Zero-based frame index.
    pub(crate) frame: u32,
    /// Active play time in seconds.
    pub(crate) elapsed_secs: f64,
    /// Session phase after the frame.
    pub(crate) phase: SessionPhase,
    /// Camera position.
    pub(crate) position: [f32; 3],
    /// Day/night state after the frame.
    pub(crate) cycle: CycleState,
}

/// Outcome of a headless run along with periodic samples.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub(crate) struct Timeline {
    /// Frames that were simulated.
    pub(crate) frames: u32,
    /// Play time at which the exit was reached.
    pub(crate) final_time_secs: Option<f64>,
    /// Nightfall transitions in order, `true` for dusk.
    pub(crate) nightfall: Vec<bool>,
    /// Periodic samples.
    pub(crate) samples: Vec<TimelineSample>,
}

/// Collects a [`Timeline`] as frames are simulated.
#[derive(Debug)]
pub(crate) struct Recorder {
    sample_every: u32,
    timeline: Timeline,
}

impl Recorder {
    /// Samples every `sample_every` frames; zero keeps only the final frame.
    pub(crate) fn new(sample_every: u32) -> Self {
        Self {
            sample_every,
            timeline: Timeline::default(),
        }
    }

    /// Records one simulated frame and the events it produced.
    pub(crate) fn record(&mut self, world: &World, events: &[Event]) {
        let frame = self.timeline.frames;
        self.timeline.frames += 1;

        for event in events {
            match event {
                Event::NightfallChanged { is_night } => self.timeline.nightfall.push(*is_night),
                Event::ExitReached { elapsed } => {
                    self.timeline.final_time_secs = Some(elapsed.as_secs_f64());
                }
                _ => {}
            }
        }

        let finished = query::session_phase(world) == SessionPhase::Won;
        if finished || (self.sample_every > 0 && frame % self.sample_every == 0) {
            self.timeline.samples.push(sample(world, frame));
        }
    }

    /// Records the last frame if it was not sampled and returns the timeline.
    pub(crate) fn finish(mut self, world: &World) -> Timeline {
        if let Some(last) = self.timeline.frames.checked_sub(1) {
            let sampled = self
                .timeline
                .samples
                .last()
                .is_some_and(|sample| sample.frame == last);
            if !sampled {
                self.timeline.samples.push(sample(world, last));
            }
        }
        self.timeline
    }
}

fn sample(world: &World, frame: u32) -> TimelineSample {
    TimelineSample {
        frame,
        elapsed_secs: query::elapsed(world).as_secs_f64(),
        phase: query::session_phase(world),
        position: query::player_position(world).to_array(),
        cycle: query::cycle_state(world),
    }
}
