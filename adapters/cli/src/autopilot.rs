//! Scripted input that walks the shortest route to the exit.

use glam::Vec3;
use maze_walker_core::MovementIntent;
use maze_walker_rendering::{CameraPresentation, FrameInput};
use maze_walker_world::MazeLayout;

/// Horizontal distance at which a waypoint counts as reached.
const WAYPOINT_RADIUS: f32 = 0.5;

/// Steers the camera through cell centres along the solution path.
#[derive(Clone, Debug)]
pub(crate) struct Autopilot {
    waypoints: Vec<Vec3>,
    next: usize,
}

impl Autopilot {
    /// Plans the route from the start cell to the exit; `None` if the maze has no solution.
    pub(crate) fn plan(layout: &MazeLayout) -> Option<Self> {
        let grid = layout.grid();
        let path = grid.shortest_path(grid.start(), grid.end())?;
        let waypoints = path
            .into_iter()
            .skip(1)
            .map(|cell| layout.cell_center(cell))
            .collect();
        Some(Self { waypoints, next: 0 })
    }

    /// Number of waypoints left, including the one being approached.
    pub(crate) fn remaining(&self) -> usize {
        self.waypoints.len() - self.next
    }

    /// Produces the input for the next frame given the current camera.
    pub(crate) fn steer(&mut self, camera: &CameraPresentation) -> FrameInput {
        while self.next + 1 < self.waypoints.len()
            && horizontal_distance(camera.position, self.waypoints[self.next]) < WAYPOINT_RADIUS
        {
            self.next += 1;
        }

        let Some(target) = self.waypoints.get(self.next) else {
            return FrameInput::default();
        };
        let offset = *target - camera.position;

        FrameInput {
            intent: MovementIntent {
                forward: true,
                ..MovementIntent::IDLE
            },
            yaw: Some((-offset.x).atan2(-offset.z)),
            ..FrameInput::default()
        }
    }
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    (a.x - b.x).hypot(a.z - b.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_walker_core::MazeGrid;
    use maze_walker_system_movement::forward_vector;

    const SMALL: &str = "\
#######
#S....#
#####.#
#.....#
#.#####
#....E#
#######";

    fn layout() -> MazeLayout {
        MazeLayout::new(MazeGrid::from_ascii(SMALL).expect("valid grid"), 8.0, 7.0)
    }

    #[test]
    fn plans_every_cell_after_spawn() {
        let pilot = Autopilot::plan(&layout()).expect("solvable");
        assert_eq!(pilot.remaining(), 16);
    }

    #[test]
    fn faces_the_next_waypoint() {
        let layout = layout();
        let mut pilot = Autopilot::plan(&layout).expect("solvable");
        let camera = CameraPresentation {
            position: layout.spawn_point(),
            yaw: 0.0,
        };

        let input = pilot.steer(&camera);
        assert!(input.intent.forward);
        let yaw = input.yaw.expect("yaw is set");
        assert!(forward_vector(yaw).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn advances_past_reached_waypoints() {
        let layout = layout();
        let mut pilot = Autopilot::plan(&layout).expect("solvable");
        let camera = CameraPresentation {
            position: pilot.waypoints[0] + Vec3::new(0.2, 0.0, 0.0),
            yaw: 0.0,
        };

        let _ = pilot.steer(&camera);
        assert_eq!(pilot.remaining(), 15);
    }
}
