#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! First-person player physics and axis-separated collision against maze walls.

use std::time::Duration;

use glam::{Vec2, Vec3};
use maze_walker_core::{ConfigError, MovementIntent};
use serde::{Deserialize, Serialize};

/// Horizontal velocity decay rate per second.
pub const DAMPING: f32 = 10.0;
/// Acceleration applied along the held movement direction.
pub const ACCELERATION: f32 = 150.0;
/// Downward acceleration in world units per second squared.
pub const GRAVITY: f32 = 9.8 * 18.0;
/// Upward velocity added by a jump.
pub const JUMP_VELOCITY: f32 = 30.0;
/// Longest slice of time integrated in one physics substep, in seconds.
pub const MAX_SUBSTEP: f32 = 1.0 / 30.0;
/// Upper bound on substeps per frame.
pub const MAX_SUBSTEPS: u32 = 1_800;

/// Axis-aligned box used for wall and player volumes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from its corners.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates a box centred on `center` extending `half_extents` along each axis.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the box along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Reports whether the boxes overlap. Touching faces count as overlap.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

/// Moves from `old` towards `intended` one horizontal axis at a time.
///
/// The X component is applied first and reverted if the player box would
/// overlap any wall; the Z component is then applied under the same rule.
/// The vertical component of `old` is kept untouched.
#[must_use]
pub fn resolve_horizontal(old: Vec3, intended: Vec3, half_extents: Vec3, walls: &[Aabb]) -> Vec3 {
    let blocked = |position: Vec3| {
        let body = Aabb::from_center_half_extents(position, half_extents);
        walls.iter().any(|wall| body.intersects(wall))
    };

    let mut position = old;
    position.x = intended.x;
    if blocked(position) {
        position.x = old.x;
    }

    position.z = intended.z;
    if blocked(position) {
        position.z = old.z;
    }

    position
}

/// Direction the camera faces for the provided yaw, projected onto the floor.
#[must_use]
pub fn forward_vector(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Direction to the camera's right for the provided yaw.
#[must_use]
pub fn right_vector(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// Physical constants governing the player body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal half-width of the player box.
    pub radius: f32,
    /// Height of the player box.
    pub body_height: f32,
    /// Height at which the camera rests on the floor.
    pub eye_height: f32,
    /// Horizontal velocity decay rate per second.
    pub damping: f32,
    /// Acceleration along the held movement direction.
    pub acceleration: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Upward velocity added by a jump.
    pub jump_velocity: f32,
    /// Horizontal distance to the exit marker that counts as reaching it.
    pub exit_reach: f32,
}

impl PlayerTuning {
    /// Derives body dimensions from the maze tile size and wall height.
    #[must_use]
    pub fn for_tiles(tile_size: f32, wall_height: f32) -> Self {
        Self {
            radius: tile_size * 0.4,
            body_height: wall_height,
            eye_height: wall_height / 2.0,
            damping: DAMPING,
            acceleration: ACCELERATION,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            exit_reach: tile_size * 0.8,
        }
    }

    /// Half extents of the player box.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.radius, self.body_height / 2.0, self.radius)
    }

    /// Rejects negative or non-finite values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("radius", self.radius),
            ("body_height", self.body_height),
            ("eye_height", self.eye_height),
            ("damping", self.damping),
            ("acceleration", self.acceleration),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("exit_reach", self.exit_reach),
        ];
        match fields
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            Some((name, value)) => Err(ConfigError::InvalidTuning { name, value }),
            None => Ok(()),
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self::for_tiles(8.0, 7.0)
    }
}

/// Mutable state of the player body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// World-space camera position.
    pub position: Vec3,
    /// Velocity in the camera frame: `x` along right, `y` up, `z` along forward.
    pub velocity: Vec3,
    /// Whether the player stands on the floor and may jump.
    pub can_jump: bool,
    /// Whether the handheld torch is lit.
    pub torch_lit: bool,
}

/// Observable outcome of a single [`PlayerController::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerStep {
    /// Position before the update.
    pub from: Vec3,
    /// Position after the update.
    pub to: Vec3,
    /// Whether the player touched the floor after being airborne.
    pub landed: bool,
    /// New torch state when the update extinguished it.
    pub torch_changed: Option<bool>,
    /// Whether the running cue should play.
    pub running: bool,
}

impl PlayerStep {
    /// Reports whether the position changed.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Owns the player body and integrates it frame by frame.
#[derive(Clone, Debug)]
pub struct PlayerController {
    tuning: PlayerTuning,
    state: PlayerState,
    torch_available: bool,
}

impl PlayerController {
    /// Places a grounded player at `spawn`. The vertical component is replaced by the eye height.
    #[must_use]
    pub fn new(tuning: PlayerTuning, spawn: Vec3, torch_available: bool) -> Self {
        Self {
            tuning,
            state: PlayerState {
                position: Vec3::new(spawn.x, tuning.eye_height, spawn.z),
                velocity: Vec3::ZERO,
                can_jump: true,
                torch_lit: false,
            },
            torch_available,
        }
    }

    /// Tuning the controller integrates with.
    #[must_use]
    pub const fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Current body state.
    #[must_use]
    pub const fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Current camera position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Whether a torch model is available to the player.
    #[must_use]
    pub const fn torch_available(&self) -> bool {
        self.torch_available
    }

    /// Handles a jump press. Returns `true` when the player left the ground.
    ///
    /// Every press clears the jump flag, so pressing again mid-air does nothing
    /// until the player lands.
    pub fn jump(&mut self) -> bool {
        let jumped = self.state.can_jump;
        if jumped {
            self.state.velocity.y += self.tuning.jump_velocity;
        }
        self.state.can_jump = false;
        jumped
    }

    /// Handles a torch toggle press. Returns the new torch state when it changed.
    ///
    /// Ignored during the day or when no torch is available.
    pub fn toggle_torch(&mut self, is_night: bool) -> Option<bool> {
        if !is_night || !self.torch_available {
            return None;
        }
        self.state.torch_lit = !self.state.torch_lit;
        Some(self.state.torch_lit)
    }

    /// Integrates one frame of motion.
    ///
    /// Frames longer than [`MAX_SUBSTEP`] are split into equal substeps so a
    /// single long frame cannot carry the player through a wall. Physics time
    /// per frame is capped at `MAX_SUBSTEP * MAX_SUBSTEPS`.
    pub fn update(
        &mut self,
        dt: Duration,
        intent: MovementIntent,
        yaw: f32,
        walls: &[Aabb],
        is_night: bool,
    ) -> PlayerStep {
        let dt = dt.as_secs_f32();
        let from = self.state.position;
        let substeps = (dt / MAX_SUBSTEP).ceil().clamp(1.0, MAX_SUBSTEPS as f32);
        let step_dt = (dt / substeps).min(MAX_SUBSTEP);

        let mut landed = false;
        for _ in 0..substeps as u32 {
            landed |= self.integrate(step_dt, intent, yaw, walls);
        }

        let mut torch_changed = None;
        if !is_night && self.state.torch_lit {
            self.state.torch_lit = false;
            torch_changed = Some(false);
        }

        PlayerStep {
            from,
            to: self.state.position,
            landed,
            torch_changed,
            running: intent.any() && self.state.can_jump,
        }
    }

    /// Advances the body by one substep. Returns `true` on landing.
    fn integrate(&mut self, dt: f32, intent: MovementIntent, yaw: f32, walls: &[Aabb]) -> bool {
        let tuning = self.tuning;
        let from = self.state.position;
        let mut velocity = self.state.velocity;

        let decay = (tuning.damping * dt).min(1.0);
        velocity.x -= velocity.x * decay;
        velocity.z -= velocity.z * decay;
        velocity.y -= tuning.gravity * dt;

        let direction = Vec2::new(
            axis(intent.right, intent.left),
            axis(intent.forward, intent.backward),
        )
        .normalize_or_zero();
        velocity.x += direction.x * tuning.acceleration * dt;
        velocity.z += direction.y * tuning.acceleration * dt;

        let intended =
            from + right_vector(yaw) * velocity.x * dt + forward_vector(yaw) * velocity.z * dt;
        let mut position = resolve_horizontal(from, intended, tuning.half_extents(), walls);

        position.y = from.y + velocity.y * dt;
        let mut landed = false;
        if position.y < tuning.eye_height {
            position.y = tuning.eye_height;
            velocity.y = 0.0;
            landed = !self.state.can_jump;
            self.state.can_jump = true;
        }

        self.state.position = position;
        self.state.velocity = velocity;
        landed
    }

    /// Discards all velocity, leaving the player where it stands.
    pub fn halt(&mut self) {
        self.state.velocity = Vec3::ZERO;
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let c = Aabb::new(Vec3::new(1.01, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn yaw_vectors_are_orthogonal() {
        for step in 0..16 {
            let yaw = step as f32 * 0.4;
            assert!(forward_vector(yaw).dot(right_vector(yaw)).abs() < 1e-6);
        }
        assert!(forward_vector(0.0).abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(right_vector(0.0).abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn default_tuning_matches_tile_geometry() {
        let tuning = PlayerTuning::default();
        assert!((tuning.radius - 3.2).abs() < 1e-6);
        assert_eq!(tuning.eye_height, 3.5);
        assert!((tuning.gravity - 176.4).abs() < 1e-3);
        assert!((tuning.exit_reach - 6.4).abs() < 1e-6);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn tuning_rejects_negative_values() {
        let tuning = PlayerTuning {
            gravity: -1.0,
            ..PlayerTuning::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(ConfigError::InvalidTuning {
                name: "gravity",
                value: -1.0
            })
        );
    }

    #[test]
    fn long_frames_do_not_pass_through_walls() {
        let wall = Aabb::new(Vec3::new(-4.0, 0.0, -20.0), Vec3::new(4.0, 7.0, -12.0));
        let intent = MovementIntent {
            forward: true,
            ..MovementIntent::IDLE
        };
        let mut controller = PlayerController::new(PlayerTuning::default(), Vec3::ZERO, false);

        let step = controller.update(Duration::from_secs(1), intent, 0.0, &[wall], false);

        assert!(step.to.z > -12.0 + 3.2, "player crossed the wall: {:?}", step.to);
        assert!(step.to.z < -8.0, "player should reach the wall: {:?}", step.to);
        assert!(!step.landed);
    }

    #[test]
    fn short_frames_take_a_single_substep() {
        let intent = MovementIntent {
            forward: true,
            ..MovementIntent::IDLE
        };
        let dt = Duration::from_millis(16);
        let mut controller = PlayerController::new(PlayerTuning::default(), Vec3::ZERO, false);
        let step = controller.update(dt, intent, 0.0, &[], false);

        let seconds = dt.as_secs_f32();
        let expected_z = -ACCELERATION * seconds * seconds;
        assert!((step.to.z - expected_z).abs() < 1e-5);
    }

    #[test]
    fn axis_combines_opposing_keys() {
        assert_eq!(axis(true, false), 1.0);
        assert_eq!(axis(false, true), -1.0);
        assert_eq!(axis(true, true), 0.0);
    }
}
