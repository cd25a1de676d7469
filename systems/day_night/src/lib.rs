#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Continuous day/night simulation driving sky color, lighting, and ambience.
//!
//! The simulator only stores accumulated game time. Every observable value is
//! derived on demand by [`DayNightSimulator::sample`], which is a pure read and
//! may be called any number of times per frame.

use std::{f64::consts::PI, time::Duration};

use glam::Vec3;
use maze_walker_core::{ConfigError, Rgb};
use serde::{Deserialize, Serialize};

/// Progress at which the sky starts turning from day towards dusk.
pub const DUSK_START: f64 = 0.30;
/// Progress at which night begins.
pub const NIGHT_START: f64 = 0.35;
/// Progress at which night ends and dawn begins.
pub const DAWN_START: f64 = 0.95;
/// Progress after which the sky is pulled back to full daylight.
pub const DAY_RESTORE_START: f64 = 0.98;
/// Progress at which the night ambience reaches full volume.
pub const AMBIENCE_FULL: f64 = 0.40;

const TRANSITION: f64 = 0.05;

/// Reports whether the provided cycle progress falls within the night window.
///
/// Every consumer of "is it night" goes through this function.
#[must_use]
pub fn is_night(progress: f64) -> bool {
    (NIGHT_START..DAWN_START).contains(&progress)
}

/// Normalises elapsed game time into cycle progress within `[0, 1)`.
///
/// Negative and non-finite inputs are folded back into range.
#[must_use]
pub fn cycle_progress(game_time: f64, cycle_duration: f64) -> f64 {
    if !game_time.is_finite() || !cycle_duration.is_finite() || cycle_duration <= 0.0 {
        return 0.0;
    }

    let progress = game_time.rem_euclid(cycle_duration) / cycle_duration;
    if (0.0..1.0).contains(&progress) {
        progress
    } else {
        0.0
    }
}

/// Volume of the night ambience loop for the provided progress, within `[0, 1]`.
#[must_use]
pub fn night_ambience_volume(progress: f64) -> f32 {
    let volume = if progress > DUSK_START && progress < AMBIENCE_FULL {
        (progress - DUSK_START) / (AMBIENCE_FULL - DUSK_START)
    } else if is_night(progress) {
        1.0
    } else if (DAWN_START..1.0).contains(&progress) {
        1.0 - (progress - DAWN_START) / (1.0 - DAWN_START)
    } else {
        0.0
    };

    volume.clamp(0.0, 1.0) as f32
}

/// Icon the day/night toggle control should display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDayIcon {
    /// Daytime; the control offers a jump to night.
    Moon,
    /// Night or dawn; the control offers a jump to day.
    Sun,
}

/// Colors blended by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Clear daytime sky.
    pub day: Rgb,
    /// Deep night sky.
    pub night: Rgb,
    /// Sunset sky.
    pub dusk: Rgb,
    /// Sunrise sky.
    pub dawn: Rgb,
    /// Cloud tint during the day.
    pub day_cloud: Rgb,
    /// Cloud tint during the night.
    pub night_cloud: Rgb,
    /// Sun tint when overhead.
    pub sun_zenith: Rgb,
    /// Sun tint near the horizon.
    pub sun_horizon: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            day: Rgb::from_hex(0x87ceeb),
            night: Rgb::from_hex(0x02010a),
            dusk: Rgb::from_hex(0xff7f50),
            dawn: Rgb::from_hex(0x6a88c1),
            day_cloud: Rgb::from_hex(0xffffff),
            night_cloud: Rgb::from_hex(0x444444),
            sun_zenith: Rgb::from_hex(0xffff00),
            sun_horizon: Rgb::from_hex(0xff8c00),
        }
    }
}

/// Timings and palette of the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    /// Length of one full day in seconds of active play.
    pub cycle_duration_secs: f64,
    /// Distance of the sun and moon from the world origin.
    pub celestial_radius: f32,
    /// Rain volume relative to the night ambience.
    pub rain_factor: f32,
    /// Colors blended across the cycle.
    pub palette: Palette,
}

impl DayNightConfig {
    /// Checks that the configuration describes a usable cycle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cycle_duration_secs.is_finite() || self.cycle_duration_secs <= 0.0 {
            return Err(ConfigError::InvalidCycleDuration {
                seconds: self.cycle_duration_secs,
            });
        }
        if !self.celestial_radius.is_finite() || self.celestial_radius < 0.0 {
            return Err(ConfigError::InvalidTuning {
                name: "celestial_radius",
                value: self.celestial_radius,
            });
        }
        if !self.rain_factor.is_finite() || self.rain_factor < 0.0 {
            return Err(ConfigError::InvalidTuning {
                name: "rain_factor",
                value: self.rain_factor,
            });
        }
        Ok(())
    }
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            cycle_duration_secs: 180.0,
            celestial_radius: 250.0,
            rain_factor: 0.5,
            palette: Palette::default(),
        }
    }
}

/// Snapshot of every value derived from the current cycle position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CycleState {
    /// Position within the cycle, in `[0, 1)`.
    pub progress: f64,
    /// Background and fog color.
    pub sky_color: Rgb,
    /// Cloud tint.
    pub cloud_color: Rgb,
    /// Whether the sun sprite is above the horizon.
    pub sun_visible: bool,
    /// World-space sun position.
    pub sun_position: Vec3,
    /// Sun tint.
    pub sun_color: Rgb,
    /// Whether the moon sprite is above the horizon.
    pub moon_visible: bool,
    /// World-space moon position; always the mirror image of the sun.
    pub moon_position: Vec3,
    /// Whether the star field is shown.
    pub stars_visible: bool,
    /// Intensity of the ambient light.
    pub ambient_intensity: f32,
    /// Intensity of the directional sun light.
    pub directional_intensity: f32,
    /// Intensity of the night hemisphere light.
    pub hemisphere_intensity: f32,
    /// Volume of the night ambience loop, in `[0, 1]`.
    pub night_ambience_volume: f32,
    /// Volume of the rain loop.
    pub rain_volume: f32,
    /// Whether rain particles are shown.
    pub rain_visible: bool,
    /// Whether the cycle is in its night window.
    pub is_night: bool,
    /// Icon the day/night toggle displays.
    pub toggle_icon: TimeOfDayIcon,
}

/// Owns the game clock and derives [`CycleState`] snapshots from it.
#[derive(Clone, Debug)]
pub struct DayNightSimulator {
    config: DayNightConfig,
    game_time: f64,
}

impl DayNightSimulator {
    /// Creates a simulator at the start of the day.
    pub fn new(config: DayNightConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            game_time: 0.0,
        })
    }

    /// Configuration the simulator was built with.
    #[must_use]
    pub const fn config(&self) -> &DayNightConfig {
        &self.config
    }

    /// Accumulated active play time in seconds.
    #[must_use]
    pub const fn game_time(&self) -> f64 {
        self.game_time
    }

    /// Adds `delta` to the clock when the session is active; otherwise time is frozen.
    pub fn advance(&mut self, delta: Duration, is_active: bool) {
        if is_active {
            self.game_time += delta.as_secs_f64();
        }
    }

    /// Overrides the clock. Non-finite values reset it to zero.
    pub fn set_game_time(&mut self, seconds: f64) {
        self.game_time = if seconds.is_finite() { seconds } else { 0.0 };
    }

    /// Jumps to mid-night from the first half of the cycle and to mid-day from the second.
    ///
    /// Returns the progress after the jump.
    pub fn toggle_time_of_day(&mut self) -> f64 {
        let target = if self.progress() < 0.5 { 0.75 } else { 0.25 };
        self.set_game_time(target * self.config.cycle_duration_secs);
        self.progress()
    }

    /// Current position within the cycle.
    #[must_use]
    pub fn progress(&self) -> f64 {
        cycle_progress(self.game_time, self.config.cycle_duration_secs)
    }

    /// Reports whether the cycle is currently in its night window.
    #[must_use]
    pub fn is_night(&self) -> bool {
        is_night(self.progress())
    }

    /// Derives the full environment state for the current clock.
    #[must_use]
    pub fn sample(&self) -> CycleState {
        derive_state(self.progress(), &self.config)
    }
}

impl Default for DayNightSimulator {
    fn default() -> Self {
        Self {
            config: DayNightConfig::default(),
            game_time: 0.0,
        }
    }
}

fn derive_state(progress: f64, config: &DayNightConfig) -> CycleState {
    let palette = &config.palette;
    let (sky_color, cloud_color) = sky_and_clouds(progress, palette);
    let night = is_night(progress);

    let angle = progress * 2.0 * PI + PI / 2.0;
    let (sin, cos) = angle.sin_cos();
    let (sin, cos) = (sin as f32, cos as f32);
    let radius = config.celestial_radius;
    let sun_position = Vec3::new(radius * cos, radius * sin, -radius);

    let night_ambience_volume = night_ambience_volume(progress);

    CycleState {
        progress,
        sky_color,
        cloud_color,
        sun_visible: sin >= 0.0,
        sun_position,
        sun_color: palette.sun_horizon.lerp(palette.sun_zenith, sin),
        moon_visible: sin <= 0.0,
        moon_position: -sun_position,
        stars_visible: sin < 0.0,
        ambient_intensity: (0.5 + 0.5 * sin).max(0.0),
        directional_intensity: (0.8 * sin).max(0.0),
        hemisphere_intensity: (0.4 * -sin).max(0.0),
        night_ambience_volume,
        rain_volume: night_ambience_volume * config.rain_factor,
        rain_visible: night,
        is_night: night,
        toggle_icon: if progress < NIGHT_START {
            TimeOfDayIcon::Moon
        } else {
            TimeOfDayIcon::Sun
        },
    }
}

fn sky_and_clouds(progress: f64, palette: &Palette) -> (Rgb, Rgb) {
    let (mut sky, mut clouds) = if progress < DUSK_START {
        (palette.day, palette.day_cloud)
    } else if progress < NIGHT_START {
        let t = ((progress - DUSK_START) / TRANSITION) as f32;
        (
            palette.day.lerp(palette.dusk, t),
            palette.day_cloud.lerp(palette.night_cloud, t),
        )
    } else if progress < DAWN_START {
        let t = ((progress - NIGHT_START) / TRANSITION).min(1.0) as f32;
        (palette.dusk.lerp(palette.night, t), palette.night_cloud)
    } else {
        let t = ((progress - DAWN_START) / TRANSITION) as f32;
        (
            palette.night.lerp(palette.dawn, t),
            palette.night_cloud.lerp(palette.day_cloud, t),
        )
    };

    // Overlaps the dawn window and takes precedence over it.
    if progress > DAY_RESTORE_START {
        let t = ((progress - DAY_RESTORE_START) / (1.0 - DAY_RESTORE_START)) as f32;
        sky = palette.dawn.lerp(palette.day, t);
        clouds = palette.day_cloud;
    }

    (sky, clouds)
}
