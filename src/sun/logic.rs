use bevy::math::Vec3;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Horizontal axis the sun's elevation angle is measured against.
pub const HORIZON_AXIS: Vec3 = Vec3::new(1.0, 0.0, 1.0);

/// Below this angle to the horizon axis a forward-moving sun has set.
pub const HORIZON_ENTER: f32 = 5.0;
/// Above this angle a reverse-moving sun has set on the opposite side.
pub const HORIZON_EXIT: f32 = 175.0;

const ZENITH_LOW: f32 = 89.9;
const ZENITH_HIGH: f32 = 90.1;

// Per-frame easing gains
const HORIZON_SLOWDOWN: f32 = 120.0;
const ZENITH_SPEEDUP: f32 = 3.0;
const COLOR_BLEND: f32 = 10.0;
// Near the horizon the sun keeps at least this share of its cruise step
const HORIZON_CRAWL: f32 = 0.05;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunSettings {
    /// Orbit radius around the origin.
    pub radius: f32,
    /// Cruising angular speed in radians per second.
    pub desired_speed: f32,
    /// Seconds spent below the horizon before reversing.
    pub idle_time: f32,
    pub min_exposure: f32,
    pub max_exposure: f32,
    /// Scales the sun colours into HDR range.
    pub bloom_factor: f32,
    pub white: [f32; 3],
    pub orange: [f32; 3],
    /// Pins the sun at `stationary_position` and skips animation.
    pub stationary: bool,
    pub stationary_position: [f32; 3],
    pub initial_position: [f32; 3],
}

impl Default for SunSettings {
    fn default() -> Self {
        Self {
            radius: 1.7,
            desired_speed: 0.4,
            idle_time: 1.0,
            min_exposure: 0.05,
            max_exposure: 0.75,
            bloom_factor: 5.0,
            white: [1.0, 0.85, 0.55],
            orange: [1.0, 0.5, 0.05],
            stationary: false,
            stationary_position: [1.0, 0.75, 1.0],
            initial_position: [0.0, 0.1, 0.0],
        }
    }
}

impl SunSettings {
    /// Colour near the zenith.
    pub fn hot_color(&self) -> Vec3 {
        Vec3::from_array(self.white) * self.bloom_factor
    }

    /// Colour near the horizon.
    pub fn cold_color(&self) -> Vec3 {
        Vec3::from_array(self.orange) * self.bloom_factor
    }

    /// Exposure bounds, ordered even if configured backwards.
    pub fn exposure_range(&self) -> (f32, f32) {
        let (a, b) = (self.min_exposure, self.max_exposure);
        if a <= b { (a, b) } else { (b, a) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunDirection {
    Forward,
    Reverse,
}

impl SunDirection {
    pub fn sign(self) -> f32 {
        match self {
            SunDirection::Forward => 1.0,
            SunDirection::Reverse => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SunDirection::Forward => SunDirection::Reverse,
            SunDirection::Reverse => SunDirection::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SunMotion {
    Moving(SunDirection),
    /// Parked below the horizon until `elapsed` reaches the idle time.
    Waiting { resume: SunDirection, elapsed: f32 },
}

/// Which easing regime applies at the current angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyBand {
    /// Past the zenith in the direction of travel: slow down, cool, darken.
    Setting,
    /// Before the zenith: speed up, heat, brighten.
    Rising,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SunTransition {
    StartedWaiting { resume: SunDirection },
    ResumedMoving(SunDirection),
}

/// Animated light shared by the terrain, sun and post-process passes.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LightState {
    pub position: Vec3,
    pub diffuse: Vec3,
    pub exposure: f32,
    /// Orbit parameter in radians.
    pub phase: f32,
    /// Phase change per second during the last step.
    pub angular_velocity: f32,
    /// Degrees between the sun direction and [`HORIZON_AXIS`].
    pub sun_angle: f32,
    pub motion: SunMotion,
}

impl LightState {
    pub fn new(settings: &SunSettings) -> Self {
        let position = if settings.stationary {
            Vec3::from_array(settings.stationary_position)
        } else {
            Vec3::from_array(settings.initial_position)
        };
        Self {
            position,
            diffuse: settings.hot_color(),
            exposure: settings.exposure_range().1,
            phase: 0.0,
            angular_velocity: 0.0,
            sun_angle: angle_to_horizon(position),
            motion: SunMotion::Moving(SunDirection::Forward),
        }
    }

    /// Seconds spent waiting so far, zero while moving.
    pub fn waiting_elapsed(&self) -> f32 {
        match self.motion {
            SunMotion::Waiting { elapsed, .. } => elapsed,
            SunMotion::Moving(_) => 0.0,
        }
    }

    /// Advance the animation by `dt` seconds.
    pub fn tick(&mut self, settings: &SunSettings, dt: f32) -> Option<SunTransition> {
        if settings.stationary {
            self.position = Vec3::from_array(settings.stationary_position);
            self.sun_angle = angle_to_horizon(self.position);
            return None;
        }

        match self.motion {
            SunMotion::Waiting { resume, elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= settings.idle_time {
                    self.motion = SunMotion::Moving(resume);
                    return Some(SunTransition::ResumedMoving(resume));
                }
                self.motion = SunMotion::Waiting { resume, elapsed };
                None
            }
            SunMotion::Moving(direction) => {
                self.sun_angle = angle_to_horizon(self.position);
                self.advance(settings, direction, dt);
                self.check_horizon(direction)
            }
        }
    }

    fn advance(&mut self, settings: &SunSettings, direction: SunDirection, dt: f32) {
        let eased = ease_in_out_sine(dt);
        let (min_exposure, max_exposure) = settings.exposure_range();
        let cruise = settings.desired_speed * direction.sign();
        let step = dt * cruise;

        let (step, color_target, exposure_target) = match sky_band(self.sun_angle, direction) {
            SkyBand::Setting => (
                lerp(step, 0.0, gain(eased, HORIZON_SLOWDOWN).min(1.0 - HORIZON_CRAWL)),
                settings.cold_color(),
                min_exposure,
            ),
            SkyBand::Rising => (
                lerp(step, cruise, gain(eased, ZENITH_SPEEDUP)),
                settings.hot_color(),
                max_exposure,
            ),
        };

        let blend = gain(eased, COLOR_BLEND);
        self.phase += step;
        self.angular_velocity = if dt > 0.0 { step / dt } else { 0.0 };
        self.diffuse = self.diffuse.lerp(color_target, blend);
        self.exposure = lerp(self.exposure, exposure_target, blend).clamp(min_exposure, max_exposure);
        self.position = orbit_position(settings.radius, self.phase);
    }

    fn check_horizon(&mut self, direction: SunDirection) -> Option<SunTransition> {
        let below = match direction {
            SunDirection::Forward => self.sun_angle < HORIZON_ENTER,
            SunDirection::Reverse => self.sun_angle > HORIZON_EXIT,
        };
        if !below {
            return None;
        }
        let resume = direction.flipped();
        self.motion = SunMotion::Waiting {
            resume,
            elapsed: 0.0,
        };
        Some(SunTransition::StartedWaiting { resume })
    }
}

pub fn ease_in_out_sine(x: f32) -> f32 {
    -((PI * x).cos() - 1.0) / 2.0
}

/// Degrees between `position` (seen from the origin) and the horizon axis.
pub fn angle_to_horizon(position: Vec3) -> f32 {
    let cos = position
        .normalize_or_zero()
        .dot(HORIZON_AXIS.normalize())
        .clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Point on the tilted orbit for phase `phase`.
pub fn orbit_position(radius: f32, phase: f32) -> Vec3 {
    let across = -radius * phase.cos();
    Vec3::new(across, radius * phase.sin(), across)
}

pub fn sky_band(sun_angle: f32, direction: SunDirection) -> SkyBand {
    let setting = match direction {
        SunDirection::Forward => sun_angle < ZENITH_LOW,
        SunDirection::Reverse => sun_angle > ZENITH_HIGH,
    };
    if setting {
        SkyBand::Setting
    } else {
        SkyBand::Rising
    }
}

fn gain(eased: f32, factor: f32) -> f32 {
    (eased * factor).clamp(0.0, 1.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FRAME: f32 = 1.0 / 60.0;

    fn run_until_transition(
        state: &mut LightState,
        settings: &SunSettings,
        max_ticks: usize,
    ) -> Option<(usize, SunTransition)> {
        (0..max_ticks).find_map(|i| state.tick(settings, FRAME).map(|t| (i, t)))
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.5, 0.5)]
    #[case(1.0, 1.0)]
    #[case(0.25, 0.146_446_6)]
    fn test_ease_in_out_sine(#[case] x: f32, #[case] expected: f32) {
        assert!((ease_in_out_sine(x) - expected).abs() < 1e-5);
    }

    #[rstest]
    #[case(Vec3::new(1.0, 0.0, 1.0), 0.0)]
    #[case(Vec3::new(0.0, 1.0, 0.0), 90.0)]
    #[case(Vec3::new(-1.0, 0.0, -1.0), 180.0)]
    #[case(Vec3::ZERO, 90.0)]
    fn test_angle_to_horizon(#[case] position: Vec3, #[case] expected: f32) {
        assert!((angle_to_horizon(position) - expected).abs() < 0.01);
    }

    #[test]
    fn test_initial_state() {
        let settings = SunSettings::default();
        let state = LightState::new(&settings);

        assert_eq!(state.position, Vec3::new(0.0, 0.1, 0.0));
        assert_eq!(state.exposure, 0.75);
        assert_eq!(state.diffuse, settings.hot_color());
        assert_eq!(state.motion, SunMotion::Moving(SunDirection::Forward));
    }

    #[test]
    fn test_zenith_keeps_full_exposure() {
        let settings = SunSettings::default();
        let mut state = LightState::new(&settings);
        state.position = Vec3::new(0.0, 1.7, 0.0);

        let transition = state.tick(&settings, 0.016);

        assert!((state.sun_angle - 90.0).abs() < 0.01);
        assert_eq!(sky_band(state.sun_angle, SunDirection::Forward), SkyBand::Rising);
        assert_eq!(state.exposure, settings.max_exposure);
        assert!(state.phase > 0.0);
        assert_eq!(transition, None);
    }

    #[rstest]
    #[case(SunDirection::Forward, 45.0, SkyBand::Setting)]
    #[case(SunDirection::Forward, 135.0, SkyBand::Rising)]
    #[case(SunDirection::Reverse, 45.0, SkyBand::Rising)]
    #[case(SunDirection::Reverse, 135.0, SkyBand::Setting)]
    #[case(SunDirection::Forward, 90.0, SkyBand::Rising)]
    #[case(SunDirection::Reverse, 90.0, SkyBand::Rising)]
    fn test_sky_band(
        #[case] direction: SunDirection,
        #[case] angle: f32,
        #[case] expected: SkyBand,
    ) {
        assert_eq!(sky_band(angle, direction), expected);
    }

    #[rstest]
    #[case(FRAME)]
    #[case(0.001)]
    #[case(0.1)]
    #[case(0.5)]
    fn test_exposure_and_colour_stay_bounded(#[case] dt: f32) {
        let settings = SunSettings::default();
        let mut state = LightState::new(&settings);
        let hot = settings.hot_color();
        let cold = settings.cold_color();

        for _ in 0..20_000 {
            state.tick(&settings, dt);
            assert!(
                (settings.min_exposure..=settings.max_exposure).contains(&state.exposure),
                "exposure {}",
                state.exposure
            );

            // diffuse stays on the segment between the two sun colours
            let span = hot - cold;
            let t = (state.diffuse - cold).dot(span) / span.length_squared();
            let projected = cold + span * t;
            assert!((-1e-3..=1.0 + 1e-3).contains(&t), "t = {t}");
            assert!((state.diffuse - projected).length() < 1e-3);
        }
    }

    #[test]
    fn test_full_day_cycle() {
        let settings = SunSettings::default();
        let mut state = LightState::new(&settings);

        let (_, sunset) = run_until_transition(&mut state, &settings, 5_000).unwrap();
        assert_eq!(
            sunset,
            SunTransition::StartedWaiting {
                resume: SunDirection::Reverse
            }
        );
        assert!(state.sun_angle < HORIZON_ENTER);
        assert!(state.exposure < settings.max_exposure * 0.5, "exposure {}", state.exposure);

        let (waited, resumed) = run_until_transition(&mut state, &settings, 5_000).unwrap();
        assert_eq!(resumed, SunTransition::ResumedMoving(SunDirection::Reverse));
        assert!((59..=61).contains(&waited), "waited {waited} ticks");

        let (_, second_sunset) = run_until_transition(&mut state, &settings, 5_000).unwrap();
        assert_eq!(
            second_sunset,
            SunTransition::StartedWaiting {
                resume: SunDirection::Forward
            }
        );
        assert!(state.sun_angle > HORIZON_EXIT);
    }

    #[rstest]
    #[case(0.1)]
    #[case(0.5)]
    fn test_slow_frames_still_reach_horizon(#[case] dt: f32) {
        let settings = SunSettings::default();
        let mut state = LightState::new(&settings);

        let sunset = (0..20_000).find_map(|_| state.tick(&settings, dt));

        assert_eq!(
            sunset,
            Some(SunTransition::StartedWaiting {
                resume: SunDirection::Reverse
            })
        );
        assert!(state.sun_angle < HORIZON_ENTER);
    }

    #[test]
    fn test_waiting_resumes_exactly_once() {
        let settings = SunSettings::default();
        let mut state = LightState::new(&settings);
        state.motion = SunMotion::Waiting {
            resume: SunDirection::Reverse,
            elapsed: 0.0,
        };
        let phase = state.phase;

        for _ in 0..3 {
            assert_eq!(state.tick(&settings, 0.25), None);
        }
        assert_eq!(state.waiting_elapsed(), 0.75);
        assert_eq!(state.phase, phase);

        assert_eq!(
            state.tick(&settings, 0.25),
            Some(SunTransition::ResumedMoving(SunDirection::Reverse))
        );
        assert_eq!(state.motion, SunMotion::Moving(SunDirection::Reverse));
        assert_eq!(state.waiting_elapsed(), 0.0);
    }

    #[test]
    fn test_stationary_sun_is_pinned() {
        let settings = SunSettings {
            stationary: true,
            ..Default::default()
        };
        let mut state = LightState::new(&settings);

        for _ in 0..100 {
            assert_eq!(state.tick(&settings, FRAME), None);
        }
        assert_eq!(state.position, Vec3::new(1.0, 0.75, 1.0));
        assert_eq!(state.phase, 0.0);
    }

    #[test]
    fn test_zero_dt_does_not_move() {
        let settings = SunSettings::default();
        let mut state = LightState::new(&settings);
        state.tick(&settings, 0.0);
        assert_eq!(state.phase, 0.0);
        assert_eq!(state.angular_velocity, 0.0);
    }

    #[test]
    fn test_backwards_exposure_range_is_ordered() {
        let settings = SunSettings {
            min_exposure: 0.9,
            max_exposure: 0.1,
            ..Default::default()
        };
        assert_eq!(settings.exposure_range(), (0.1, 0.9));
    }
}
