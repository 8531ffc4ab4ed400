use crate::mood::Mood;
use rand::Rng;

pub const TICK_RATE_HZ: f32 = 60.0;
pub const DEFAULT_FREQUENCY: f32 = 1.0;
pub const DEFAULT_SPEED: f32 = 0.01;

// The chaos level steps up every 3 seconds of simulated time and the whole
// cycle resets after 20 seconds.
const TICKS_PER_CHAOS_LEVEL: f32 = 180.0;
const CYCLE_TICKS: f32 = 1200.0;

/// State owned exclusively by [`AnimationClock`]. `frequency` and
/// `animation_speed` are derived from `time` on every tick; the only writes
/// that bypass the derivation are the explicit one-shot overrides
/// ([`AnimationClock::randomize`], [`AnimationClock::set_preset`],
/// [`AnimationClock::reset`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveState {
    pub time: f32,
    pub frequency: f32,
    pub animation_speed: f32,
    pub paused: bool,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            time: 0.0,
            frequency: DEFAULT_FREQUENCY,
            animation_speed: DEFAULT_SPEED,
            paused: false,
        }
    }
}

/// Advances the time accumulator at a fixed conceptual 60 Hz and derives the
/// frequency and animation speed from how far into the current cycle the
/// clock has progressed. All timer callbacks in the app funnel through a
/// single owner of this struct, so no other code ever races on the state.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationClock {
    state: WaveState,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a non-default state, e.g. when the initial configuration
    /// overrides the frequency.
    pub fn with_state(state: WaveState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> WaveState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    /// Advance one tick. Does nothing while paused. Progression builds up
    /// chaos in discrete levels until the cycle boundary, where everything
    /// snaps back to the defaults.
    pub fn tick(&mut self) {
        if self.state.paused {
            return;
        }
        self.state.time += self.state.animation_speed;
        let cycle_ticks = self.state.time * TICK_RATE_HZ;
        let level = (cycle_ticks / TICKS_PER_CHAOS_LEVEL).floor();
        self.state.frequency = DEFAULT_FREQUENCY + level * 0.5;
        self.state.animation_speed = DEFAULT_SPEED + level * 0.005;
        if cycle_ticks > CYCLE_TICKS {
            self.state.time = 0.0;
            self.state.frequency = DEFAULT_FREQUENCY;
            self.state.animation_speed = DEFAULT_SPEED;
        }
    }

    pub fn pause(&mut self) {
        self.state.paused = true;
    }

    pub fn resume(&mut self) {
        self.state.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.state.paused = !self.state.paused;
    }

    /// Back to defaults and running, regardless of the current state.
    pub fn reset(&mut self) {
        self.state = WaveState::default();
    }

    /// One-shot random jump to a fresh mood. The next tick resumes deriving
    /// frequency and speed from the new time value.
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        self.state.time = rng.random_range(0.0..10.0);
        self.state.frequency = rng.random_range(0.5..3.0);
        self.state.animation_speed = rng.random_range(0.01..0.03);
    }

    /// One-shot jump to a preset mood, scaled by the mood's fixed intensity.
    pub fn set_preset(&mut self, mood: Mood, rng: &mut impl Rng) {
        let intensity = mood.intensity();
        self.state.time = rng.random_range(0.0..5.0);
        self.state.frequency = DEFAULT_FREQUENCY + intensity * 2.0;
        self.state.animation_speed = DEFAULT_SPEED + intensity * 0.015;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn chaos_builds_up_in_levels() {
        let mut clock = AnimationClock::new();
        // 3 seconds of simulated time at the initial speed is 300 ticks
        for _ in 0..301 {
            clock.tick();
        }
        let state = clock.state();
        assert!(state.frequency > DEFAULT_FREQUENCY);
        assert!(state.animation_speed > DEFAULT_SPEED);
    }

    #[test]
    fn cycle_closes_back_to_exact_defaults() {
        let mut clock = AnimationClock::new();
        let mut closed = false;
        for _ in 0..20_000 {
            clock.tick();
            let state = clock.state();
            if state.time == 0.0 {
                assert_eq!(state.frequency, DEFAULT_FREQUENCY);
                assert_eq!(state.animation_speed, DEFAULT_SPEED);
                closed = true;
                break;
            }
        }
        assert!(closed, "cycle never closed");
    }

    #[test]
    fn tick_is_a_no_op_while_paused() {
        let mut clock = AnimationClock::new();
        clock.tick();
        clock.pause();
        let before = clock.state();
        clock.tick();
        assert_eq!(clock.state(), before);
        clock.resume();
        clock.tick();
        assert!(clock.state().time > before.time);
    }

    #[test]
    fn reset_restores_defaults_from_any_state() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut clock = AnimationClock::new();
        clock.randomize(&mut rng);
        clock.pause();
        clock.reset();
        assert_eq!(clock.state(), WaveState::default());
    }

    #[test]
    fn randomize_stays_within_documented_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut clock = AnimationClock::new();
        for _ in 0..100 {
            clock.randomize(&mut rng);
            let state = clock.state();
            assert!((0.0..10.0).contains(&state.time));
            assert!((0.5..3.0).contains(&state.frequency));
            assert!((0.01..0.03).contains(&state.animation_speed));
        }
    }

    #[test]
    fn despair_preset_override() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut clock = AnimationClock::new();
        clock.set_preset(Mood::Despair, &mut rng);
        let state = clock.state();
        assert_close(state.frequency, 2.8);
        assert_close(state.animation_speed, 0.0235);
        assert!((0.0..5.0).contains(&state.time));
    }

    #[test]
    fn preset_override_is_one_shot() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut clock = AnimationClock::new();
        clock.set_preset(Mood::Neutral, &mut rng);
        clock.tick();
        let state = clock.state();
        // Frequency is back on the derived staircase rather than the preset
        // formula.
        let cycle_ticks = state.time * TICK_RATE_HZ;
        let level = (cycle_ticks / TICKS_PER_CHAOS_LEVEL).floor();
        assert_close(state.frequency, DEFAULT_FREQUENCY + level * 0.5);
    }
}
