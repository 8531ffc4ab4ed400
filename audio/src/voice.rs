use std::f32::consts::PI;
use vibewave_core::Mood;

/// Waveform assigned to each mood. A closed enum rather than a trait since
/// the voice switches waveform at runtime as the mood changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoodWaveform {
    Sine,
    Triangle,
    Saw,
    Square,
}

impl MoodWaveform {
    /// Sample the waveform at a phase in [0, 1).
    pub fn sample(self, state_01: f32) -> f32 {
        match self {
            MoodWaveform::Sine => (state_01 * PI * 2.0).sin(),
            MoodWaveform::Triangle => {
                (((state_01 * 2.0) - 1.0).abs() * 2.0) - 1.0
            }
            MoodWaveform::Saw => (state_01 * 2.0) - 1.0,
            MoodWaveform::Square => {
                if state_01 < 0.5 {
                    -1.0
                } else {
                    1.0
                }
            }
        }
    }
}

/// Base pitch for each mood, roughly a descending scale from A4 down to D3
/// as the mood darkens.
pub const fn base_freq_hz(mood: Mood) -> f32 {
    match mood {
        Mood::Euphoric => 440.0,
        Mood::Optimistic => 329.0,
        Mood::Neutral => 261.0,
        Mood::Pessimistic => 196.0,
        Mood::Despair => 146.0,
    }
}

pub const fn waveform(mood: Mood) -> MoodWaveform {
    match mood {
        Mood::Euphoric => MoodWaveform::Saw,
        Mood::Optimistic => MoodWaveform::Triangle,
        Mood::Neutral => MoodWaveform::Sine,
        Mood::Pessimistic => MoodWaveform::Square,
        Mood::Despair => MoodWaveform::Sine,
    }
}

/// The wave frequency nudges the pitch away from the mood's base note.
pub fn modulated_freq_hz(mood: Mood, frequency: f32) -> f32 {
    base_freq_hz(mood) + (frequency - 1.0) * 50.0
}

/// Rougher waves open the filter up.
pub fn cutoff_hz(volatility: f32) -> f32 {
    1000.0 + volatility * 2000.0
}

/// Everything the output callback needs, swapped atomically as a unit when
/// the mood changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceParams {
    pub freq_hz: f32,
    pub waveform: MoodWaveform,
    pub cutoff_hz: f32,
    pub gain: f32,
    pub enabled: bool,
}

impl VoiceParams {
    // Keep it subtle.
    const GAIN: f32 = 0.1;

    pub fn silent() -> Self {
        Self {
            freq_hz: base_freq_hz(Mood::Neutral),
            waveform: waveform(Mood::Neutral),
            cutoff_hz: cutoff_hz(0.0),
            gain: Self::GAIN,
            enabled: false,
        }
    }

    pub fn for_state(
        mood: Mood,
        frequency: f32,
        volatility: f32,
        enabled: bool,
    ) -> Self {
        Self {
            freq_hz: modulated_freq_hz(mood, frequency),
            waveform: waveform(mood),
            cutoff_hz: cutoff_hz(volatility),
            gain: Self::GAIN,
            enabled,
        }
    }
}
