use crate::wave::WaveDims;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Discrete classification of the wave's instantaneous displacement and
/// volatility. The set of moods is closed; adding a variant requires
/// extending the style table below, which the compiler enforces.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Euphoric,
    Optimistic,
    Neutral,
    Pessimistic,
    Despair,
}

/// Fixed presentation config associated with each mood. Intensity is in
/// (0, 1] and scales the preset frequency/speed overrides as well as the
/// particle overlay.
#[derive(Clone, Copy, Debug)]
pub struct MoodStyle {
    pub label: &'static str,
    pub color: &'static str,
    pub intensity: f32,
    pub description: &'static str,
}

impl Mood {
    /// In enum order. Number keys 1-5 index into this.
    pub const ALL: [Mood; 5] = [
        Mood::Euphoric,
        Mood::Optimistic,
        Mood::Neutral,
        Mood::Pessimistic,
        Mood::Despair,
    ];

    pub const fn style(self) -> &'static MoodStyle {
        match self {
            Mood::Euphoric => &MoodStyle {
                label: "EUPHORIC",
                color: "#fbbf24",
                intensity: 1.0,
                description: "peak displacement, maximum chaos",
            },
            Mood::Optimistic => &MoodStyle {
                label: "OPTIMISTIC",
                color: "#4ade80",
                intensity: 0.6,
                description: "riding high on the upswing",
            },
            Mood::Neutral => &MoodStyle {
                label: "NEUTRAL",
                color: "#9ca3af",
                intensity: 0.3,
                description: "emotional equilibrium",
            },
            Mood::Pessimistic => &MoodStyle {
                label: "PESSIMISTIC",
                color: "#60a5fa",
                intensity: 0.7,
                description: "sliding down the trough",
            },
            Mood::Despair => &MoodStyle {
                label: "DESPAIR",
                color: "#ef4444",
                intensity: 0.9,
                description: "bottomed out in the churn",
            },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Mood::Euphoric => "euphoric",
            Mood::Optimistic => "optimistic",
            Mood::Neutral => "neutral",
            Mood::Pessimistic => "pessimistic",
            Mood::Despair => "despair",
        }
    }

    pub const fn color(self) -> &'static str {
        self.style().color
    }

    pub const fn intensity(self) -> f32 {
        self.style().intensity
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euphoric" => Ok(Mood::Euphoric),
            "optimistic" => Ok(Mood::Optimistic),
            "neutral" => Ok(Mood::Neutral),
            "pessimistic" => Ok(Mood::Pessimistic),
            "despair" => Ok(Mood::Despair),
            other => Err(format!("unknown mood: {}", other)),
        }
    }
}

/// Classify the y coordinate of the tracked point, given the current
/// volatility score. High volatility dominates: only the sign of the
/// displacement matters once the wave is rough enough. All comparisons are
/// strict so boundary values resolve deterministically.
pub fn classify(y: f32, volatility: f32, dims: WaveDims) -> Mood {
    let dy = (y - dims.center_y) / dims.amplitude;
    if volatility > 0.7 {
        if dy > 0.0 {
            Mood::Euphoric
        } else {
            Mood::Despair
        }
    } else if dy > 0.4 {
        Mood::Optimistic
    } else if dy < -0.4 {
        Mood::Pessimistic
    } else {
        Mood::Neutral
    }
}
