pub mod wave;
pub use wave::{
    NUM_SEGMENTS, WaveDims, WavePoint, tracked_index, tracked_point,
    wave_points,
};

pub mod volatility;
pub use volatility::volatility;

pub mod mood;
pub use mood::{Mood, MoodStyle, classify};

pub mod clock;
pub use clock::{AnimationClock, WaveState};

pub mod toast;
pub use toast::{Toast, ToastKind, ToastSlot};
