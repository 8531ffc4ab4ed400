pub mod voice;
pub use voice::{
    MoodWaveform, VoiceParams, base_freq_hz, cutoff_hz, modulated_freq_hz,
    waveform,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};
use vibewave_core::Mood;

/// Single-voice audio feedback. The output callback owns the phase
/// accumulator and filter state; the rest of the app only ever swaps the
/// [`VoiceParams`] behind the shared mutex.
pub struct AudioEngine {
    _stream: cpal::Stream,
    params: Arc<Mutex<VoiceParams>>,
}

impl AudioEngine {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        log::info!("cpal host: {}", host.id().name());
        let device = host
            .default_output_device()
            .ok_or(anyhow::anyhow!("no output device"))?;
        if let Ok(name) = device.name() {
            log::info!("cpal device: {}", name);
        }
        let config = device.default_output_config()?;
        let sample_rate_hz = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        log::info!("sample rate: {}", sample_rate_hz);
        let params = Arc::new(Mutex::new(VoiceParams::silent()));
        let stream = device.build_output_stream(
            &config.into(),
            {
                let params = Arc::clone(&params);
                let mut state_01 = 0.0f32;
                let mut filter_state = 0.0f32;
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let Ok(params) = params.lock() else {
                        data.fill(0.0);
                        return;
                    };
                    let alpha = (2.0 * PI * params.cutoff_hz
                        / sample_rate_hz)
                        .min(1.0);
                    for frame in data.chunks_mut(channels) {
                        state_01 = (state_01
                            + params.freq_hz / sample_rate_hz)
                            .rem_euclid(1.0);
                        let raw = params.waveform.sample(state_01);
                        filter_state += alpha * (raw - filter_state);
                        let sample = if params.enabled {
                            filter_state * params.gain
                        } else {
                            0.0
                        };
                        for element in frame {
                            *element = sample;
                        }
                    }
                }
            },
            |err| log::error!("stream error: {}", err),
            None,
        )?;
        stream.play()?;
        Ok(Self {
            _stream: stream,
            params,
        })
    }

    /// Retune the voice to the current mood state. Enabled-ness is
    /// preserved.
    pub fn set_voice(&self, mood: Mood, frequency: f32, volatility: f32) {
        let Ok(mut params) = self.params.lock() else {
            return;
        };
        let enabled = params.enabled;
        *params = VoiceParams::for_state(mood, frequency, volatility, enabled);
    }

    pub fn set_enabled(&self, enabled: bool) {
        if let Ok(mut params) = self.params.lock() {
            params.enabled = enabled;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.params.lock().map(|params| params.enabled).unwrap_or(false)
    }
}
