use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// The wave is sampled at `NUM_SEGMENTS + 1` evenly spaced x positions so
/// that both endpoints of the rendered path land exactly on the edges of the
/// drawing area.
pub const NUM_SEGMENTS: usize = 200;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct WavePoint {
    pub x: f32,
    pub y: f32,
}

/// Dimensions of the area the wave is rendered into. All wave math is
/// expressed in terms of these so the core carries no ambient knowledge of
/// the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveDims {
    pub width: f32,
    pub center_y: f32,
    pub amplitude: f32,
    pub wave_length: f32,
}

impl Default for WaveDims {
    fn default() -> Self {
        Self {
            width: 800.0,
            center_y: 140.0,
            amplitude: 100.0,
            wave_length: 800.0,
        }
    }
}

/// Fill `out` with the chaos-modulated sine wave at the given time offset and
/// frequency. The base sinusoid is perturbed by three additional partials
/// whose amplitudes scale with how far the frequency has climbed above 1,
/// capped so extreme frequencies don't swamp the base shape.
pub fn wave_points(
    time_offset: f32,
    frequency: f32,
    dims: WaveDims,
    out: &mut Vec<WavePoint>,
) {
    out.clear();
    let chaos = (frequency - 1.0).min(4.0);
    for i in 0..=NUM_SEGMENTS {
        let x = (i as f32 / NUM_SEGMENTS as f32) * dims.width;
        let angle =
            (x / dims.wave_length) * 2.0 * PI * frequency + time_offset;
        let y = dims.center_y
            + dims.amplitude * angle.sin()
            + chaos * 15.0 * (3.0 * angle + 2.0 * time_offset).sin()
            + chaos * 10.0 * (0.5 * angle + 0.3 * time_offset).sin()
            + chaos * 5.0 * (7.0 * angle + 5.0 * time_offset).sin();
        out.push(WavePoint { x, y });
    }
}

/// Index of the tracked dot that rides along the wave. The dot completes a
/// traversal of the wave once every `1 / 0.3` time units.
pub fn tracked_index(time: f32, num_points: usize) -> usize {
    if num_points == 0 {
        return 0;
    }
    let progress = (time * 0.3).rem_euclid(1.0);
    (progress * (num_points - 1) as f32) as usize
}

pub fn tracked_point(time: f32, points: &[WavePoint]) -> Option<WavePoint> {
    points.get(tracked_index(time, points.len())).copied()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn point_count_and_x_coverage() {
        let dims = WaveDims::default();
        let mut points = Vec::new();
        for frequency in [0.5, 1.0, 2.8, 5.0] {
            wave_points(1.25, frequency, dims, &mut points);
            assert_eq!(points.len(), NUM_SEGMENTS + 1);
            assert_eq!(points[0].x, 0.0);
            assert_eq!(points[NUM_SEGMENTS].x, dims.width);
            let step = dims.width / NUM_SEGMENTS as f32;
            for (i, point) in points.iter().enumerate() {
                assert!((point.x - i as f32 * step).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let dims = WaveDims::default();
        let mut a = Vec::new();
        let mut b = Vec::new();
        wave_points(3.7, 2.5, dims, &mut a);
        wave_points(3.7, 2.5, dims, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn unit_frequency_is_a_pure_sine() {
        let dims = WaveDims::default();
        let mut points = Vec::new();
        wave_points(0.0, 1.0, dims, &mut points);
        for point in &points {
            let angle = (point.x / dims.wave_length) * 2.0 * PI;
            let expected = dims.center_y + dims.amplitude * angle.sin();
            assert!((point.y - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn tracked_index_stays_in_bounds() {
        for i in 0..1000 {
            let time = i as f32 * 0.173;
            let index = tracked_index(time, NUM_SEGMENTS + 1);
            assert!(index <= NUM_SEGMENTS);
        }
        assert_eq!(tracked_index(5.0, 0), 0);
    }

    #[test]
    fn tracked_point_none_for_empty_sequence() {
        assert_eq!(tracked_point(1.0, &[]), None);
    }
}
