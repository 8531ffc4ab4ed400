use crate::wave::WavePoint;

/// Normalized mean absolute first difference of the y coordinates, clamped
/// to [0, 1]. This is a rough-and-ready proxy for how jagged the wave
/// currently looks, not a statistically rigorous volatility measure.
pub fn volatility(points: &[WavePoint], amplitude: f32) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    let total_variation = points
        .windows(2)
        .map(|pair| (pair[1].y - pair[0].y).abs())
        .sum::<f32>();
    (total_variation / (points.len() as f32 * amplitude)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::wave::{WaveDims, wave_points};

    #[test]
    fn short_sequences_have_zero_volatility() {
        assert_eq!(volatility(&[], 100.0), 0.0);
        assert_eq!(volatility(&[WavePoint { x: 0.0, y: 50.0 }], 100.0), 0.0);
    }

    #[test]
    fn flat_sequence_has_zero_volatility() {
        let points = (0..10)
            .map(|i| WavePoint {
                x: i as f32,
                y: 140.0,
            })
            .collect::<Vec<_>>();
        assert_eq!(volatility(&points, 100.0), 0.0);
    }

    #[test]
    fn always_within_unit_interval() {
        let dims = WaveDims::default();
        let mut points = Vec::new();
        for frequency in [0.5, 1.0, 3.0, 5.0, 9.9] {
            wave_points(2.0, frequency, dims, &mut points);
            let v = volatility(&points, dims.amplitude);
            assert!((0.0..=1.0).contains(&v), "{frequency} -> {v}");
        }
    }

    #[test]
    fn chaotic_wave_is_more_volatile_than_calm_wave() {
        let dims = WaveDims::default();
        let mut calm = Vec::new();
        let mut chaotic = Vec::new();
        wave_points(0.0, 1.0, dims, &mut calm);
        wave_points(0.0, 5.0, dims, &mut chaotic);
        assert!(
            volatility(&chaotic, dims.amplitude)
                > volatility(&calm, dims.amplitude)
        );
    }
}
