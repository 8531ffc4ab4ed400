use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use vibewave_core::{Mood, WavePoint, WaveState};

/// Keep every 10th point so the snapshot stays readable.
const POINT_SAMPLE_STRIDE: usize = 10;

/// A single mood state frozen for export.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MoodSnapshot {
    pub mood: Mood,
    pub frequency: f32,
    pub volatility: f32,
    pub speed: f32,
    pub color: String,
    pub points: Vec<WavePoint>,
    pub timestamp_ms: u64,
}

impl MoodSnapshot {
    pub fn capture(
        mood: Mood,
        state: WaveState,
        volatility: f32,
        points: &[WavePoint],
        timestamp_ms: u64,
    ) -> Self {
        Self {
            mood,
            frequency: state.frequency,
            volatility,
            speed: state.animation_speed,
            color: mood.color().to_string(),
            points: points
                .iter()
                .step_by(POINT_SAMPLE_STRIDE)
                .copied()
                .collect(),
            timestamp_ms,
        }
    }
}

fn write_json(path: &Path, json: &str) -> anyhow::Result<()> {
    let mut file = File::create(path)?;
    write!(file, "{}", json)?;
    Ok(())
}

/// Write the snapshot as JSON into `dir`, returning the path written.
pub fn write_snapshot(
    dir: &Path,
    snapshot: &MoodSnapshot,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(format!(
        "vibewave-snapshot-{}.json",
        snapshot.timestamp_ms
    ));
    write_json(&path, &serde_json::to_string_pretty(snapshot)?)?;
    Ok(path)
}

/// Write an already-serialized history dump into `dir`.
pub fn write_history_json(
    dir: &Path,
    json: &str,
    timestamp_ms: u64,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(format!("vibewave-history-{}.json", timestamp_ms));
    write_json(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;
    use vibewave_core::{NUM_SEGMENTS, WaveDims, wave_points};

    fn snapshot() -> MoodSnapshot {
        let dims = WaveDims::default();
        let mut points = Vec::new();
        wave_points(1.0, 2.8, dims, &mut points);
        let state = WaveState {
            time: 1.0,
            frequency: 2.8,
            animation_speed: 0.0235,
            paused: false,
        };
        MoodSnapshot::capture(Mood::Despair, state, 0.42, &points, 1234)
    }

    #[test]
    fn capture_truncates_the_point_sample() {
        let snapshot = snapshot();
        assert_eq!(
            snapshot.points.len(),
            NUM_SEGMENTS / POINT_SAMPLE_STRIDE + 1
        );
        assert_eq!(snapshot.color, Mood::Despair.color());
        assert_eq!(snapshot.speed, 0.0235);
    }

    #[test]
    fn snapshot_json_round_trip() {
        let snapshot = snapshot();
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let parsed: MoodSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn files_land_in_the_given_directory() {
        let dir = std::env::temp_dir();
        let snapshot = snapshot();
        let path = write_snapshot(&dir, &snapshot).unwrap();
        assert!(path.starts_with(&dir));
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
        let path = write_history_json(&dir, "[]", 99).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }
}
