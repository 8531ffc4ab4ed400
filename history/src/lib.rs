use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use vibewave_core::Mood;
use vibewave_persist::PersistData;

/// Oldest sessions are evicted first once the log is full.
pub const MAX_SESSIONS: usize = 50;

/// Sessions shorter than this are not worth recording.
pub const MIN_SESSION: Duration = Duration::from_secs(5);

/// How long a change to the tracked tuple has to stay put before it is
/// committed.
pub const DEBOUNCE: Duration = Duration::from_secs(2);

const LOG_KEY: &str = "sessions";

/// A closed interval of time during which the classified mood and its
/// defining inputs were considered current.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MoodSession {
    pub timestamp_ms: u64,
    pub mood: Mood,
    pub frequency: f32,
    pub volatility: f32,
    pub duration_ms: u64,
    pub color: String,
}

/// Ordered most-recent-last, capacity [`MAX_SESSIONS`]. Persisted whole on
/// every append.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SessionLog(Vec<MoodSession>);

impl PersistData for SessionLog {
    const NAME: &'static str = "mood_history";
}

impl SessionLog {
    pub fn push(&mut self, session: MoodSession) {
        self.0.push(session);
        if self.0.len() > MAX_SESSIONS {
            let excess = self.0.len() - MAX_SESSIONS;
            self.0.drain(..excess);
        }
    }

    pub fn sessions(&self) -> &[MoodSession] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The tuple whose changes delimit sessions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub mood: Mood,
    pub frequency: f32,
    pub volatility: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoodCount {
    pub mood: Mood,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statistics {
    pub total_sessions: usize,
    pub total_time_ms: u64,
    pub avg_volatility: f32,
    pub avg_frequency: f32,
    pub dominant_mood: Mood,
    /// Sorted descending by count; ties keep first-encountered order.
    pub distribution: Vec<MoodCount>,
}

/// Watches the (mood, frequency, volatility) tuple and records a session
/// whenever a change survives the debounce delay and the session it closes
/// lasted longer than [`MIN_SESSION`]. All time is injected; the recorder
/// owns no timers of its own.
pub struct SessionRecorder {
    log: SessionLog,
    boundary: Instant,
    boundary_epoch_ms: u64,
    tracked: Option<SessionSnapshot>,
    pending_deadline: Option<Instant>,
    persist: bool,
}

impl SessionRecorder {
    /// Load the persisted log, treating absence or a malformed blob as an
    /// empty history.
    pub fn load(now: Instant, epoch_ms: u64) -> Self {
        let log = SessionLog::load_(LOG_KEY).unwrap_or_default();
        log::info!("loaded {} recorded mood sessions", log.len());
        Self::with_log(log, now, epoch_ms, true)
    }

    /// A recorder that never touches the filesystem.
    pub fn in_memory(now: Instant, epoch_ms: u64) -> Self {
        Self::with_log(SessionLog::default(), now, epoch_ms, false)
    }

    fn with_log(
        log: SessionLog,
        now: Instant,
        epoch_ms: u64,
        persist: bool,
    ) -> Self {
        Self {
            log,
            boundary: now,
            boundary_epoch_ms: epoch_ms,
            tracked: None,
            pending_deadline: None,
            persist,
        }
    }

    /// Called every tick with the current tuple. A change (re)arms the
    /// debounce deadline, cancelling any commit already scheduled.
    pub fn observe(&mut self, snapshot: SessionSnapshot, now: Instant) {
        if self.tracked != Some(snapshot) {
            self.tracked = Some(snapshot);
            self.pending_deadline = Some(now + DEBOUNCE);
        }
    }

    /// Commit-if-stale. A no-op until the armed deadline passes; then the
    /// session since the last boundary is recorded if it lasted long enough,
    /// and the boundary restarts at the current instant either way.
    pub fn poll(&mut self, now: Instant, epoch_ms: u64) {
        let Some(deadline) = self.pending_deadline else {
            return;
        };
        if now < deadline {
            return;
        }
        self.pending_deadline = None;
        let duration = now.duration_since(self.boundary);
        if duration > MIN_SESSION {
            if let Some(snapshot) = self.tracked {
                self.log.push(MoodSession {
                    timestamp_ms: self.boundary_epoch_ms,
                    mood: snapshot.mood,
                    frequency: snapshot.frequency,
                    volatility: snapshot.volatility,
                    duration_ms: duration.as_millis() as u64,
                    color: snapshot.mood.color().to_string(),
                });
                if self.persist {
                    self.log.save_(LOG_KEY);
                }
            }
        }
        self.boundary = now;
        self.boundary_epoch_ms = epoch_ms;
    }

    pub fn sessions(&self) -> &[MoodSession] {
        self.log.sessions()
    }

    /// Empty the log and erase the persisted blob.
    pub fn clear(&mut self) {
        self.log = SessionLog::default();
        if self.persist {
            SessionLog::erase_(LOG_KEY);
        }
    }

    /// The full log as pretty-printed JSON.
    pub fn export_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.log)?)
    }

    /// Aggregates over the whole log. `None` when no sessions have been
    /// recorded yet.
    pub fn statistics(&self) -> Option<Statistics> {
        let sessions = self.log.sessions();
        if sessions.is_empty() {
            return None;
        }
        let total_sessions = sessions.len();
        let total_time_ms = sessions.iter().map(|s| s.duration_ms).sum();
        let avg_volatility = sessions.iter().map(|s| s.volatility).sum::<f32>()
            / total_sessions as f32;
        let avg_frequency = sessions.iter().map(|s| s.frequency).sum::<f32>()
            / total_sessions as f32;
        // Counts accumulate in first-encountered order so that the stable
        // sort below breaks ties the same way every time.
        let mut distribution: Vec<MoodCount> = Vec::new();
        for session in sessions {
            match distribution.iter_mut().find(|c| c.mood == session.mood) {
                Some(mood_count) => mood_count.count += 1,
                None => distribution.push(MoodCount {
                    mood: session.mood,
                    count: 1,
                    percentage: 0,
                }),
            }
        }
        for mood_count in &mut distribution {
            mood_count.percentage = ((mood_count.count * 100)
                / total_sessions)
                as u32;
        }
        distribution.sort_by(|a, b| b.count.cmp(&a.count));
        let dominant_mood = distribution[0].mood;
        Some(Statistics {
            total_sessions,
            total_time_ms,
            avg_volatility,
            avg_frequency,
            dominant_mood,
            distribution,
        })
    }
}
