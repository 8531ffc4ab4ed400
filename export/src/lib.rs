pub mod share;
pub use share::{InitialConfig, parse_query, share_url};

pub mod snapshot;
pub use snapshot::{
    MoodSnapshot, write_history_json, write_snapshot,
};
