use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    path::PathBuf,
};

fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VIBEWAVE_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        std::env::temp_dir().join("vibewave")
    }
}

fn containing_dir(name: &str) -> PathBuf {
    data_dir().join(name)
}

fn file_path(name: &str, key: impl AsRef<str>) -> PathBuf {
    let key = key.as_ref();
    // Hex the key so we can safely use it as part of a file path (ie. so it
    // contains no slashes or other characters that have meaning within a
    // file path).
    let hexxed_key = hex::encode(key);
    let prefix = key
        .chars()
        .take_while(|&c| {
            c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ' '
        })
        .map(|c| if c == ' ' { '-' } else { c })
        .collect::<String>();
    containing_dir(name).join(format!("{}-{}.json", prefix, hexxed_key))
}

fn save(
    name: &str,
    data: &(impl Serialize + for<'a> Deserialize<'a>),
    key: impl AsRef<str>,
) -> anyhow::Result<()> {
    use std::io::Write;
    fs::create_dir_all(containing_dir(name))?;
    let json_string = serde_json::to_string(data)?;
    // Write a sibling file then rename it into place so a crash mid-write
    // can't leave a truncated blob behind.
    let path = file_path(name, key);
    let tmp_path = path.with_extension("json.tmp");
    let mut file = File::create(&tmp_path)?;
    write!(file, "{}", json_string)?;
    fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// Like `save` but prints a warning on failure rather than returning an error value.
fn save_(
    name: &str,
    data: &(impl Serialize + for<'a> Deserialize<'a>),
    key: impl AsRef<str>,
) {
    if let Err(e) = save(name, data, &key) {
        log::warn!("Failed to save {} for {}: {}", name, key.as_ref(), e);
    }
}

fn load<T>(name: &str, key: impl AsRef<str>) -> anyhow::Result<T>
where
    T: Serialize + for<'a> Deserialize<'a>,
{
    let json_string = fs::read_to_string(file_path(name, key))?;
    let t = serde_json::from_str(json_string.as_str())?;
    Ok(t)
}

/// Like `load` but prints a warning on failure rather than returning an
/// error value. A malformed blob is treated the same as a missing one.
fn load_<T>(name: &str, key: impl AsRef<str>) -> Option<T>
where
    T: Serialize + for<'a> Deserialize<'a>,
{
    match load(name, &key) {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("Failed to load {} for {}: {}", name, key.as_ref(), e);
            None
        }
    }
}

fn erase(name: &str, key: impl AsRef<str>) -> anyhow::Result<()> {
    let path = file_path(name, key);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Implement this when the type uniquely determines the directory where
/// values of that type will be persisted.
pub trait PersistData: Serialize + for<'a> Deserialize<'a> {
    const NAME: &'static str;

    fn save(&self, key: impl AsRef<str>) -> anyhow::Result<()> {
        save(Self::NAME, self, key)
    }

    /// Like `save` but prints a warning on failure rather than returning an error value.
    fn save_(&self, key: impl AsRef<str>) {
        save_(Self::NAME, self, key)
    }

    fn load(key: impl AsRef<str>) -> anyhow::Result<Self> {
        load(Self::NAME, key)
    }

    /// Like `load` but prints a warning on failure rather than returning an error value.
    fn load_(key: impl AsRef<str>) -> Option<Self> {
        load_(Self::NAME, key)
    }

    fn erase(key: impl AsRef<str>) -> anyhow::Result<()> {
        erase(Self::NAME, key)
    }

    /// Like `erase` but prints a warning on failure rather than returning an error value.
    fn erase_(key: impl AsRef<str>) {
        if let Err(e) = Self::erase(&key) {
            log::warn!(
                "Failed to erase {} for {}: {}",
                Self::NAME,
                key.as_ref(),
                e
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Blob {
        count: u32,
        label: String,
    }

    impl PersistData for Blob {
        const NAME: &'static str = "test_blob";
    }

    fn unique_key(suffix: &str) -> String {
        format!("{}-{}", std::process::id(), suffix)
    }

    #[test]
    fn save_load_round_trip() {
        let key = unique_key("round_trip");
        let blob = Blob {
            count: 3,
            label: "hello".to_string(),
        };
        blob.save(&key).unwrap();
        assert_eq!(Blob::load(&key).unwrap(), blob);
        Blob::erase(&key).unwrap();
    }

    #[test]
    fn missing_blob_loads_as_none() {
        assert!(Blob::load_(unique_key("missing")).is_none());
    }

    #[test]
    fn malformed_blob_loads_as_none() {
        use std::io::Write;
        let key = unique_key("malformed");
        let path = file_path(Blob::NAME, &key);
        fs::create_dir_all(containing_dir(Blob::NAME)).unwrap();
        let mut file = File::create(&path).unwrap();
        write!(file, "not json").unwrap();
        assert!(Blob::load_(&key).is_none());
        Blob::erase(&key).unwrap();
    }

    #[test]
    fn erase_is_idempotent() {
        let key = unique_key("erase");
        let blob = Blob {
            count: 1,
            label: "x".to_string(),
        };
        blob.save(&key).unwrap();
        Blob::erase(&key).unwrap();
        Blob::erase(&key).unwrap();
        assert!(Blob::load_(&key).is_none());
    }

    #[test]
    fn keys_map_to_filename_safe_paths() {
        let path = file_path("test_blob", "a/b c");
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(!file_name.contains('/'));
        assert!(file_name.ends_with(".json"));
    }
}
