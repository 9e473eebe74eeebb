use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use serde_json::Value;

use crate::{data::Playlist, error::Error, util::mkdir_if_not_exists};

pub trait PreferenceStore: Send + Sync {
    fn get_int(&self, key: &str, default: i64) -> i64;

    fn set_int(&self, key: &str, value: i64) -> Result<(), Error>;
}

/// Preference key of the sort order chosen for `playlist`.
pub fn sort_order_key(playlist: &Playlist) -> String {
    format!("sort_order_playlist_{}_{}", playlist.name, playlist.id)
}

#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, i64>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values.lock().get(key).copied().unwrap_or(default)
    }

    fn set_int(&self, key: &str, value: i64) -> Result<(), Error> {
        self.values.lock().insert(key.to_owned(), value);
        Ok(())
    }
}

/// Flat JSON object on disk, rewritten on every change.
pub struct JsonPreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl JsonPreferences {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let values = match File::open(path) {
            Ok(file) => {
                log::info!("loading preferences: {:?}", path);
                serde_json::from_reader(BufReader::new(file))?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: path.to_owned(),
            values: Mutex::new(values),
        })
    }

    fn save(&self, values: &BTreeMap<String, Value>) -> Result<(), Error> {
        if let Some(dir) = self.path.parent() {
            mkdir_if_not_exists(dir)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, values)?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferences {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.lock().get(key) {
            Some(value) => value.as_i64().unwrap_or_else(|| {
                log::warn!("preference {:?} is not an integer: {}", key, value);
                default
            }),
            None => default,
        }
    }

    fn set_int(&self, key: &str, value: i64) -> Result<(), Error> {
        let mut values = self.values.lock();
        values.insert(key.to_owned(), Value::from(value));
        self.save(&values)
    }
}
