use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};

use crate::{
    cover::CoverOptions, error::Error, library::PlaylistNames, util::mkdir_if_not_exists,
};

const APP_NAME: &str = "Cadence";
const CONFIG_FILENAME: &str = "config.json";
const PREFERENCES_FILENAME: &str = "preferences.json";
const LIBRARY_FILENAME: &str = "library.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library document; defaults to `library.json` in the data dir.
    pub library_path: Option<PathBuf>,
    pub cover_size: u32,
    pub cover: CoverOptions,
    pub last_added_cutoff_days: u64,
    pub playlist_names: PlaylistNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_path: None,
            cover_size: 512,
            cover: CoverOptions::default(),
            last_added_cutoff_days: 90,
            playlist_names: PlaylistNames::default(),
        }
    }
}

impl Config {
    fn app_dirs() -> Option<AppDirs> {
        const USE_XDG_ON_MACOS: bool = false;

        AppDirs::new(Some(APP_NAME), USE_XDG_ON_MACOS)
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.config_dir)
    }

    pub fn data_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.data_dir)
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }

    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILENAME))
    }

    /// Loads the config from the platform config dir.  A missing or unreadable file yields
    /// `None`; the latter is logged.
    pub fn load() -> Option<Config> {
        let path = Self::config_path()?;
        match Self::load_from(&path) {
            Ok(config) => Some(config),
            Err(Error::IoError(err)) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                log::error!("failed to read config {:?}: {}", path, err);
                None
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, Error> {
        let file = File::open(path)?;
        log::info!("loading config: {:?}", path);
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn save(&self) -> Result<(), Error> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no config dir").into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        if let Some(dir) = path.parent() {
            mkdir_if_not_exists(dir)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn library_path(&self) -> Option<PathBuf> {
        self.library_path
            .clone()
            .or_else(|| Self::data_dir().map(|dir| dir.join(LIBRARY_FILENAME)))
    }

    pub fn last_added_cutoff(&self) -> Duration {
        Duration::from_secs(self.last_added_cutoff_days * 24 * 60 * 60)
    }
}
