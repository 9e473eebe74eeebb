use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use parking_lot::RwLock;
use serde::Deserialize;

use crate::{
    data::{Playlist, Song},
    error::Error,
    library::{SongSource, SortOrder},
    util::unix_now,
};

const RECENTLY_PLAYED_LIMIT: usize = 100;
const TOP_TRACKS_LIMIT: usize = 100;
const DEFAULT_LAST_ADDED_CUTOFF: Duration = Duration::from_secs(90 * 24 * 60 * 60);

#[derive(Debug, Default, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    songs: Vec<Song>,
    #[serde(default)]
    playlists: Vec<LocalPlaylist>,
}

#[derive(Debug, Deserialize)]
struct LocalPlaylist {
    id: i64,
    name: Arc<str>,
    #[serde(default)]
    song_ids: Vec<i64>,
}

/// Song source backed by a JSON library document:
///
/// ```json
/// { "songs": [{ "id": 1, "title": "…", "artist": "…", "date_added": 1700000000 }],
///   "playlists": [{ "id": 7, "name": "Road trip", "song_ids": [1] }] }
/// ```
pub struct LocalLibrary {
    path: Option<PathBuf>,
    library: RwLock<LibraryFile>,
    last_added_cutoff: Duration,
    clock: fn() -> u64,
}

impl LocalLibrary {
    pub fn open(path: &Path) -> Result<Self, Error> {
        log::info!("loading library: {:?}", path);
        let library = Self::read(path)?;
        let mut this = Self::with_library(library);
        this.path = Some(path.to_owned());
        Ok(this)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        let library = serde_json::from_reader(reader)?;
        Ok(Self::with_library(library))
    }

    fn with_library(library: LibraryFile) -> Self {
        Self {
            path: None,
            library: RwLock::new(library),
            last_added_cutoff: DEFAULT_LAST_ADDED_CUTOFF,
            clock: unix_now,
        }
    }

    fn read(path: &Path) -> Result<LibraryFile, Error> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn with_last_added_cutoff(mut self, cutoff: Duration) -> Self {
        self.last_added_cutoff = cutoff;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// Re-reads the library file.  Libraries not opened from a file are left untouched.
    pub fn reload(&self) -> Result<(), Error> {
        if let Some(path) = &self.path {
            let library = Self::read(path)?;
            *self.library.write() = library;
            log::debug!("reloaded library: {:?}", path);
        }
        Ok(())
    }

    pub fn playlists(&self) -> Vec<Playlist> {
        self.library
            .read()
            .playlists
            .iter()
            .map(|playlist| Playlist {
                id: playlist.id,
                name: playlist.name.clone(),
            })
            .collect()
    }

    pub fn find_playlist(&self, name: &str) -> Option<Playlist> {
        self.playlists()
            .into_iter()
            .find(|playlist| &*playlist.name == name)
    }

    pub fn song_count(&self) -> usize {
        self.library.read().songs.len()
    }
}

impl SongSource for LocalLibrary {
    fn last_added(&self, order: SortOrder) -> Result<Vec<Song>, Error> {
        let cutoff = (self.clock)().saturating_sub(self.last_added_cutoff.as_secs());
        let mut songs: Vec<Song> = self
            .library
            .read()
            .songs
            .iter()
            .filter(|song| song.date_added >= cutoff)
            .cloned()
            .collect();
        order.sort(&mut songs);
        Ok(songs)
    }

    fn recently_played(&self) -> Result<Vec<Song>, Error> {
        let mut songs: Vec<Song> = self
            .library
            .read()
            .songs
            .iter()
            .filter(|song| song.last_played.is_some())
            .cloned()
            .collect();
        songs.sort_by(|a, b| b.last_played.cmp(&a.last_played));
        songs.truncate(RECENTLY_PLAYED_LIMIT);
        Ok(songs)
    }

    fn top_tracks(&self) -> Result<Vec<Song>, Error> {
        let mut songs: Vec<Song> = self
            .library
            .read()
            .songs
            .iter()
            .filter(|song| song.play_count > 0)
            .cloned()
            .collect();
        songs.sort_by(|a, b| {
            b.play_count
                .cmp(&a.play_count)
                .then_with(|| a.title.cmp(&b.title))
        });
        songs.truncate(TOP_TRACKS_LIMIT);
        Ok(songs)
    }

    fn playlist_songs(&self, playlist_id: i64) -> Result<Vec<Song>, Error> {
        let library = self.library.read();
        let playlist = library
            .playlists
            .iter()
            .find(|playlist| playlist.id == playlist_id)
            .ok_or(Error::PlaylistNotFound(playlist_id))?;
        let by_id: HashMap<i64, &Song> = library.songs.iter().map(|song| (song.id, song)).collect();
        let songs = playlist
            .song_ids
            .iter()
            .filter_map(|id| match by_id.get(id) {
                Some(song) => Some((*song).clone()),
                None => {
                    log::warn!("playlist {} refers to unknown song {}", playlist_id, id);
                    None
                }
            })
            .collect();
        Ok(songs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const NOW: u64 = 1_700_000_000;
    const DAY: u64 = 24 * 60 * 60;

    fn fixed_clock() -> u64 {
        NOW
    }

    fn library_json() -> String {
        serde_json::json!({
            "songs": [
                { "id": 1, "title": "Old", "artist": "A", "date_added": NOW - 400 * DAY,
                  "play_count": 3, "last_played": NOW - 10 },
                { "id": 2, "title": "Fresh", "artist": "B", "date_added": NOW - DAY,
                  "play_count": 9 },
                { "id": 3, "title": "Newer", "artist": "C", "date_added": NOW - 2 * DAY,
                  "play_count": 3, "last_played": NOW - 5 },
                { "id": 4, "title": "Never", "artist": "D", "date_added": NOW - 500 * DAY }
            ],
            "playlists": [
                { "id": 7, "name": "Road trip", "song_ids": [4, 99, 1] }
            ]
        })
        .to_string()
    }

    fn library() -> LocalLibrary {
        LocalLibrary::from_reader(library_json().as_bytes())
            .unwrap()
            .with_clock(fixed_clock)
    }

    fn ids(songs: &[Song]) -> Vec<i64> {
        songs.iter().map(|song| song.id).collect()
    }

    #[test]
    fn last_added_filters_by_cutoff_and_sorts() {
        let library = library();
        assert_eq!(ids(&library.last_added(SortOrder::DateAddedDesc).unwrap()), [2, 3]);
        assert_eq!(ids(&library.last_added(SortOrder::Title).unwrap()), [2, 3]);
        assert_eq!(ids(&library.last_added(SortOrder::TitleDesc).unwrap()), [3, 2]);
    }

    #[test]
    fn last_added_cutoff_is_configurable() {
        let library = library().with_last_added_cutoff(Duration::from_secs(450 * DAY));
        assert_eq!(ids(&library.last_added(SortOrder::DateAddedDesc).unwrap()), [2, 3, 1]);
    }

    #[test]
    fn recently_played_is_newest_first() {
        assert_eq!(ids(&library().recently_played().unwrap()), [3, 1]);
    }

    #[test]
    fn top_tracks_orders_by_play_count_then_title() {
        assert_eq!(ids(&library().top_tracks().unwrap()), [2, 3, 1]);
    }

    #[test]
    fn playlist_keeps_stored_order_and_skips_unknown_songs() {
        assert_eq!(ids(&library().playlist_songs(7).unwrap()), [4, 1]);
    }

    #[test]
    fn unknown_playlist_is_an_error() {
        assert!(matches!(
            library().playlist_songs(8),
            Err(Error::PlaylistNotFound(8))
        ));
    }

    #[test]
    fn finds_playlist_by_name() {
        let library = library();
        assert_eq!(library.find_playlist("Road trip"), Some(Playlist::new(7, "Road trip")));
        assert_eq!(library.find_playlist("road trip"), None);
    }

    #[test]
    fn open_and_reload_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"songs": []}"#).unwrap();
        let library = LocalLibrary::open(file.path()).unwrap();
        assert_eq!(library.song_count(), 0);

        std::fs::write(file.path(), library_json()).unwrap();
        library.reload().unwrap();
        assert_eq!(library.song_count(), 4);
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        assert!(matches!(
            LocalLibrary::from_reader(&b"{"[..]),
            Err(Error::JsonError(_))
        ));
    }
}
