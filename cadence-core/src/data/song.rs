use std::{path::PathBuf, sync::Arc, time::Duration};

use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Song {
    pub id: i64,
    pub title: Arc<str>,
    #[serde(rename = "artist")]
    pub artist_name: Arc<str>,
    #[serde(rename = "album", default = "unknown_str")]
    pub album_name: Arc<str>,
    #[serde(default)]
    pub album_id: i64,
    #[serde(rename = "duration_ms", default)]
    #[serde(deserialize_with = "deserialize_millis")]
    pub duration: Duration,
    #[serde(default)]
    pub track_number: usize,
    #[serde(default)]
    pub year: Option<u32>,
    /// Unix seconds.
    #[serde(default)]
    pub date_added: u64,
    #[serde(default)]
    pub play_count: u32,
    /// Unix seconds of the last play, if the song was ever played.
    #[serde(default)]
    pub last_played: Option<u64>,
    #[serde(default)]
    pub art_path: Option<PathBuf>,
}

impl Song {
    pub fn new(id: i64, title: &str, artist_name: &str, album_name: &str) -> Self {
        Self {
            id,
            title: title.into(),
            artist_name: artist_name.into(),
            album_name: album_name.into(),
            album_id: 0,
            duration: Duration::ZERO,
            track_number: 0,
            year: None,
            date_added: 0,
            play_count: 0,
            last_played: None,
            art_path: None,
        }
    }

    /// Key used to group songs by album, falling back to the album name when the library has
    /// no album ids.
    pub fn album_key(&self) -> AlbumKey<'_> {
        if self.album_id != 0 {
            AlbumKey::Id(self.album_id)
        } else {
            AlbumKey::Name(&self.album_name)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlbumKey<'a> {
    Id(i64),
    Name(&'a str),
}

fn unknown_str() -> Arc<str> {
    "Unknown".into()
}

pub fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    let duration = Duration::from_millis(millis);
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_song() {
        let song: Song =
            serde_json::from_str(r#"{"id": 3, "title": "Intro", "artist": "Nils"}"#).unwrap();
        assert_eq!(song.id, 3);
        assert_eq!(&*song.artist_name, "Nils");
        assert_eq!(&*song.album_name, "Unknown");
        assert_eq!(song.duration, Duration::ZERO);
        assert_eq!(song.last_played, None);
    }

    #[test]
    fn deserializes_duration_in_millis() {
        let song: Song = serde_json::from_str(
            r#"{"id": 1, "title": "A", "artist": "B", "duration_ms": 215500}"#,
        )
        .unwrap();
        assert_eq!(song.duration, Duration::from_millis(215_500));
    }

    #[test]
    fn album_key_prefers_id() {
        let mut song = Song::new(1, "A", "B", "Album");
        assert_eq!(song.album_key(), AlbumKey::Name("Album"));
        song.album_id = 42;
        assert_eq!(song.album_key(), AlbumKey::Id(42));
    }
}
