mod local;
mod sort;

pub use local::LocalLibrary;
pub use sort::{SortOrder, MOST_RECENT, SORT_ORDERS};

use serde::{Deserialize, Serialize};

use crate::{
    data::{Playlist, Song},
    error::Error,
};

/// Where the songs of a playlist come from.  Each call is a fresh query; implementations
/// return an error instead of an absent list.
pub trait SongSource: Send + Sync {
    fn last_added(&self, order: SortOrder) -> Result<Vec<Song>, Error>;

    fn recently_played(&self) -> Result<Vec<Song>, Error>;

    fn top_tracks(&self) -> Result<Vec<Song>, Error>;

    fn playlist_songs(&self, playlist_id: i64) -> Result<Vec<Song>, Error>;
}

/// Localized names of the generated playlists.  Any other name is a user playlist.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaylistNames {
    pub last_added: String,
    pub recently_played: String,
    pub top_tracks: String,
}

impl Default for PlaylistNames {
    fn default() -> Self {
        Self {
            last_added: "Last added".into(),
            recently_played: "Recently played".into(),
            top_tracks: "Top tracks".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaylistKind {
    LastAdded,
    RecentlyPlayed,
    TopTracks,
    User,
}

impl PlaylistNames {
    /// Exact, case-sensitive match against the reserved names.
    pub fn kind(&self, name: &str) -> PlaylistKind {
        if name == self.last_added {
            PlaylistKind::LastAdded
        } else if name == self.recently_played {
            PlaylistKind::RecentlyPlayed
        } else if name == self.top_tracks {
            PlaylistKind::TopTracks
        } else {
            PlaylistKind::User
        }
    }

    pub fn is_last_added(&self, name: &str) -> bool {
        self.kind(name) == PlaylistKind::LastAdded
    }
}

/// Loads the songs of `playlist` from the source matching its name.  Only the last added
/// playlist honours `order`; the others come in source order.
pub fn fetch_songs(
    source: &dyn SongSource,
    names: &PlaylistNames,
    playlist: &Playlist,
    order: SortOrder,
) -> Result<Vec<Song>, Error> {
    match names.kind(&playlist.name) {
        PlaylistKind::LastAdded => source.last_added(order),
        PlaylistKind::RecentlyPlayed => source.recently_played(),
        PlaylistKind::TopTracks => source.top_tracks(),
        PlaylistKind::User => source.playlist_songs(playlist.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl SongSource for Recorder {
        fn last_added(&self, order: SortOrder) -> Result<Vec<Song>, Error> {
            self.calls.lock().push(format!("last_added:{}", order.key()));
            Ok(Vec::new())
        }

        fn recently_played(&self) -> Result<Vec<Song>, Error> {
            self.calls.lock().push("recently_played".into());
            Ok(Vec::new())
        }

        fn top_tracks(&self) -> Result<Vec<Song>, Error> {
            self.calls.lock().push("top_tracks".into());
            Ok(Vec::new())
        }

        fn playlist_songs(&self, playlist_id: i64) -> Result<Vec<Song>, Error> {
            self.calls.lock().push(format!("playlist:{playlist_id}"));
            Ok(Vec::new())
        }
    }

    #[test]
    fn dispatches_by_exact_name() {
        let source = Recorder::default();
        let names = PlaylistNames::default();
        let order = SortOrder::Album;
        for playlist in [
            Playlist::new(-1, "Last added"),
            Playlist::new(-2, "Recently played"),
            Playlist::new(-3, "Top tracks"),
            Playlist::new(9, "top tracks"),
        ] {
            fetch_songs(&source, &names, &playlist, order).unwrap();
        }
        assert_eq!(
            *source.calls.lock(),
            ["last_added:album", "recently_played", "top_tracks", "playlist:9"]
        );
    }

    #[test]
    fn localized_names_are_honoured() {
        let names = PlaylistNames {
            last_added: "Récemment ajoutés".into(),
            ..PlaylistNames::default()
        };
        assert_eq!(names.kind("Récemment ajoutés"), PlaylistKind::LastAdded);
        assert_eq!(names.kind("Last added"), PlaylistKind::User);
    }
}
