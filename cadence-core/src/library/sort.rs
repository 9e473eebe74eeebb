use std::cmp::{Ordering, Reverse};

use crate::data::Song;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SortOrder {
    Title,
    TitleDesc,
    DateAddedDesc,
    Artist,
    Album,
    YearDesc,
    DurationDesc,
}

/// Sort orders offered for a playlist, indexed by the persisted preference value.
pub const SORT_ORDERS: [SortOrder; 7] = [
    SortOrder::Title,
    SortOrder::TitleDesc,
    SortOrder::DateAddedDesc,
    SortOrder::Artist,
    SortOrder::Album,
    SortOrder::YearDesc,
    SortOrder::DurationDesc,
];

/// Index of [`SortOrder::DateAddedDesc`] in [`SORT_ORDERS`].
pub const MOST_RECENT: usize = 2;

impl SortOrder {
    pub fn from_index(index: usize) -> Option<Self> {
        SORT_ORDERS.get(index).copied()
    }

    pub fn index(self) -> usize {
        SORT_ORDERS
            .iter()
            .position(|order| *order == self)
            .unwrap_or_default()
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::TitleDesc => "title DESC",
            Self::DateAddedDesc => "date_added DESC",
            Self::Artist => "artist",
            Self::Album => "album",
            Self::YearDesc => "year DESC",
            Self::DurationDesc => "duration DESC",
        }
    }

    /// Stable sort, so songs that compare equal keep their library order.
    pub fn sort(self, songs: &mut [Song]) {
        match self {
            Self::Title => songs.sort_by_cached_key(|song| song.title.to_lowercase()),
            Self::TitleDesc => songs.sort_by_cached_key(|song| Reverse(song.title.to_lowercase())),
            Self::DateAddedDesc => songs.sort_by_key(|song| Reverse(song.date_added)),
            Self::Artist => songs.sort_by(|a, b| {
                cmp_lowercase(&a.artist_name, &b.artist_name)
                    .then_with(|| cmp_lowercase(&a.album_name, &b.album_name))
                    .then(a.track_number.cmp(&b.track_number))
            }),
            Self::Album => songs.sort_by(|a, b| {
                cmp_lowercase(&a.album_name, &b.album_name)
                    .then(a.track_number.cmp(&b.track_number))
            }),
            // Songs without a year go last.
            Self::YearDesc => songs.sort_by_key(|song| Reverse(song.year)),
            Self::DurationDesc => songs.sort_by_key(|song| Reverse(song.duration)),
        }
    }
}

fn cmp_lowercase(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn titles(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|song| &*song.title).collect()
    }

    fn library() -> Vec<Song> {
        let mut b = Song::new(1, "beta", "Zed", "Second");
        b.date_added = 300;
        b.year = Some(1999);
        b.duration = Duration::from_secs(200);
        b.track_number = 2;
        let mut a = Song::new(2, "Alpha", "amy", "First");
        a.date_added = 100;
        a.duration = Duration::from_secs(100);
        a.track_number = 1;
        let mut c = Song::new(3, "Gamma", "Zed", "Second");
        c.date_added = 200;
        c.year = Some(2004);
        c.duration = Duration::from_secs(300);
        c.track_number = 1;
        vec![b, a, c]
    }

    #[test]
    fn most_recent_is_date_added_desc() {
        assert_eq!(SortOrder::from_index(MOST_RECENT), Some(SortOrder::DateAddedDesc));
        assert_eq!(SortOrder::DateAddedDesc.index(), MOST_RECENT);
    }

    #[test]
    fn index_out_of_table_is_none() {
        assert_eq!(SortOrder::from_index(SORT_ORDERS.len()), None);
    }

    #[test]
    fn title_sort_ignores_case() {
        let mut songs = library();
        SortOrder::Title.sort(&mut songs);
        assert_eq!(titles(&songs), ["Alpha", "beta", "Gamma"]);
        SortOrder::TitleDesc.sort(&mut songs);
        assert_eq!(titles(&songs), ["Gamma", "beta", "Alpha"]);
    }

    #[test]
    fn date_added_sort_is_newest_first() {
        let mut songs = library();
        SortOrder::DateAddedDesc.sort(&mut songs);
        assert_eq!(titles(&songs), ["beta", "Gamma", "Alpha"]);
    }

    #[test]
    fn artist_sort_groups_albums_by_track() {
        let mut songs = library();
        SortOrder::Artist.sort(&mut songs);
        assert_eq!(titles(&songs), ["Alpha", "Gamma", "beta"]);
    }

    #[test]
    fn year_sort_puts_unknown_last() {
        let mut songs = library();
        SortOrder::YearDesc.sort(&mut songs);
        assert_eq!(titles(&songs), ["Gamma", "beta", "Alpha"]);
    }

    #[test]
    fn duration_sort_is_longest_first() {
        let mut songs = library();
        SortOrder::DurationDesc.sort(&mut songs);
        assert_eq!(titles(&songs), ["Gamma", "beta", "Alpha"]);
    }
}
