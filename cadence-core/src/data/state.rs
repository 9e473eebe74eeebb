use std::{fmt, path::Path, sync::Arc};

use image::RgbaImage;

use crate::{
    data::{Playlist, Song},
    error::Error,
};

/// Generated cover art.  Cheap to clone; equality is identity.
#[derive(Clone)]
pub struct CoverImage(Arc<RgbaImage>);

impl CoverImage {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        self.0.save(path)?;
        Ok(())
    }
}

impl PartialEq for CoverImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CoverImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoverImage({}x{})", self.width(), self.height())
    }
}

/// What the playlist detail screen renders.  Published values are never mutated; every
/// update is a new snapshot.
#[derive(Clone, Debug)]
pub struct PlaylistState {
    pub playlist: Option<Playlist>,
    pub title: Arc<str>,
    pub description: Arc<str>,
    pub songs: Arc<[Arc<Song>]>,
    pub cover: Option<CoverImage>,
    pub sort_order: usize,
}

impl PlaylistState {
    pub fn new(playlist: Playlist) -> Self {
        Self {
            playlist: Some(playlist),
            ..Self::default()
        }
    }
}

impl Default for PlaylistState {
    fn default() -> Self {
        Self {
            playlist: None,
            title: "".into(),
            description: "".into(),
            songs: Vec::new().into(),
            cover: None,
            sort_order: 0,
        }
    }
}
