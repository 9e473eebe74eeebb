use std::{error, fmt, io};

#[derive(Debug)]
pub enum Error {
    MissingPlaylist,
    PlaylistNotFound(i64),
    UnknownPlaylist(String),
    CoverUnavailable(String),
    InvalidSortOrder(usize),
    ExecutorClosed,
    JsonError(Box<dyn error::Error + Send + Sync>),
    ImageError(Box<dyn error::Error + Send + Sync>),
    IoError(io::Error),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlaylist => write!(f, "Require playlist parameter"),
            Self::PlaylistNotFound(id) => write!(f, "Playlist not found: {id}"),
            Self::UnknownPlaylist(name) => write!(f, "Unknown playlist: {name:?}"),
            Self::CoverUnavailable(reason) => write!(f, "Cover unavailable: {reason}"),
            Self::InvalidSortOrder(index) => write!(f, "Invalid sort order index: {index}"),
            Self::ExecutorClosed => write!(f, "Executor is shut down"),
            Self::JsonError(err) | Self::ImageError(err) => err.fmt(f),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JsonError(Box::new(err))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Error {
        Error::ImageError(Box::new(err))
    }
}
