mod envelope;
mod playlist;
mod song;
mod state;

pub use crate::data::{
    envelope::{Action, Envelope, EnvelopeState, Event, MessageCode},
    playlist::Playlist,
    song::{deserialize_millis, AlbumKey, Song},
    state::{CoverImage, PlaylistState},
};
