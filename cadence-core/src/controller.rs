use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Duration,
};

use crossbeam_channel::{bounded, Receiver};

use crate::{
    actor::Executor,
    cover::{CoverGenerator, CoverOptions},
    data::{Action, CoverImage, Envelope, Event, MessageCode, Playlist, PlaylistState, Song},
    error::Error,
    holder::{Snapshot, StateHolder},
    library::{self, PlaylistNames, SongSource, SortOrder, MOST_RECENT, SORT_ORDERS},
    preferences::{sort_order_key, PreferenceStore},
};

const DESCRIPTION_ARTISTS: usize = 5;
const ARTIST_SEPARATOR: &str = " · ";

/// Collaborators a refresh reads from.
pub struct Context {
    pub songs: Arc<dyn SongSource>,
    pub covers: Arc<dyn CoverGenerator>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub names: PlaylistNames,
    pub cover_options: CoverOptions,
}

/// Completion of one dispatched refresh.  Dropping it does not cancel anything.
pub struct RefreshHandle {
    done: Receiver<()>,
}

impl RefreshHandle {
    /// Blocks until the refresh finished.  Returns `false` if it could not be dispatched.
    pub fn wait(&self) -> bool {
        self.done.recv().is_ok()
    }

    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.done.recv_timeout(timeout).is_ok()
    }
}

/// Loads a playlist's songs, description and cover, and publishes the results into its
/// [`StateHolder`].  A refresh publishes the song listing as soon as it is known, then once
/// more when the cover is ready or anything failed.
pub struct PlaylistRefreshController {
    context: Arc<Context>,
    executor: Executor,
    holder: Arc<StateHolder<PlaylistState>>,
}

impl PlaylistRefreshController {
    pub fn new(context: Context, executor: Executor) -> Self {
        Self {
            context: Arc::new(context),
            executor,
            holder: Arc::new(StateHolder::new()),
        }
    }

    pub fn holder(&self) -> &Arc<StateHolder<PlaylistState>> {
        &self.holder
    }

    pub fn subscribe(&self) -> Receiver<Snapshot<PlaylistState>> {
        self.holder.subscribe()
    }

    pub fn state(&self) -> Option<PlaylistState> {
        self.holder.latest_state()
    }

    /// Points the controller at `playlist`, discarding any previous state.
    pub fn set_params(&self, playlist: Playlist) -> u64 {
        log::debug!("set params: {}", playlist);
        self.holder.post(Event::new(
            Envelope::Success(PlaylistState::new(playlist)),
            Action::SetParams,
        ))
    }

    /// Runs a refresh on the executor.  Failures are published, never returned.
    pub fn refresh(&self) -> RefreshHandle {
        let (done_send, done) = bounded(1);
        let context = self.context.clone();
        let holder = self.holder.clone();
        let dispatched = self.executor.execute(move || {
            refresh(&context, &holder);
            let _ = done_send.send(());
        });
        if let Err(err) = dispatched {
            log::error!("failed to dispatch playlist refresh: {}", err);
        }
        RefreshHandle { done }
    }

    /// Runs a refresh on the calling thread.
    pub fn refresh_blocking(&self) {
        refresh(&self.context, &self.holder);
    }

    /// Remembers `index` as the sort order of the current playlist and refreshes.
    pub fn set_sort_order(&self, index: usize) -> Result<RefreshHandle, Error> {
        SortOrder::from_index(index).ok_or(Error::InvalidSortOrder(index))?;
        let playlist = self
            .holder
            .latest_state()
            .and_then(|state| state.playlist)
            .ok_or(Error::MissingPlaylist)?;
        self.context
            .preferences
            .set_int(&sort_order_key(&playlist), index as i64)?;
        Ok(self.refresh())
    }
}

/// Title, description and songs computed by a refresh, before the cover is known.
struct Listing {
    title: Arc<str>,
    description: Arc<str>,
    songs: Arc<[Arc<Song>]>,
    sort_order: usize,
}

impl Listing {
    fn apply(&self, base: PlaylistState) -> PlaylistState {
        PlaylistState {
            title: self.title.clone(),
            description: self.description.clone(),
            songs: self.songs.clone(),
            sort_order: self.sort_order,
            ..base
        }
    }

    /// Final state.  The sort order is left to `base`, it was published with the listing.
    fn complete(self, base: PlaylistState, cover: CoverImage) -> PlaylistState {
        PlaylistState {
            title: self.title,
            description: self.description,
            songs: self.songs,
            cover: Some(cover),
            ..base
        }
    }
}

type Failure = (MessageCode, Error);

fn refresh(context: &Context, holder: &StateHolder<PlaylistState>) {
    let event = holder.latest_event();
    let initial = event.as_ref().and_then(|event| event.data().cloned());

    let outcome = match &event {
        Some(event) => match event.data().and_then(|state| state.playlist.as_ref()) {
            Some(playlist) => load_listing(context, playlist, event.action),
            None => Err((MessageCode::InvalidParams, Error::MissingPlaylist)),
        },
        None => Err((MessageCode::InvalidParams, Error::MissingPlaylist)),
    };

    let outcome = outcome.and_then(|listing| {
        publish_listing(holder, &listing);
        generate_cover(context, &listing.songs)
            .map(|cover| (listing, cover))
            .map_err(|err| (MessageCode::InvalidResponse, err))
    });

    publish_result(holder, initial, outcome);
}

fn load_listing(context: &Context, playlist: &Playlist, action: Action) -> Result<Listing, Failure> {
    let order = sort_order(context, playlist, action);
    log::debug!("refreshing {} sorted by {:?}", playlist, order.key());

    let songs = library::fetch_songs(context.songs.as_ref(), &context.names, playlist, order)
        .map_err(|err| (MessageCode::InvalidResponse, err))?;
    let songs: Arc<[Arc<Song>]> = songs.into_iter().map(Arc::new).collect();

    Ok(Listing {
        title: playlist.name.clone(),
        description: describe_artists(&songs).into(),
        songs,
        sort_order: order.index(),
    })
}

fn sort_order(context: &Context, playlist: &Playlist, action: Action) -> SortOrder {
    if action == Action::SetParams && context.names.is_last_added(&playlist.name) {
        return SORT_ORDERS[MOST_RECENT];
    }
    let key = sort_order_key(playlist);
    let stored = context.preferences.get_int(&key, 0);
    match usize::try_from(stored).ok().and_then(SortOrder::from_index) {
        Some(order) => order,
        None => {
            log::warn!("ignoring out of range sort order {} for {:?}", stored, key);
            SORT_ORDERS[0]
        }
    }
}

/// Up to five distinct artists, in order of first appearance.
pub fn describe_artists(songs: &[Arc<Song>]) -> String {
    let mut artists: Vec<&str> = Vec::with_capacity(DESCRIPTION_ARTISTS);
    for song in songs {
        if artists.len() == DESCRIPTION_ARTISTS {
            break;
        }
        if !artists.contains(&&*song.artist_name) {
            artists.push(&song.artist_name);
        }
    }
    artists.join(ARTIST_SEPARATOR)
}

/// A panicking generator is reported like any other cover failure.
fn generate_cover(context: &Context, songs: &[Arc<Song>]) -> Result<CoverImage, Error> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        context.covers.generate(songs, context.cover_options)
    }))
    .unwrap_or_else(|payload| Err(Error::CoverUnavailable(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("generator panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("generator panicked: {message}")
    } else {
        "generator panicked".to_owned()
    }
}

fn publish_listing(holder: &StateHolder<PlaylistState>, listing: &Listing) {
    match holder.latest_state() {
        Some(latest) => {
            holder.post(Event::new(
                Envelope::Success(listing.apply(latest)),
                Action::Reload,
            ));
        }
        None => {
            log::debug!("playlist state cleared during refresh, skipping listing");
        }
    }
}

fn publish_result(
    holder: &StateHolder<PlaylistState>,
    initial: Option<PlaylistState>,
    outcome: Result<(Listing, CoverImage), Failure>,
) {
    let latest = holder.latest_state();
    match outcome {
        Ok((listing, cover)) => {
            let state = listing.complete(latest.or(initial).unwrap_or_default(), cover);
            log::info!(
                "refreshed {:?}: {} songs, {:?}",
                state.title,
                state.songs.len(),
                state.cover
            );
            holder.post(Event::new(Envelope::Success(state), Action::Reload));
        }
        Err((code, err)) => {
            log::warn!("playlist refresh failed ({}): {}", code, err);
            holder.post(Event::new(
                Envelope::failed(code, err).with_data(latest),
                Action::Reload,
            ));
        }
    }
}
