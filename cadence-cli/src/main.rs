use cadence_core::{
    actor::{Capacity, Executor},
    config::Config,
    controller::{Context, PlaylistRefreshController},
    cover::MosaicCover,
    data::{Playlist, PlaylistState},
    error::Error,
    holder::Snapshot,
    library::{LocalLibrary, PlaylistKind},
    preferences::{JsonPreferences, MemoryPreferences, PreferenceStore},
};
use env_logger::{Builder, Env};
use std::{env, path::PathBuf, process, sync::Arc, thread};

const ENV_LOG: &str = "CADENCE_LOG";
const ENV_LOG_STYLE: &str = "CADENCE_LOG_STYLE";

fn main() {
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "info")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    let args: Vec<String> = env::args().collect();
    let Some(name) = args.get(1) else {
        eprintln!("usage: cadence-cli <playlist-name> [playlist-id] [cover.png]");
        process::exit(2);
    };
    let id = match args.get(2).map(|id| id.parse::<i64>()) {
        Some(Ok(id)) => Some(id),
        Some(Err(err)) => {
            eprintln!("invalid playlist id {:?}: {}", args[2], err);
            process::exit(2);
        }
        None => None,
    };
    let cover_path = args.get(3).map(PathBuf::from);

    let config = Config::load().unwrap_or_default();

    if let Err(err) = start(config, name, id, cover_path) {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn start(
    config: Config,
    name: &str,
    id: Option<i64>,
    cover_path: Option<PathBuf>,
) -> Result<(), Error> {
    let library_path = config.library_path().ok_or_else(|| {
        Error::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no library path configured",
        ))
    })?;
    let library = Arc::new(
        LocalLibrary::open(&library_path)?.with_last_added_cutoff(config.last_added_cutoff()),
    );
    log::info!("library has {} songs", library.song_count());

    let preferences: Arc<dyn PreferenceStore> = match Config::preferences_path() {
        Some(path) => Arc::new(JsonPreferences::open(&path)?),
        None => {
            log::warn!("no config dir, sort orders will not be remembered");
            Arc::new(MemoryPreferences::new())
        }
    };

    let playlist = resolve_playlist(&config, &library, name, id)?;

    let executor = Executor::new("disk_io", Capacity::Unbounded)?;
    let controller = PlaylistRefreshController::new(
        Context {
            songs: library,
            covers: Arc::new(MosaicCover::new(config.cover_size)),
            preferences,
            names: config.playlist_names.clone(),
            cover_options: config.cover,
        },
        executor.clone(),
    );

    controller.set_params(playlist);

    let events = controller.subscribe();
    let log_thread = thread::spawn(move || {
        for snapshot in events {
            log_snapshot(&snapshot);
        }
    });

    let finished = controller.refresh().wait();
    executor.shutdown();
    if !finished {
        return Err(Error::ExecutorClosed);
    }

    let state = controller.state().unwrap_or_default();
    drop(controller);
    let _ = log_thread.join();

    print_state(&state);
    if let (Some(path), Some(cover)) = (cover_path, &state.cover) {
        cover.save(&path)?;
        log::info!("saved cover to {:?}", path);
    }
    Ok(())
}

/// Generated playlists are matched by name.  User playlists need an id, either given or
/// looked up in the library.
fn resolve_playlist(
    config: &Config,
    library: &LocalLibrary,
    name: &str,
    id: Option<i64>,
) -> Result<Playlist, Error> {
    if let Some(id) = id {
        return Ok(Playlist::new(id, name));
    }
    match config.playlist_names.kind(name) {
        PlaylistKind::User => library
            .find_playlist(name)
            .ok_or_else(|| Error::UnknownPlaylist(name.to_owned())),
        _ => Ok(Playlist::new(0, name)),
    }
}

fn log_snapshot(snapshot: &Snapshot<PlaylistState>) {
    let event = &snapshot.event;
    match event.data() {
        Some(state) if event.envelope.is_success() => log::info!(
            "#{} {:?} {:?}: {} songs, cover: {}",
            snapshot.version,
            event.action,
            state.title,
            state.songs.len(),
            state.cover.is_some()
        ),
        _ if event.envelope.is_success() => {
            log::info!("#{} {:?}: empty", snapshot.version, event.action)
        }
        _ => log::warn!(
            "#{} {:?} failed ({:?}): {}",
            snapshot.version,
            event.action,
            event.envelope.code(),
            event.envelope.message().unwrap_or_default()
        ),
    }
}

fn print_state(state: &PlaylistState) {
    println!("{}", state.title);
    if !state.description.is_empty() {
        println!("{}", state.description);
    }
    for (i, song) in state.songs.iter().enumerate() {
        println!(
            "{:>3}. {} - {} ({})",
            i + 1,
            song.artist_name,
            song.title,
            song.album_name
        );
    }
}
