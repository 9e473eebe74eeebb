use std::{collections::HashSet, sync::Arc};

use image::{
    imageops::{self, FilterType},
    Rgba, RgbaImage,
};
use serde::{Deserialize, Serialize};

use crate::{
    data::{CoverImage, Song},
    error::Error,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoverOptions {
    pub rounded: bool,
    pub blurred: bool,
}

pub trait CoverGenerator: Send + Sync {
    fn generate(&self, songs: &[Arc<Song>], options: CoverOptions) -> Result<CoverImage, Error>;
}

const MAX_TILES: usize = 4;
const BLUR_SIGMA: f32 = 6.0;
const PLACEHOLDER: Rgba<u8> = Rgba([0x3a, 0x3a, 0x40, 0xff]);
const PALETTE: [[u8; 3]; 8] = [
    [0xe5, 0x73, 0x73],
    [0xf0, 0x62, 0x92],
    [0xba, 0x68, 0xc8],
    [0x79, 0x86, 0xcb],
    [0x4f, 0xc3, 0xf7],
    [0x4d, 0xb6, 0xac],
    [0xae, 0xd5, 0x81],
    [0xff, 0xb7, 0x4d],
];

/// Square cover made of up to four album tiles:
/// - 1 album: single tile fills the cover
/// - 2 albums: left and right halves
/// - 3 albums: top half, bottom half split in two
/// - 4 albums: 2x2 grid
///
/// A tile is the album art when the song has a readable `art_path`, otherwise a flat colour
/// picked from the album name.
pub struct MosaicCover {
    size: u32,
}

impl MosaicCover {
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    fn tiles<'a>(&self, songs: &'a [Arc<Song>]) -> Vec<&'a Song> {
        let mut seen = HashSet::new();
        songs
            .iter()
            .map(|song| song.as_ref())
            .filter(|song| seen.insert(song.album_key()))
            .take(MAX_TILES)
            .collect()
    }

    fn layout(&self, count: usize) -> Vec<(u32, u32, u32, u32)> {
        let full = self.size;
        let half = full / 2;
        let rest = full - half;
        match count {
            0 => vec![],
            1 => vec![(0, 0, full, full)],
            2 => vec![(0, 0, half, full), (half, 0, rest, full)],
            3 => vec![
                (0, 0, full, half),
                (0, half, half, rest),
                (half, half, rest, rest),
            ],
            _ => vec![
                (0, 0, half, half),
                (half, 0, rest, half),
                (0, half, half, rest),
                (half, half, rest, rest),
            ],
        }
    }
}

impl CoverGenerator for MosaicCover {
    fn generate(&self, songs: &[Arc<Song>], options: CoverOptions) -> Result<CoverImage, Error> {
        if self.size < 2 {
            return Err(Error::CoverUnavailable(format!(
                "cover size {} is too small",
                self.size
            )));
        }

        let mut canvas = RgbaImage::from_pixel(self.size, self.size, PLACEHOLDER);
        let tiles = self.tiles(songs);
        for (song, (x, y, width, height)) in tiles.iter().zip(self.layout(tiles.len())) {
            let tile = tile_image(song, width, height);
            imageops::replace(&mut canvas, &tile, x.into(), y.into());
        }

        if options.blurred {
            canvas = imageops::blur(&canvas, BLUR_SIGMA);
        }
        if options.rounded {
            round_corners(&mut canvas, self.size / 8);
        }

        log::debug!(
            "generated {}px cover from {} tiles ({} songs)",
            self.size,
            tiles.len(),
            songs.len()
        );
        Ok(CoverImage::new(canvas))
    }
}

fn tile_image(song: &Song, width: u32, height: u32) -> RgbaImage {
    if let Some(path) = &song.art_path {
        match image::open(path) {
            Ok(art) => {
                return art
                    .resize_to_fill(width, height, FilterType::Triangle)
                    .to_rgba8();
            }
            Err(err) => {
                log::debug!("failed to load album art {:?}: {}", path, err);
            }
        }
    }
    RgbaImage::from_pixel(width, height, album_colour(&song.album_name))
}

/// Stable across runs and platforms, unlike `DefaultHasher`.
fn album_colour(name: &str) -> Rgba<u8> {
    let hash = name.bytes().fold(0x811c_9dc5u32, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    });
    let [r, g, b] = PALETTE[hash as usize % PALETTE.len()];
    Rgba([r, g, b, 0xff])
}

fn round_corners(image: &mut RgbaImage, radius: u32) {
    let (width, height) = image.dimensions();
    let r = radius as i64;
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let (x, y) = (x as i64, y as i64);
        let cx = if x < r {
            r
        } else if x >= width as i64 - r {
            width as i64 - r - 1
        } else {
            continue;
        };
        let cy = if y < r {
            r
        } else if y >= height as i64 - r {
            height as i64 - r - 1
        } else {
            continue;
        };
        let (dx, dy) = (x - cx, y - cy);
        if dx * dx + dy * dy > r * r {
            pixel.0[3] = 0;
        }
    }
}
