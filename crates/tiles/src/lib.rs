#![warn(clippy::unwrap_used)]

pub type Result<T = ()> = std::result::Result<T, Error>;

mod error;
mod fetcher;
mod selector;
mod tileref;

#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use fetcher::extract_raster;
#[doc(inline)]
pub use fetcher::staged_raster_path;
#[doc(inline)]
pub use fetcher::HttpTileSource;
#[doc(inline)]
pub use fetcher::TileSource;
#[doc(inline)]
pub use selector::select_tiles;
#[doc(inline)]
pub use tileref::dedupe_tiles;
#[doc(inline)]
pub use tileref::TileId;
#[doc(inline)]
pub use tileref::TileRef;
