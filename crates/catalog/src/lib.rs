#![warn(clippy::unwrap_used)]

pub type Result<T = ()> = std::result::Result<T, Error>;

mod catalog;
mod catalogrow;
mod error;
pub mod params;
mod region;
mod runconfig;
mod variable;

#[doc(inline)]
pub use catalog::Catalog;
#[doc(inline)]
pub use catalogrow::CatalogRow;
#[doc(inline)]
pub use catalogrow::SuffixRules;
#[doc(inline)]
pub use catalogrow::TerrainProduct;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use region::Office;
#[doc(inline)]
pub use region::RegionSet;
#[doc(inline)]
pub use runconfig::BoundaryLayer;
#[doc(inline)]
pub use runconfig::ResamplingPolicy;
#[doc(inline)]
pub use runconfig::RunConfig;
#[doc(inline)]
pub use runconfig::TileIndexLayer;
#[doc(inline)]
pub use variable::Product;
#[doc(inline)]
pub use variable::Resolution;
#[doc(inline)]
pub use variable::Variable;
