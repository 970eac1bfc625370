#![warn(clippy::unwrap_used)]

pub type Result<T = ()> = std::result::Result<T, Error>;

mod driver;
mod error;
mod plan;
mod stage;
#[cfg(test)]
mod testutils;

#[doc(inline)]
pub use driver::Driver;
#[doc(inline)]
pub use driver::StageOutcome;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use plan::build_plan;
#[doc(inline)]
pub use stage::StageDescriptor;
#[doc(inline)]
pub use stage::StageKind;
