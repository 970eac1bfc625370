//! Shared parameter vocabulary for the raster stages.
//!
//! These are pure configuration values; the raster collaborator translates
//! them into the option strings of the underlying library.

use serde::Deserialize;
use strum::{Display, EnumString};

/// Resampling method passed to warp style operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ResamplingMethod {
    #[strum(serialize = "near")]
    #[serde(rename = "near")]
    NearestNeighbour,
    Bilinear,
    Cubic,
    Average,
}

/// Pixel data type of an output raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PixelType {
    Byte,
    Int16,
    UInt16,
    Int32,
    Float32,
    Float64,
}

impl PixelType {
    /// Type name as spelled in raster creation options.
    pub fn type_name(&self) -> &'static str {
        match self {
            PixelType::Byte => "Byte",
            PixelType::Int16 => "Int16",
            PixelType::UInt16 => "UInt16",
            PixelType::Int32 => "Int32",
            PixelType::Float32 => "Float32",
            PixelType::Float64 => "Float64",
        }
    }
}

/// How overlapping pixels are resolved when mosaicking.
///
/// `LastWins` keeps the given source order (later sources override earlier
/// ones), `FirstWins` gives precedence to the earliest source instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CompositePolicy {
    #[default]
    LastWins,
    FirstWins,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn resampling_names_match_warp_spelling() {
        assert_eq!(ResamplingMethod::NearestNeighbour.to_string(), "near");
        assert_eq!(ResamplingMethod::Bilinear.to_string(), "bilinear");
        assert_eq!(ResamplingMethod::Average.to_string(), "average");
        assert_eq!(ResamplingMethod::from_str("average").ok(), Some(ResamplingMethod::Average));
    }

    #[test]
    fn pixel_type_names() {
        assert_eq!(PixelType::Float32.type_name(), "Float32");
        assert_eq!(PixelType::Byte.type_name(), "Byte");
    }
}
