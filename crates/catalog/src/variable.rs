use serde::Deserialize;
use strum::{Display, EnumString};

use crate::{Error, Result};

/// The data variable a catalog entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Variable {
    Elevation,
    LandCover,
}

impl Variable {
    /// Short label used in output file names.
    pub fn label(&self) -> &'static str {
        match self {
            Variable::Elevation => "ned",
            Variable::LandCover => "nlcd",
        }
    }
}

/// Output raster resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Resolution {
    /// 1/9 arc-second source tiles, kept on the geographic grid.
    ArcNinth,
    TenMeter,
    ThirtyMeter,
}

impl Resolution {
    /// Short code used in output file names.
    pub fn code(&self) -> &'static str {
        match self {
            Resolution::ArcNinth => "09d",
            Resolution::TenMeter => "10m",
            Resolution::ThirtyMeter => "30m",
        }
    }

    /// Pixel size in projected units, `None` for the native geographic grid.
    pub fn pixel_size(&self) -> Option<f64> {
        match self {
            Resolution::ArcNinth => None,
            Resolution::TenMeter => Some(10.0),
            Resolution::ThirtyMeter => Some(30.0),
        }
    }
}

/// A validated (variable, resolution) combination.
///
/// Land cover is only published at 30 meter, so that is the only combination
/// accepted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Product {
    variable: Variable,
    resolution: Resolution,
}

impl Product {
    pub fn new(variable: Variable, resolution: Resolution) -> Result<Self> {
        if variable == Variable::LandCover && resolution != Resolution::ThirtyMeter {
            return Err(Error::InvalidProduct(format!(
                "land cover is only available at 30 meter, not {resolution}"
            )));
        }

        Ok(Product { variable, resolution })
    }

    pub fn elevation(resolution: Resolution) -> Self {
        Product {
            variable: Variable::Elevation,
            resolution,
        }
    }

    pub fn land_cover() -> Self {
        Product {
            variable: Variable::LandCover,
            resolution: Resolution::ThirtyMeter,
        }
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Lookup key combining the variable label and resolution code (e.g. `ned10m`).
    pub fn key(&self) -> String {
        format!("{}{}", self.variable.label(), self.resolution.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_keys() -> Result {
        assert_eq!(Product::elevation(Resolution::ArcNinth).key(), "ned09d");
        assert_eq!(Product::elevation(Resolution::TenMeter).key(), "ned10m");
        assert_eq!(Product::elevation(Resolution::ThirtyMeter).key(), "ned30m");
        assert_eq!(Product::land_cover().key(), "nlcd30m");
        Ok(())
    }

    #[test]
    fn land_cover_fixed_at_thirty_meter() {
        assert!(Product::new(Variable::LandCover, Resolution::TenMeter).is_err());
        assert!(Product::new(Variable::LandCover, Resolution::ThirtyMeter).is_ok());
    }

    #[test]
    fn parse_variable_names() {
        use std::str::FromStr;
        assert_eq!(Variable::from_str("elevation").ok(), Some(Variable::Elevation));
        assert_eq!(Variable::from_str("land-cover").ok(), Some(Variable::LandCover));
        assert_eq!(Resolution::from_str("ten-meter").ok(), Some(Resolution::TenMeter));
    }
}
