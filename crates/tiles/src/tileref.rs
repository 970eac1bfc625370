use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Identifier of one 1x1 degree source elevation cell, named after its
/// northwest corner (`n34w084` covers 33..34N, 84..83W).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId {
    lat: i32,
    lon: i32,
}

impl TileId {
    pub fn new(lat: i32, lon: i32) -> Result<Self> {
        if !(-90..=90).contains(&lat) || !(-180..=180).contains(&lon) {
            return Err(Error::InvalidTileId(format!("corner out of range: ({lat}, {lon})")));
        }

        Ok(TileId { lat, lon })
    }

    /// Northwest corner latitude in whole degrees.
    pub fn lat(&self) -> i32 {
        self.lat
    }

    /// Northwest corner longitude in whole degrees.
    pub fn lon(&self) -> i32 {
        self.lon
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat < 0 { 's' } else { 'n' };
        let ew = if self.lon < 0 { 'w' } else { 'e' };
        write!(f, "{}{:02}{}{:03}", ns, self.lat.abs(), ew, self.lon.abs())
    }
}

impl FromStr for TileId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidTileId(s.to_string());

        if s.len() < 6 {
            return Err(invalid());
        }

        let lat_sign = match &s[0..1] {
            "n" => 1,
            "s" => -1,
            _ => return Err(invalid()),
        };
        let split = s.find(['e', 'w']).ok_or_else(invalid)?;
        let lon_sign = if &s[split..=split] == "w" { -1 } else { 1 };

        let lat: i32 = s[1..split].parse().map_err(|_| invalid())?;
        let lon: i32 = s[split + 1..].parse().map_err(|_| invalid())?;

        TileId::new(lat_sign * lat, lon_sign * lon)
    }
}

/// One source tile and every region whose boundary it intersects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRef {
    pub id: TileId,
    pub regions: BTreeSet<String>,
}

impl TileRef {
    pub fn intersects(&self, region: &str) -> bool {
        self.regions.contains(region)
    }
}

/// Merge (tile, region) observations into one reference per tile, regions
/// accumulated across the whole run.
pub fn dedupe_tiles(observations: impl IntoIterator<Item = (TileId, String)>) -> Vec<TileRef> {
    let mut merged = std::collections::BTreeMap::<TileId, BTreeSet<String>>::new();
    for (id, region) in observations {
        merged.entry(id).or_default().insert(region);
    }

    merged
        .into_iter()
        .map(|(id, regions)| TileRef { id, regions })
        .collect()
}
