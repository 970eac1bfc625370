use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use itertools::Itertools;

use crate::{CatalogRow, Error, Product, RegionSet, Result, SuffixRules};

/// The full processing matrix of a run, indexed for lookup by
/// (product key, region).
///
/// Rows are sorted by (variable, resolution, region) so iteration order is
/// deterministic, and no two rows can share an output path.
#[derive(Debug, Clone)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
    index: BTreeMap<(String, String), usize>,
}

impl Catalog {
    /// Build one row per (product, region) combination.
    ///
    /// Region codes are validated against the run's region hierarchy;
    /// duplicate output paths (from a repeated region code) are rejected.
    pub fn build(
        products: &[Product],
        region_codes: &[String],
        base_dir: &Path,
        suffixes: &SuffixRules,
        regions: &RegionSet,
    ) -> Result<Self> {
        for code in region_codes {
            if !regions.contains(code) {
                return Err(Error::UnknownRegion(code.clone()));
            }
        }

        let mut rows = products
            .iter()
            .cartesian_product(region_codes)
            .map(|(product, region)| CatalogRow::new(base_dir, *product, region, suffixes))
            .collect_vec();

        rows.sort_by(|a, b| {
            (a.product(), a.region()).cmp(&(b.product(), b.region()))
        });

        let mut seen_paths = BTreeSet::new();
        let mut index = BTreeMap::new();
        for (position, row) in rows.iter().enumerate() {
            if !seen_paths.insert(row.output_path().to_path_buf()) {
                return Err(Error::DuplicatePath(row.output_path().to_path_buf()));
            }

            index.insert((row.key(), row.region().to_string()), position);
        }

        log::debug!("Catalog built: {} rows for {} regions", rows.len(), region_codes.len());

        Ok(Catalog { rows, index })
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn row(&self, key: &str, region: &str) -> Option<&CatalogRow> {
        self.index
            .get(&(key.to_string(), region.to_string()))
            .map(|&position| &self.rows[position])
    }

    /// Catalog path for a product in a region, e.g. the `ned10m` path of `11-JUE`.
    pub fn path(&self, key: &str, region: &str) -> Option<&Path> {
        self.row(key, region).map(CatalogRow::output_path)
    }
}

#[cfg(test)]
mod tests {
    use path_macro::path;

    use super::*;
    use crate::{Office, Resolution};

    fn region_set() -> RegionSet {
        RegionSet::new(vec![Office {
            code: "11".to_string(),
            regions: vec!["11-JUE".to_string(), "11-OCO".to_string()],
        }])
        .expect("valid region set")
    }

    fn products() -> Vec<Product> {
        vec![
            Product::elevation(Resolution::ArcNinth),
            Product::elevation(Resolution::TenMeter),
            Product::elevation(Resolution::ThirtyMeter),
            Product::land_cover(),
        ]
    }

    fn suffixes() -> SuffixRules {
        SuffixRules {
            landcover_epoch: "2016".to_string(),
        }
    }

    fn build(regions: &[&str]) -> Result<Catalog> {
        let region_codes = regions.iter().map(|r| r.to_string()).collect::<Vec<_>>();
        Catalog::build(&products(), &region_codes, Path::new("/data"), &suffixes(), &region_set())
    }

    #[test]
    fn paths_are_unique_and_deterministic() -> Result {
        let first = build(&["11-JUE", "11-OCO", "11"])?;
        let second = build(&["11-JUE", "11-OCO", "11"])?;

        let paths = first.rows().iter().map(|r| r.output_path().to_path_buf()).collect_vec();
        let unique: BTreeSet<_> = paths.iter().collect();
        assert_eq!(unique.len(), paths.len());

        let second_paths = second.rows().iter().map(|r| r.output_path().to_path_buf()).collect_vec();
        assert_eq!(paths, second_paths);
        Ok(())
    }

    #[test]
    fn region_paths_follow_template() -> Result {
        let catalog = build(&["11-JUE"])?;

        assert_eq!(
            catalog.path("ned09d", "11-JUE"),
            Some(path!("/data" / "11-JUE" / "ned09d_11-JUE.tif").as_path())
        );
        assert_eq!(
            catalog.path("ned10m", "11-JUE"),
            Some(path!("/data" / "11-JUE" / "ned10m_11-JUE.tif").as_path())
        );
        assert_eq!(
            catalog.path("ned30m", "11-JUE"),
            Some(path!("/data" / "11-JUE" / "ned30m_11-JUE.tif").as_path())
        );
        assert_eq!(
            catalog.path("nlcd30m", "11-JUE"),
            Some(path!("/data" / "11-JUE" / "nlcd30m_11-JUE_2016.tif").as_path())
        );
        Ok(())
    }

    #[test]
    fn rows_sorted_by_product_then_region() -> Result {
        let catalog = build(&["11-OCO", "11-JUE"])?;
        let order = catalog
            .rows()
            .iter()
            .map(|r| (r.key(), r.region().to_string()))
            .collect_vec();

        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert_eq!(order.len(), 8);
        // Elevation sorts before land cover, regions alphabetical within a product.
        assert_eq!(order[0], ("ned09d".to_string(), "11-JUE".to_string()));
        assert_eq!(order[1], ("ned09d".to_string(), "11-OCO".to_string()));
        assert_eq!(order.last(), Some(&("nlcd30m".to_string(), "11-OCO".to_string())));
        Ok(())
    }

    #[test]
    fn unknown_region_rejected() {
        assert!(matches!(build(&["12-XYZ"]), Err(Error::UnknownRegion(_))));
    }

    #[test]
    fn repeated_region_rejected() {
        assert!(matches!(build(&["11-JUE", "11-JUE"]), Err(Error::DuplicatePath(_))));
    }
}
