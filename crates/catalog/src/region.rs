use serde::Deserialize;

use crate::{Error, Result};

/// One office with the sub-regions that roll up into it.
#[derive(Debug, Clone, Deserialize)]
pub struct Office {
    pub code: String,
    pub regions: Vec<String>,
}

/// The two-level region hierarchy of a run: offices owning sub-regions.
///
/// Both levels are addressable as catalog regions; office mosaics consume the
/// outputs of their member regions.
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    offices: Vec<Office>,
}

impl RegionSet {
    pub fn new(offices: Vec<Office>) -> Result<Self> {
        for office in &offices {
            if office.regions.is_empty() {
                return Err(Error::InvalidConfiguration(format!(
                    "office {} has no member regions",
                    office.code
                )));
            }
        }

        Ok(RegionSet { offices })
    }

    pub fn offices(&self) -> &[Office] {
        &self.offices
    }

    /// Sub-region codes in configuration order.
    pub fn sub_regions(&self) -> impl Iterator<Item = &str> {
        self.offices.iter().flat_map(|o| o.regions.iter().map(String::as_str))
    }

    /// All region codes (sub-regions first, then offices) in configuration order.
    pub fn all_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.sub_regions().map(str::to_string).collect();
        codes.extend(self.offices.iter().map(|o| o.code.clone()));
        codes
    }

    pub fn contains(&self, code: &str) -> bool {
        self.is_office(code) || self.sub_regions().any(|r| r == code)
    }

    pub fn is_office(&self, code: &str) -> bool {
        self.offices.iter().any(|o| o.code == code)
    }

    pub fn office_of(&self, region: &str) -> Option<&str> {
        self.offices
            .iter()
            .find(|o| o.regions.iter().any(|r| r == region))
            .map(|o| o.code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_set() -> RegionSet {
        RegionSet::new(vec![Office {
            code: "11".to_string(),
            regions: vec!["11-JUE".to_string(), "11-OCO".to_string()],
        }])
        .expect("valid region set")
    }

    #[test]
    fn hierarchy_lookup() {
        let regions = region_set();
        assert!(regions.contains("11-JUE"));
        assert!(regions.contains("11"));
        assert!(!regions.contains("12"));
        assert!(regions.is_office("11"));
        assert!(!regions.is_office("11-JUE"));
        assert_eq!(regions.office_of("11-OCO"), Some("11"));
        assert_eq!(regions.office_of("11"), None);
    }

    #[test]
    fn empty_office_rejected() {
        let result = RegionSet::new(vec![Office {
            code: "13".to_string(),
            regions: Vec::new(),
        }]);
        assert!(result.is_err());
    }
}
