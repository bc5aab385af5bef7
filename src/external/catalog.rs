//! Static satellite-configuration catalog matcher.
//!
//! Matches files in the input directory whose names start with a selected
//! rule's product code (e.g. `GF2_PMS1_E113.9_N22.6_20240312.tiff` for `GF2`).

use serde::{Deserialize, Serialize};

use crate::error::{DesignerError, Result};
use crate::external::{MatchRequest, MatchedResource, ResourceMatcher};

/// One satellite/sensor configuration rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteRule {
    pub id: String,
    pub name: String,
    pub satellite_type: String,
    pub sensor: String,
    /// File-name prefix identifying products of this configuration.
    pub code: String,
    pub resolution: String,
}

impl SatelliteRule {
    fn new(id: &str, name: &str, satellite: &str, sensor: &str, code: &str, resolution: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            satellite_type: satellite.to_string(),
            sensor: sensor.to_string(),
            code: code.to_string(),
            resolution: resolution.to_string(),
        }
    }

    fn matches_file(&self, file_name: &str) -> bool {
        file_name
            .to_ascii_uppercase()
            .starts_with(&self.code.to_ascii_uppercase())
    }
}

/// Matcher over a fixed rule list.
#[derive(Debug, Clone)]
pub struct CatalogMatcher {
    rules: Vec<SatelliteRule>,
}

impl Default for CatalogMatcher {
    fn default() -> Self {
        Self::new(vec![
            SatelliteRule::new("gf1-pms", "高分一号 PMS", "高分一号", "PMS", "GF1", "2m"),
            SatelliteRule::new("gf2-pms", "高分二号 PMS", "高分二号", "PMS", "GF2", "0.8m"),
            SatelliteRule::new("zy3-mux", "资源三号 MUX", "资源三号", "MUX", "ZY3", "5.8m"),
            SatelliteRule::new("s2-msi", "Sentinel-2 MSI", "Sentinel-2", "MSI", "S2", "10m"),
            SatelliteRule::new("l8-oli", "Landsat-8 OLI", "Landsat-8", "OLI", "LC08", "30m"),
        ])
    }
}

impl CatalogMatcher {
    pub fn new(rules: Vec<SatelliteRule>) -> Self {
        Self { rules }
    }

    fn rule(&self, id: &str) -> Result<&SatelliteRule> {
        self.rules
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DesignerError::Matcher(format!("unknown rule '{}'", id)))
    }
}

impl ResourceMatcher for CatalogMatcher {
    fn available_rules(&self) -> Vec<SatelliteRule> {
        self.rules.clone()
    }

    fn match_resources(&self, request: &MatchRequest) -> Result<Vec<MatchedResource>> {
        let input = request.input_path.trim();
        if input.is_empty() {
            return Err(DesignerError::Matcher("input path is empty".to_string()));
        }
        let rules = request
            .rule_ids
            .iter()
            .map(|id| self.rule(id))
            .collect::<Result<Vec<_>>>()?;

        let entries = std::fs::read_dir(input).map_err(|e| {
            DesignerError::Matcher(format!("cannot read input directory {}: {}", input, e))
        })?;
        let mut file_names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        file_names.sort();

        let mut matched = Vec::new();
        for rule in rules {
            for file_name in file_names.iter().filter(|f| rule.matches_file(f)) {
                matched.push(MatchedResource {
                    id: format!("{}:{}", rule.id, file_name),
                    name: file_name.clone(),
                    satellite_type: rule.satellite_type.clone(),
                    sensor: rule.sensor.clone(),
                    code: rule.code.clone(),
                    resolution: rule.resolution.clone(),
                });
            }
        }
        tracing::debug!(
            "Matched {} resources in {} for rules {:?}",
            matched.len(),
            input,
            request.rule_ids
        );
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "GF2_PMS1_E113.9_N22.6_20240312.tiff",
            "gf2_pms2_E114.0_N22.7_20240312.tiff",
            "LC08_L1TP_122044_20240301.tif",
            "readme.txt",
        ] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("GF2_subdir")).unwrap();
        dir
    }

    fn request(dir: &tempfile::TempDir, rules: &[&str]) -> MatchRequest {
        MatchRequest {
            input_path: dir.path().to_string_lossy().into_owned(),
            rule_ids: rules.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_matches_by_code_prefix() {
        let dir = fixture_dir();
        let matched = CatalogMatcher::default()
            .match_resources(&request(&dir, &["gf2-pms"]))
            .unwrap();
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|m| m.satellite_type == "高分二号"));
        assert!(matched.iter().all(|m| m.resolution == "0.8m"));
    }

    #[test]
    fn test_multiple_rules() {
        let dir = fixture_dir();
        let matched = CatalogMatcher::default()
            .match_resources(&request(&dir, &["gf2-pms", "l8-oli"]))
            .unwrap();
        assert_eq!(matched.len(), 3);
        assert_eq!(matched[2].code, "LC08");
    }

    #[test]
    fn test_empty_path_fails() {
        let err = CatalogMatcher::default()
            .match_resources(&MatchRequest::default())
            .unwrap_err();
        assert!(matches!(err, DesignerError::Matcher(_)));
    }

    #[test]
    fn test_unknown_rule_fails() {
        let dir = fixture_dir();
        let err = CatalogMatcher::default()
            .match_resources(&request(&dir, &["nope"]))
            .unwrap_err();
        assert!(err.to_string().contains("unknown rule"));
    }

    #[test]
    fn test_missing_directory_fails() {
        let request = MatchRequest {
            input_path: "/no/such/dir".to_string(),
            rule_ids: vec!["gf1-pms".to_string()],
        };
        assert!(CatalogMatcher::default().match_resources(&request).is_err());
    }
}
