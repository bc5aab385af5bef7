//! Mock collaborators

use std::path::PathBuf;

use geoline_designer::external::{
    BrowseRequest, MatchRequest, MatchedResource, PathSelector, ResourceMatcher, SatelliteRule,
    SelectedPath,
};
use geoline_designer::Result;
use mockall::mock;

mock! {
    pub Selector {}

    impl PathSelector for Selector {
        fn browse(&self, request: &BrowseRequest) -> Option<SelectedPath>;
    }
}

mock! {
    pub Matcher {}

    impl ResourceMatcher for Matcher {
        fn available_rules(&self) -> Vec<SatelliteRule>;
        fn match_resources(&self, request: &MatchRequest) -> Result<Vec<MatchedResource>>;
    }
}

/// Selector that always answers with `path`.
pub fn selector_returning(path: &str) -> MockSelector {
    let path = PathBuf::from(path);
    let mut selector = MockSelector::new();
    selector
        .expect_browse()
        .returning(move |_| Some(SelectedPath::Path(path.clone())));
    selector
}

/// Selector whose dialog is always cancelled.
pub fn cancelling_selector() -> MockSelector {
    let mut selector = MockSelector::new();
    selector.expect_browse().returning(|_| None);
    selector
}

pub fn resource(id: &str, satellite: &str) -> MatchedResource {
    MatchedResource {
        id: id.to_string(),
        name: format!("{}.tiff", id),
        satellite_type: satellite.to_string(),
        sensor: "PMS".to_string(),
        code: id.split('_').next().unwrap_or(id).to_string(),
        resolution: "2m".to_string(),
    }
}
