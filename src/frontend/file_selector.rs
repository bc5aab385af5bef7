//! Native file dialog implementation of [`PathSelector`].

use crate::external::{BrowseRequest, PathSelector, SelectedPath};

/// Opens blocking `rfd` dialogs on the UI thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativePathSelector;

impl PathSelector for NativePathSelector {
    fn browse(&self, request: &BrowseRequest) -> Option<SelectedPath> {
        let mut dialog = rfd::FileDialog::new().set_title(&request.title);
        for filter in &request.filters {
            dialog = dialog.add_filter(&filter.name, filter.extensions.as_slice());
        }
        let picked = if request.directory {
            dialog.pick_folder()
        } else {
            dialog.pick_file()
        };
        if picked.is_none() {
            tracing::debug!("Path selection '{}' cancelled", request.title);
        }
        picked.map(SelectedPath::Path)
    }
}
