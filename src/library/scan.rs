use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::media::SelectedFile;

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand host-supplied paths into a batch of selected files.
///
/// Plain files pass through untouched (their type is judged later by the
/// playlist). Directories are walked in file-name order. Missing paths are
/// logged and skipped.
pub fn collect(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<SelectedFile> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            walk_dir(path, settings, &mut files);
        } else if path.is_file() {
            files.push(SelectedFile::from_path(path.clone()));
        } else {
            warn!(path = ?path, "skipping path that is neither a file nor a directory");
        }
    }

    files
}

fn walk_dir(dir: &Path, settings: &LibrarySettings, out: &mut Vec<SelectedFile>) {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() || (settings.follow_links && entry.path().is_file()) {
            out.push(SelectedFile::from_path(entry.into_path()));
        }
    }
}
