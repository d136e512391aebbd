use std::path::{Path, PathBuf};

/// MIME type assumed when neither the host nor the file name tells us better.
const FALLBACK_MIME: &str = "application/octet-stream";

/// A file handed to the player by the host, with its declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    path: PathBuf,
    mime: String,
}

impl SelectedFile {
    /// Wrap `path` with a MIME type supplied by the caller.
    pub fn new(path: impl Into<PathBuf>, mime: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime: mime.into(),
        }
    }

    /// Wrap `path`, guessing the MIME type from its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime = mime_guess::from_path(&path)
            .first_raw()
            .unwrap_or(FALLBACK_MIME)
            .to_string();
        Self { path, mime }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The final path component, or an empty string for paths without one.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn is_audio(&self) -> bool {
        self.mime.starts_with("audio/")
    }
}

/// Strip the last `.ext` from a file name.
///
/// A trailing dot with nothing after it is not an extension, so `"a."` stays
/// as is. A leading-dot name such as `".mp3"` becomes empty.
pub fn title_from_file_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => &name[..dot],
        _ => name,
    }
}
