use std::fmt;
use std::path::Path;

use shared::domain::ImageRole;
use url::Url;

type ReleaseFn = Box<dyn FnOnce(&str) + Send>;

/// The `file://` URI for a local path. `None` only for paths that cannot
/// name a local file (relative or empty).
pub fn file_uri(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(String::from)
}

/// A displayable reference to a locally selected file: a `file://` URI plus
/// a release hook for whatever resource backs the on-screen preview.
///
/// The hook fires exactly once, on whichever comes first of replacement,
/// explicit clear, or the owning session going away. All three paths funnel
/// through `Drop`, so a double release is unrepresentable.
pub struct UploadedImage {
    uri: String,
    release: Option<ReleaseFn>,
}

impl UploadedImage {
    pub fn new(uri: impl Into<String>, release: impl FnOnce(&str) + Send + 'static) -> Self {
        Self {
            uri: uri.into(),
            release: Some(Box::new(release)),
        }
    }

    /// Builds the handle straight from a local path; see [`file_uri`].
    pub fn from_path(path: &Path, release: impl FnOnce(&str) + Send + 'static) -> Option<Self> {
        Some(Self::new(file_uri(path)?, release))
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Consumes the handle, firing the release hook now rather than at the
    /// end of the enclosing scope.
    pub fn release(self) {}
}

impl Drop for UploadedImage {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(&self.uri);
        }
    }
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

/// The session's two upload slots. At most one active image per role; a new
/// selection replaces (and thereby releases) the previous one.
#[derive(Debug, Default)]
pub struct ImageSlots {
    model: Option<UploadedImage>,
    garment: Option<UploadedImage>,
}

impl ImageSlots {
    pub fn set(&mut self, role: ImageRole, image: UploadedImage) {
        *self.slot_mut(role) = Some(image);
    }

    pub fn clear(&mut self, role: ImageRole) {
        *self.slot_mut(role) = None;
    }

    pub fn clear_all(&mut self) {
        self.model = None;
        self.garment = None;
    }

    pub fn get(&self, role: ImageRole) -> Option<&UploadedImage> {
        match role {
            ImageRole::Model => self.model.as_ref(),
            ImageRole::Garment => self.garment.as_ref(),
        }
    }

    pub fn is_filled(&self, role: ImageRole) -> bool {
        self.get(role).is_some()
    }

    pub fn both_present(&self) -> bool {
        self.model.is_some() && self.garment.is_some()
    }

    fn slot_mut(&mut self, role: ImageRole) -> &mut Option<UploadedImage> {
        match role {
            ImageRole::Model => &mut self.model,
            ImageRole::Garment => &mut self.garment,
        }
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
