use crate::header::HeaderMultiMap;

/// Deferred file reference: read lazily by the response engine relative to
/// the owning plugin's config directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub base_dir: String,
    pub file_name: String,
}

impl FileRef {
    pub fn full_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.base_dir).join(&self.file_name)
    }
}

/// The mutable, accumulating response half of an [`crate::exchange::Exchange`].
#[derive(Debug, Clone, Default)]
pub struct ResponseState {
    /// 0 means unset; the response engine maps this to 200 at write-out.
    pub status: u16,
    pub headers: HeaderMultiMap,
    pub body: Vec<u8>,
    pub file: Option<FileRef>,
    /// True once any component has committed a response.
    pub handled: bool,
    /// True if a fatal failure injection (CloseConnection) applied.
    pub stopped: bool,
}

impl ResponseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effective_status(&self) -> u16 {
        if self.status == 0 {
            200
        } else {
            self.status
        }
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn mark_handled(&mut self) {
        self.handled = true;
    }
}
