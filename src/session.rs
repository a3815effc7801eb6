use std::path::PathBuf;

use crate::tree::TreePage;

/// State carried between input cycles.
#[derive(Debug)]
pub struct Session {
    pub current_dir: PathBuf,
    /// Last rendered `ls` page; repainted until the next successful `ls`.
    pub tree: Option<TreePage>,
    /// Message from the last command that failed.
    pub status: Option<String>,
}

impl Session {
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            tree: None,
            status: None,
        }
    }

    /// Relative arguments resolve against the current directory; absolute
    /// ones are returned unchanged.
    pub fn resolve(&self, arg: &str) -> PathBuf {
        self.current_dir.join(arg)
    }
}
