//! Header discovery
//!
//! Lists candidate inputs under the include directory with support for:
//! - .gitignore and .stkbindignore rules
//! - Extension filtering from configuration
//! - Optional recursion

use crate::Settings;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Walks the include directory to find headers to process
#[derive(Debug)]
pub struct HeaderWalker {
    settings: Arc<Settings>,
}

impl HeaderWalker {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Walk a directory and return an iterator of candidate files
    pub fn walk(&self, root: &Path) -> impl Iterator<Item = PathBuf> {
        let mut builder = WalkBuilder::new(root);

        builder
            .hidden(true) // Skip hidden files and directories
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .follow_links(false)
            .require_git(false);

        if !self.settings.input.recursive {
            builder.max_depth(Some(1));
        }

        builder.add_custom_ignore_filename(".stkbindignore");

        let extensions = self.settings.input.extensions.clone();

        builder
            .build()
            .filter_map(Result::ok) // Skip entries we can't access
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(move |entry| {
                let path = entry.path();
                let ext = path.extension()?.to_str()?;
                if extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                    Some(path.to_path_buf())
                } else {
                    None
                }
            })
    }

    /// All candidate files, sorted by path
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.walk(root).collect();
        files.sort();
        files
    }
}
