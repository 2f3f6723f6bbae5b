#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stkbind::{BindingGenerator, Settings};
use tempfile::TempDir;

/// Scratch header directory for one test
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Copy `tests/fixtures/<rel>` into the project root under its file name
    pub fn add_fixture(&self, rel: &str) -> PathBuf {
        let source = fixture_path(rel);
        let name = source.file_name().expect("fixture has a file name");
        let target = self.dir.path().join(name);
        fs::copy(&source, &target).expect("Failed to copy fixture");
        target
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn fixture_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel)
}

pub fn read_fixture(rel: &str) -> String {
    fs::read_to_string(fixture_path(rel)).expect("Failed to read fixture")
}

/// Default settings with the real STK skip list and `tick` requirement
pub fn generator() -> BindingGenerator {
    generator_with(Settings::default())
}

pub fn generator_with(settings: Settings) -> BindingGenerator {
    BindingGenerator::new(Arc::new(settings)).expect("Failed to create generator")
}
