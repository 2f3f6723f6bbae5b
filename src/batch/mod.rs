//! Batch driver
//!
//! Runs every discovered header through frontend → adapter → grouper →
//! renderer. A failing header is logged and recorded; it never stops the
//! batch.

pub mod walker;

pub use walker::HeaderWalker;

use crate::error::{BindResult, HeaderError, HeaderResult};
use crate::model::{AdapterOptions, ClassModel, adapt, annotate_overloads};
use crate::parsing::{CppHeaderParser, HeaderDecl, JsonTreeReader, SourceKind};
use crate::render::{RenderOptions, RenderedHeader, render_class, render_script};
use crate::Settings;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A header that failed, with the reason
#[derive(Debug, Clone)]
pub struct HeaderFailure {
    /// Header identifier (file stem)
    pub header: String,
    pub path: PathBuf,
    pub error: HeaderError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rejected by the skip/only lists before parsing
    Filtered,
    /// Parsed fine but has no method with the required name
    NoRequiredMethod,
    /// Another input with the same stem in the same directory was used
    Duplicate,
}

#[derive(Debug, Clone)]
pub struct SkippedHeader {
    pub header: String,
    pub reason: SkipReason,
}

/// Outcome of one batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Accepted headers, ordered by include path
    pub rendered: Vec<RenderedHeader>,
    pub failures: Vec<HeaderFailure>,
    pub skipped: Vec<SkippedHeader>,
    /// Parameters dropped across all accepted headers
    pub dropped_params: usize,
}

impl BatchReport {
    /// The full registration script for the accepted headers
    pub fn script(&self) -> String {
        render_script(&self.rendered)
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

/// Drives the pipeline over a header directory
#[derive(Debug)]
pub struct BindingGenerator {
    settings: Arc<Settings>,
    json: JsonTreeReader,
    cpp: CppHeaderParser,
    adapter: AdapterOptions,
    render: RenderOptions,
}

impl BindingGenerator {
    pub fn new(settings: Arc<Settings>) -> BindResult<Self> {
        let namespace = settings.render.namespace.clone();
        Ok(Self {
            json: JsonTreeReader::new(namespace.clone()),
            cpp: CppHeaderParser::new()?,
            adapter: AdapterOptions { namespace },
            render: RenderOptions::from(&settings.render),
            settings,
        })
    }

    /// Process every header under `root`
    pub fn run(&mut self, root: &Path) -> BatchReport {
        let walker = HeaderWalker::new(Arc::clone(&self.settings));
        let mut report = BatchReport::default();

        let files = walker.discover(root);
        let chosen = select_inputs(&files);

        for path in files {
            let header = header_id(&path);

            if !self.settings.filter.accepts(&header) {
                debug!(header = %header, "filtered by name");
                report.skipped.push(SkippedHeader {
                    header,
                    reason: SkipReason::Filtered,
                });
                continue;
            }

            if chosen.get(&path.with_extension("")) != Some(&path) {
                debug!(path = %path.display(), "another input for this header was used");
                report.skipped.push(SkippedHeader {
                    header,
                    reason: SkipReason::Duplicate,
                });
                continue;
            }

            let model = match self.process_file(&path) {
                Ok(model) => model,
                Err(error) => {
                    warn!(header = %header, kind = error.kind_code(), "{error}");
                    report.failures.push(HeaderFailure {
                        header,
                        path,
                        error,
                    });
                    continue;
                }
            };

            if let Some(required) = self.settings.filter.required_method() {
                if model.count_methods(required) == 0 {
                    debug!(header = %header, required, "no required method, leaving out");
                    report.skipped.push(SkippedHeader {
                        header,
                        reason: SkipReason::NoRequiredMethod,
                    });
                    continue;
                }
            }

            report.dropped_params += model.dropped_params;
            report.rendered.push(RenderedHeader {
                include: include_name(root, &path),
                class_name: model.name.clone(),
                text: render_class(&model, &self.render),
            });
        }

        // Class blocks follow the include order
        report.rendered.sort_by(|a, b| a.include.cmp(&b.include));

        info!(
            rendered = report.rendered.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            dropped_params = report.dropped_params,
            "batch finished"
        );

        report
    }

    /// Read, adapt and annotate one header
    pub fn process_file(&mut self, path: &Path) -> HeaderResult<ClassModel> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| HeaderError::parse(format!("cannot read '{}': {e}", path.display())))?;

        let tree = self.read_tree(&text, SourceKind::for_path(path))?;
        let mut model = adapt(&tree, &self.adapter)?;
        annotate_overloads(&mut model);
        Ok(model)
    }

    fn read_tree(&mut self, text: &str, kind: SourceKind) -> HeaderResult<HeaderDecl> {
        match kind {
            SourceKind::JsonTree => self.json.read_str(text),
            SourceKind::Header => self.cpp.parse(text),
        }
    }
}

fn header_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One input per header: a tree dump wins over the header it was dumped
/// from, and among headers the first in path order wins.
fn select_inputs(files: &[PathBuf]) -> HashMap<PathBuf, PathBuf> {
    let mut chosen: HashMap<PathBuf, PathBuf> = HashMap::new();
    for path in files {
        let key = path.with_extension("");
        match chosen.get(&key) {
            Some(current)
                if SourceKind::for_path(current) == SourceKind::JsonTree
                    || SourceKind::for_path(path) == SourceKind::Header => {}
            _ => {
                chosen.insert(key, path.clone());
            }
        }
    }
    chosen
}

/// Include path relative to the scanned root, `/`-separated. Tree dumps
/// stand in for `<stem>.h`.
fn include_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative = match SourceKind::for_path(path) {
        SourceKind::JsonTree => relative.with_extension("h"),
        SourceKind::Header => relative.to_path_buf(),
    };
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
