//! Output destination for the rendered script.
//!
//! The sink owns a buffered writer over a file or stdout. `finish` flushes
//! and reports write errors; dropping an unfinished sink still releases the
//! file handle.

use crate::error::{BindError, BindResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct OutputSink {
    writer: BufWriter<Box<dyn Write>>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("path", &self.path)
            .finish()
    }
}

impl OutputSink {
    /// Open the sink: a file when `path` is given, stdout otherwise
    pub fn open(path: Option<&Path>) -> BindResult<Self> {
        let writer: Box<dyn Write> = match path {
            Some(p) => Box::new(File::create(p).map_err(|source| BindError::FileWrite {
                path: p.to_path_buf(),
                source,
            })?),
            None => Box::new(std::io::stdout()),
        };

        Ok(Self {
            writer: BufWriter::new(writer),
            path: path.map(Path::to_path_buf),
        })
    }

    pub fn write_str(&mut self, text: &str) -> BindResult<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|source| self.write_error(source))
    }

    /// Flush buffered output
    pub fn finish(mut self) -> BindResult<()> {
        self.writer.flush().map_err(|source| self.write_error(source))
    }

    /// Destination shown in messages
    pub fn describe(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => "<stdout>".to_string(),
        }
    }

    fn write_error(&self, source: std::io::Error) -> BindError {
        BindError::FileWrite {
            path: self.path.clone().unwrap_or_else(|| PathBuf::from("<stdout>")),
            source,
        }
    }
}
