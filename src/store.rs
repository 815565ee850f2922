use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::error;

use crate::error::Result;

pub const DOCKERFILE_FILENAME: &str = "Dockerfile";

/// Line source/sink the editor runs against. Lines keep their original
/// trailing newline; a write fully overwrites prior content.
pub trait LineStore {
    fn read_lines(&mut self) -> Result<Vec<String>>;
    fn write_lines(&mut self, lines: &[String]) -> Result<()>;
}

/// Split text into lines, each keeping its trailing `\n`. A final segment
/// without a newline is kept as-is, so `split_lines(s).concat() == s`.
pub fn split_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = content;
    while let Some(pos) = rest.find('\n') {
        lines.push(rest[..=pos].to_string());
        rest = &rest[pos + 1..];
    }
    if !rest.is_empty() {
        lines.push(rest.to_string());
    }
    lines
}

/// File-backed store. Resolves a directory path to the `Dockerfile` inside
/// it and can optionally keep the file content cached between operations.
pub struct FileStore {
    path: PathBuf,
    caching: bool,
    cached: Option<String>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: resolve_path(path.as_ref()),
            caching: false,
            cached: None,
        }
    }

    /// Cache content in memory: reads are served from the cache once it is
    /// populated, writes refresh it. A file that does not exist yet is fine;
    /// the cache stays empty until the first successful read.
    pub fn with_cache(path: impl AsRef<Path>) -> Self {
        let mut store = Self {
            path: resolve_path(path.as_ref()),
            caching: true,
            cached: None,
        };
        if let Ok(content) = fs::read_to_string(&store.path) {
            store.cached = Some(content);
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&mut self) -> Result<String> {
        if let Some(cached) = &self.cached {
            return Ok(cached.clone());
        }
        let content = fs::read_to_string(&self.path).map_err(|err| {
            error!("couldn't read {}: {}", self.path.display(), err);
            err
        })?;
        if self.caching {
            self.cached = Some(content.clone());
        }
        Ok(content)
    }

    pub fn set_content(&mut self, content: &str) -> Result<()> {
        if self.caching {
            self.cached = Some(content.to_string());
        }
        fs::write(&self.path, content).map_err(|err| {
            error!("couldn't write {}: {}", self.path.display(), err);
            err
        })?;
        Ok(())
    }
}

impl LineStore for FileStore {
    fn read_lines(&mut self) -> Result<Vec<String>> {
        Ok(split_lines(&self.content()?))
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        self.set_content(&lines.concat())
    }
}

fn resolve_path(path: &Path) -> PathBuf {
    if path.file_name() == Some(OsStr::new(DOCKERFILE_FILENAME)) {
        path.to_path_buf()
    } else {
        path.join(DOCKERFILE_FILENAME)
    }
}

/// In-memory store for callers that have no backing file.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    lines: Vec<String>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_content(content: &str) -> Self {
        Self {
            lines: split_lines(content),
        }
    }

    pub fn content(&self) -> String {
        self.lines.concat()
    }
}

impl LineStore for MemStore {
    fn read_lines(&mut self) -> Result<Vec<String>> {
        Ok(self.lines.clone())
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        self.lines = lines.to_vec();
        Ok(())
    }
}
