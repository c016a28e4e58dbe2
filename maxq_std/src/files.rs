//! Kernel and log file access.
//!
//! Toolkit routines never open files themselves. Every path goes through the
//! context's [`FileManager`], so a host can confine kernel loading to a content
//! directory, or serve kernels from memory.

use std::{
    collections::HashMap,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use relative_path::RelativePath;

use crate::{Error, Result};

pub trait FileManager<'a> {
    /// Directory that relative names are resolved against
    fn root(&self) -> Option<&Path>;
    fn set_root(&mut self, root: PathBuf);

    /// Redirect everything the toolkit would print (error reports) into a buffer
    fn capture_stdout(&mut self, stdout: &'a mut Vec<u8>);
    fn write_stdout(&mut self, data: &[u8]) -> Result<()>;

    fn resolve(&self, name: &str) -> PathBuf;
    fn exists(&self, path: &Path) -> bool;
    fn read(&mut self, path: &Path) -> Result<Vec<u8>>;
    fn append(&mut self, path: &Path, data: &[u8]) -> Result<()>;
}

fn resolve_against(root: Option<&Path>, name: &str) -> PathBuf {
    let name = name.trim();
    let path = Path::new(name);
    match root {
        Some(root) if !path.is_absolute() => RelativePath::new(name).to_logical_path(root),
        _ => path.to_path_buf(),
    }
}

pub struct FsFileManager<'a> {
    root: Option<PathBuf>,
    stdout: Box<dyn Write + 'a>,
}

impl<'a> FsFileManager<'a> {
    pub fn new() -> Self {
        Self {
            root: None,
            stdout: Box::new(std::io::stdout()),
        }
    }

    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: Some(root.into()),
            stdout: Box::new(std::io::stdout()),
        }
    }
}

impl<'a> FileManager<'a> for FsFileManager<'a> {
    fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn set_root(&mut self, root: PathBuf) {
        self.root = Some(root);
    }

    fn capture_stdout(&mut self, stdout: &'a mut Vec<u8>) {
        self.stdout = Box::new(stdout);
    }

    fn write_stdout(&mut self, data: &[u8]) -> Result<()> {
        self.stdout.write_all(data)?;
        Ok(self.stdout.flush()?)
    }

    fn resolve(&self, name: &str) -> PathBuf {
        resolve_against(self.root.as_deref(), name)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&mut self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }

    fn append(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(file.write_all(data)?)
    }
}

/// Serves files from memory. Appended files (e.g. an error log device) are kept
/// in memory too, and can be inspected with [`MemFileManager::get`].
pub struct MemFileManager<'a> {
    root: Option<PathBuf>,
    files: HashMap<PathBuf, Vec<u8>>,
    stdout: Option<&'a mut Vec<u8>>,
}

impl<'a> MemFileManager<'a> {
    pub fn new() -> Self {
        Self {
            root: None,
            files: HashMap::new(),
            stdout: None,
        }
    }

    pub fn insert<P: AsRef<str>>(&mut self, name: P, contents: impl Into<Vec<u8>>) {
        let path = self.resolve(name.as_ref());
        self.files.insert(path, contents.into());
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(&self.resolve(name)).map(|v| v.as_slice())
    }
}

impl<'a> FileManager<'a> for MemFileManager<'a> {
    fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn set_root(&mut self, root: PathBuf) {
        self.root = Some(root);
    }

    fn capture_stdout(&mut self, stdout: &'a mut Vec<u8>) {
        self.stdout = Some(stdout);
    }

    fn write_stdout(&mut self, data: &[u8]) -> Result<()> {
        // Without a capture buffer, output is discarded
        if let Some(stdout) = &mut self.stdout {
            stdout.extend_from_slice(data);
        }
        Ok(())
    }

    fn resolve(&self, name: &str) -> PathBuf {
        resolve_against(self.root.as_deref(), name)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read(&mut self, path: &Path) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            Error::IO(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))
        })
    }

    fn append(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        self.files
            .entry(path.to_path_buf())
            .or_default()
            .extend_from_slice(data);
        Ok(())
    }
}
