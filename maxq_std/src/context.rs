//! Context object holding all of the toolkit's 'global' state.
//!
//! This stores a single instance of each type `T: SaveInit`, where each `T`
//! should represent the saved state of one family of toolkit routines
//! (the kernel pool, the error subsystem, the kernel table, ...).
//!
//! `ctx.get_vars::<T>()` will use `T::new()` on the first call, then return the same
//! `T` on subsequent calls.
//!
//! It actually returns an `Rc<RefCell<T>>`, for dynamic lifetime and borrow-checking.
//! Routines must drop their borrow before calling into another routine that may use
//! the same state.
//!
//! `Context` also provides a way to intercept and/or sandbox any file access.

use chrono::{DateTime, Utc};
use std::{
    any::{Any, TypeId},
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::files::{FileManager, FsFileManager};
use crate::{Error, Result};

pub trait SaveInit {
    fn new() -> Self;
}

pub struct Context<'a> {
    data: HashMap<TypeId, Rc<dyn Any>>,

    file_manager: Box<dyn FileManager<'a> + 'a>,

    // Mirrors the error subsystem's failed flag, since FAILED is called by
    // nearly every routine
    spice_failed: bool,

    fixed_time: Option<DateTime<Utc>>,
}

impl<'a> Context<'a> {
    pub fn new() -> Self {
        Self::with_file_manager(FsFileManager::new())
    }

    pub fn with_file_manager<F: FileManager<'a> + 'a>(file_manager: F) -> Self {
        Self {
            data: HashMap::new(),
            file_manager: Box::new(file_manager),
            spice_failed: false,
            fixed_time: None,
        }
    }

    pub fn get_vars<T: 'static + SaveInit>(&mut self) -> Rc<RefCell<T>> {
        let obj = self
            .data
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Rc::new(RefCell::new(T::new())));

        match Rc::downcast::<RefCell<T>>(Rc::clone(obj)) {
            Ok(vars) => vars,
            // Entries are keyed by their own TypeId
            Err(_) => unreachable!("saved state stored under the wrong type"),
        }
    }

    /// Drop every routine's saved state, returning the toolkit to its initial state
    pub fn clear_vars(&mut self) {
        self.data.clear();
        self.spice_failed = false;
    }

    /// Equivalent of the toolkit terminating the process. The error propagates to
    /// the caller instead.
    pub fn exit(&self, status: i32) -> Result<()> {
        Err(Error::Terminated(status))
    }

    pub fn utc_now(&self) -> DateTime<Utc> {
        self.fixed_time.unwrap_or_else(Utc::now)
    }

    /// Freeze the clock seen by `utc_now`, for reproducible tests
    pub fn set_fixed_time(&mut self, time: Option<DateTime<Utc>>) {
        self.fixed_time = time;
    }

    pub fn set_stdout(&mut self, stdout: &'a mut Vec<u8>) {
        self.file_manager.capture_stdout(stdout);
    }

    pub fn write_stdout(&mut self, data: &[u8]) -> Result<()> {
        self.file_manager.write_stdout(data)
    }

    pub fn content_root(&self) -> Option<&Path> {
        self.file_manager.root()
    }

    pub fn set_content_root<P: Into<PathBuf>>(&mut self, root: P) {
        self.file_manager.set_root(root.into());
    }

    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.file_manager.resolve(name)
    }

    pub fn file_exists(&self, path: &Path) -> bool {
        self.file_manager.exists(path)
    }

    pub fn read_file(&mut self, path: &Path) -> Result<Vec<u8>> {
        self.file_manager.read(path)
    }

    pub fn append_file(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        self.file_manager.append(path, data)
    }

    pub fn get_spice_failed(&self) -> bool {
        self.spice_failed
    }

    pub fn set_spice_failed(&mut self, value: bool) {
        self.spice_failed = value;
    }
}

impl Default for Context<'_> {
    fn default() -> Self {
        Self::new()
    }
}
