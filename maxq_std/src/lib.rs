#![allow(clippy::new_without_default)]

mod context;
mod errors;
pub mod files;
pub mod text;

pub use context::*;
pub use errors::*;
