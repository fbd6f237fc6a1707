pub mod boundary;
pub mod cli;
pub mod commit;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod gate;
pub mod git;
pub mod host;
pub mod replace;
pub mod ui;
pub mod updater;
pub mod version;

pub use error::{ActionError, Result};
