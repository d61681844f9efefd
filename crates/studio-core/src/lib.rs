pub mod board;
pub mod calendar;
pub mod config;
pub mod content;
pub mod error;
pub mod flags;
pub mod goal;
pub mod ideas;
pub mod io;
pub mod paths;
pub mod store;
pub mod types;

pub use error::{Result, StudioError};
pub use store::Store;
