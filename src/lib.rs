pub mod catalog;
pub mod common;
pub mod error;
pub mod storage;
pub mod tuple;

pub use error::{Error, Result};
