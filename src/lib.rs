#![doc = include_str!("../README.md")]

mod error;
mod prelude;

pub mod framing;

pub use error::{Error, Result};
