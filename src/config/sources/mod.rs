//! Configuration sources feeding the loader.

pub mod file;
