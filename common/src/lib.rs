//! Types shared by the storage crate and the command line tool.

pub mod directory;

pub use directory::*;

#[cfg(test)]
mod tests;
