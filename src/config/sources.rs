//! Configuration sources layered over the merge-policy defaults.

pub mod env;
pub mod file;
