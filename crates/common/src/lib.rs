//! Process-level helpers shared by the binary and the server crate.

pub mod env;
pub mod utils;
