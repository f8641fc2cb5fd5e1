//! Settings sources layered by the loader.

pub mod environment;
pub mod settings_file;
