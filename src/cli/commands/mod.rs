//! CLI command implementations

pub mod car;
pub mod category;
pub mod completions;
pub mod init;
pub mod manufacturer;
pub mod model;
pub mod status;
