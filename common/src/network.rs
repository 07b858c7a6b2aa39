pub mod host;
pub mod target;
