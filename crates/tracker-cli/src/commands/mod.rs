//! Command implementations

mod status;
mod track;

pub use status::run_status;
pub use track::run_track;
