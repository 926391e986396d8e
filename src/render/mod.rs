//! Output rendering for counter values and errors.

pub mod counter;
pub mod error;

pub use error::render_error;
