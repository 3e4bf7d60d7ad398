//! Utilities shared by the other crates: hierarchical timing and logging, plus a few small
//! helpers.

#[macro_use]
extern crate log;

mod collections;
pub mod logger;
mod time;
mod utils;

pub use crate::collections::wraparound_get;
pub use crate::time::Timer;
pub use crate::utils::prettyprint_usize;

const PROGRESS_FREQUENCY_SECONDS: f64 = 0.2;
