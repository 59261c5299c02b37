//! Craps domain types.
//!
//! Defines the dice, phase, bet taxonomy, shooter progress and settlement records used by the
//! execution layer and by anything that consumes its roll reports.

mod bet;
mod constants;
mod outcome;
mod progress;
mod report;
mod roll;

pub use bet::*;
pub use constants::*;
pub use outcome::*;
pub use progress::*;
pub use report::*;
pub use roll::*;
