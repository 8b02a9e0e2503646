//! Tic filter - suppress a user's registered involuntary movements
//!
//! Re-exports only. All logic in submodules.

mod facial;
mod filter;
mod history;
mod oscillation;
mod postural;
mod profile;

pub use filter::TicFilter;
pub use history::{ChannelHistory, TicEvent, TicHistory};
pub use oscillation::{count_reversals, is_oscillating, MIN_OSCILLATION_SAMPLES};
pub use profile::{TicKind, TicProfile};
