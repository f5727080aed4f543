//! Interactive front end for a cairn arena.
//!
//! The binary (`cairn`) prompts for allocation sizes on stdin and reports
//! each result. The loop itself lives in [`session`] and is usable with any
//! reader/writer pair, which is how the tests drive it.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod logging;
pub mod session;

pub use session::{ExitReason, Session, SessionConfig, SessionSummary};
