//! Rules engine for the chalkline pool series.
//!
//! The pure pieces live in [`resolve`], [`rollover`], [`replay`] and
//! [`stakes`]; they take state by reference and return new values. The
//! live-game (Toep) transitions in [`live`] mutate a session in place. The
//! [`service`] module ties both together behind a single-owner facade that
//! stamps ids and timestamps and emits an event per state change.

pub mod live;
pub mod replay;
pub mod resolve;
pub mod rollover;
pub mod service;
pub mod stakes;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


pub use resolve::{resolve, MatchInputs, MatchMeta};
pub use service::{Clock, Event, Series, SystemClock};
