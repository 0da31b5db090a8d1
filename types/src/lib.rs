//! Data model for the chalkline pool series.
//!
//! Everything here is plain data: the two players, the power-up catalog and
//! its monthly quotas, the immutable match log, and the transient live-game
//! session. The rules that manipulate these types live in `chalkline-engine`.

mod constants;
mod error;
mod live;
mod money;
mod month;
mod player;
mod powerup;
mod record;
mod state;

pub use constants::*;
pub use error::*;
pub use live::*;
pub use money::*;
pub use month::*;
pub use player::*;
pub use powerup::*;
pub use record::*;
pub use state::*;

#[cfg(test)]
mod tests;
