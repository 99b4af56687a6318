//! Session state and randomized selection.
//!
//! [`Session`] owns the origin, filters, fetched candidates and the current
//! [`SelectionState`]. [`Selector`] runs the timed shuffle that the session
//! drives.

pub mod error;
pub mod selector;
pub mod session;

pub use error::{SelectionError, SessionError};
pub use selector::{final_pick, Selector, ShuffleEvent, ShuffleHandle};
pub use session::{SearchOutcome, SearchTicket, SelectionState, Session};
