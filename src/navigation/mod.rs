//! Menu navigation state machine
//!
//! Transport-independent: inbound actions come in as [`Inbound`] values and
//! leave as [`Reply`] values. The Telegram adapter in `crate::telegram`
//! translates both directions.

pub mod action;
pub mod controller;
pub mod reply;
pub mod session;

pub use action::{MenuAction, SubcategoryKey};
pub use controller::{Inbound, Navigator, PhotoVariant};
pub use reply::{Button, Reply};
pub use session::{SessionState, SessionStore, UserKey};
