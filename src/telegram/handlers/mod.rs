//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! Every branch converts its update into a navigation `Inbound` action and
//! delivers the controller's reply.

mod schema;
mod types;

pub use schema::{callback_inbound, message_inbound, schema};
pub use types::{user_key, HandlerDeps, HandlerError};
