//! Outbound alert delivery: Discord webhook sink, dry-run sink, and the
//! alert message format.

mod discord;
mod message;
mod symbols;

pub use discord::{DiscordNotifier, DryRunNotifier};
pub use message::format_alert;
pub use symbols::display_symbol;
