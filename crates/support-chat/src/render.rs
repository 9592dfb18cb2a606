//! Terminal rendering of chat messages.

use owo_colors::OwoColorize;
use support_chat_core::conversation::{Message, Role};

/// The gutter drawn in front of every rendered message.
pub const BAR_CHAR: &str = "▎";

/// Renders a message as a single line for the terminal.
///
/// With `colored` unset, the line carries no escape sequences.
pub fn message_line(message: &Message, colored: bool) -> String {
    let time = message.created_at().format("%H:%M");
    let (icon, name) = match message.role() {
        Role::Requester => ("🙂", "You"),
        Role::Responder => ("🤖", "Support"),
    };
    let text = message.text();

    if !colored {
        let mark = if message.is_failed() { " (!)" } else { "" };
        return format!("{BAR_CHAR}{icon} {name} [{time}]{mark} {text}");
    }

    let bar = match (message.role(), message.is_failed()) {
        (_, true) => BAR_CHAR.bright_red().to_string(),
        (Role::Requester, false) => BAR_CHAR.bright_green().to_string(),
        (Role::Responder, false) => BAR_CHAR.bright_cyan().to_string(),
    };
    let text = if message.is_failed() {
        text.bright_red().to_string()
    } else {
        text.bright_white().to_string()
    };
    let stamp = format!("[{time}]");
    format!("{bar}{icon} {} {} {text}", name.bold(), stamp.dimmed())
}
