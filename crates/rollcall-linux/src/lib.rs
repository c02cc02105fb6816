//! Linux-specific implementation for rollcall
//!
//! This crate provides the Linux URL opener used to hand messaging deep links
//! to the desktop environment.

#![cfg(target_os = "linux")]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

/// Program used to open URLs with the user's preferred application.
pub const OPENER: &str = "xdg-open";

/// Open a URL with its registered handler.
///
/// The opener is launched and left running; its exit status is never
/// awaited, so a handler that stays open does not block the caller.
///
/// # Errors
///
/// Returns an error if `xdg-open` cannot be launched.
pub fn open_url(url: &str) -> io::Result<()> {
    debug!(opener = OPENER, "Opening URL");
    Command::new(OPENER)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

/// Get platform name
#[must_use]
pub fn platform_name() -> &'static str {
    "Linux"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_name() {
        assert_eq!(platform_name(), "Linux");
    }

    #[test]
    fn test_opener_program() {
        assert_eq!(OPENER, "xdg-open");
    }
}
