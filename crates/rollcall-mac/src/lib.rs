//! macOS-specific implementation for rollcall.
//!
//! This crate provides the macOS URL opener. Links are passed to
//! `/usr/bin/open`, which routes `https://wa.me` links to the messaging app
//! when it is installed and to the default browser otherwise.

#![cfg(target_os = "macos")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::process::{Command, Stdio};

/// Program used to open URLs through Launch Services.
pub const OPENER: &str = "open";

/// Open a URL with its registered handler.
///
/// The opener is launched and left running; its exit status is never
/// awaited, so a handler that stays open does not block the caller.
///
/// # Errors
///
/// Returns an error if `open` cannot be launched.
pub fn open_url(url: &str) -> io::Result<()> {
    tracing::debug!(opener = OPENER, "Opening URL via Launch Services");
    Command::new(OPENER)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

/// Get the platform name.
#[must_use]
pub fn platform_name() -> &'static str {
    "macOS"
}
