//! Dispatching outbound links.
//!
//! Opening a link is the only side effect rollcall has on the outside world.
//! The core never opens anything itself; it is handed a [`Dispatcher`] and
//! only records that a link was opened. Whether the messaging application
//! actually delivered anything is unknown to rollcall.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::config::DispatchConfig;
use crate::contact::ContactRecord;
use crate::error::{Error, Result};
use crate::link::LinkComposer;

/// Something that can open an outbound link.
pub trait Dispatcher: std::fmt::Debug {
    /// Short name for logs and status output.
    fn name(&self) -> &'static str;

    /// Open the link. Fire-and-forget: success only means the link was
    /// handed off.
    ///
    /// # Errors
    ///
    /// Returns an error if the link could not be handed off at all.
    fn dispatch(&self, url: &str) -> Result<()>;
}

/// Opens links with the operating system's handler, or a configured
/// opener command.
#[derive(Debug, Clone, Default)]
pub struct SystemDispatcher {
    opener: Option<Vec<String>>,
}

impl SystemDispatcher {
    /// Use the platform's default opener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom opener command such as `firefox --new-window`.
    ///
    /// The command line is split with shell quoting rules and the URL is
    /// appended as the last argument.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the command line cannot be split or
    /// is empty.
    pub fn with_opener(command_line: &str) -> Result<Self> {
        let words = shell_words::split(command_line).map_err(|e| Error::ConfigValidation {
            message: format!("invalid opener command '{command_line}': {e}"),
        })?;
        if words.is_empty() {
            return Err(Error::ConfigValidation {
                message: "opener command must not be empty".to_string(),
            });
        }
        Ok(Self {
            opener: Some(words),
        })
    }

    /// The custom opener, if one is configured.
    #[must_use]
    pub fn opener(&self) -> Option<&[String]> {
        self.opener.as_deref()
    }

    fn run_opener(words: &[String], url: &str) -> Result<()> {
        let (program, args) = words
            .split_first()
            .ok_or_else(|| Error::internal("opener command is empty"))?;

        // Fire-and-forget: the child is not waited on.
        Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::dispatch(url, format!("failed to launch {program}: {e}")))?;
        Ok(())
    }
}

impl Dispatcher for SystemDispatcher {
    fn name(&self) -> &'static str {
        if self.opener.is_some() {
            "custom"
        } else {
            "system"
        }
    }

    fn dispatch(&self, url: &str) -> Result<()> {
        if let Some(words) = &self.opener {
            return Self::run_opener(words, url);
        }
        platform_open(url)
    }
}

#[cfg(target_os = "linux")]
fn platform_open(url: &str) -> Result<()> {
    rollcall_linux::open_url(url).map_err(|e| Error::dispatch(url, e.to_string()))
}

#[cfg(target_os = "macos")]
fn platform_open(url: &str) -> Result<()> {
    rollcall_mac::open_url(url).map_err(|e| Error::dispatch(url, e.to_string()))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn platform_open(url: &str) -> Result<()> {
    Err(Error::dispatch(
        url,
        "no default opener on this platform; set dispatch.opener",
    ))
}

/// Writes links instead of opening them.
#[derive(Debug)]
pub struct PrintDispatcher<W: Write> {
    out: Mutex<W>,
}

impl PrintDispatcher<std::io::Stdout> {
    /// Print links to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> PrintDispatcher<W> {
    /// Print links to the given writer, one per line.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Take back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + std::fmt::Debug> Dispatcher for PrintDispatcher<W> {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn dispatch(&self, url: &str) -> Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{url}")?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps opened links in memory.
#[derive(Debug, Default)]
pub struct MemoryDispatcher {
    opened: Mutex<Vec<String>>,
}

impl MemoryDispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Links opened so far, oldest first.
    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of links opened so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Dispatcher for MemoryDispatcher {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn dispatch(&self, url: &str) -> Result<()> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        Ok(())
    }
}

/// Build the dispatcher described by the configuration.
///
/// `force_dry_run` comes from the command line and wins over the file.
///
/// # Errors
///
/// Returns an error if a configured opener command is invalid.
pub fn from_config(config: &DispatchConfig, force_dry_run: bool) -> Result<Box<dyn Dispatcher>> {
    if force_dry_run || config.dry_run {
        return Ok(Box::new(PrintDispatcher::stdout()));
    }
    match config.opener.as_deref() {
        Some(command_line) => Ok(Box::new(SystemDispatcher::with_opener(command_line)?)),
        None => Ok(Box::new(SystemDispatcher::new())),
    }
}

/// Compose a link for a phone number and dispatch it once.
///
/// Returns the link that was opened.
///
/// # Errors
///
/// Returns [`Error::EmptyField`] if the message is blank, or the dispatcher's
/// error if the link could not be opened.
pub fn send_to_phone(
    dispatcher: &dyn Dispatcher,
    composer: &LinkComposer,
    phone: &str,
    message: &str,
) -> Result<String> {
    if message.trim().is_empty() {
        return Err(Error::empty_field("message"));
    }
    let url = composer.compose(phone, message);
    debug!(dispatcher = dispatcher.name(), "Dispatching message link");
    dispatcher.dispatch(&url)?;
    Ok(url)
}

/// Send a message to a single contact.
///
/// # Errors
///
/// See [`send_to_phone`].
pub fn send_individual(
    dispatcher: &dyn Dispatcher,
    composer: &LinkComposer,
    record: &ContactRecord,
    message: &str,
) -> Result<String> {
    let url = send_to_phone(dispatcher, composer, &record.phone, message)?;
    info!(id = %record.id, "Opened message link");
    Ok(url)
}
