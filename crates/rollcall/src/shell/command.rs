//! Shell command parsing.
//!
//! The command word, ids, names and phones are single words; a word with
//! spaces can be wrapped in `"` or `'`. A message is the raw rest of the line
//! after its leading arguments, so `#`, apostrophes and spacing reach the
//! link unchanged. A message wrapped entirely in one pair of quotes is
//! unquoted, and a literal `\n` inside a message becomes a line break.

use thiserror::Error;

use crate::contact::RecordId;

/// Errors from parsing a shell line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The first word is not a known command.
    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    /// Arguments are missing or malformed.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// An id argument is not a number.
    #[error("'{0}' is not a contact id")]
    BadId(String),

    /// Quotes are unbalanced.
    #[error("could not parse line: {0}")]
    Quoting(String),
}

/// Result type for shell parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// A command on the roster surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterCommand {
    /// Blank line.
    Empty,
    /// Show the command list.
    Help,
    /// Show all contacts.
    List,
    /// Show contacts whose name matches.
    Find(String),
    /// Add a contact.
    Add {
        /// Student name.
        name: String,
        /// Guardian phone.
        phone: String,
    },
    /// Remove a contact.
    Remove(RecordId),
    /// Toggle selection of a contact.
    Select(RecordId),
    /// Select all, or clear if all are selected.
    SelectAll,
    /// Clear the selection.
    Clear,
    /// Send a message to one contact.
    Send {
        /// Recipient.
        id: RecordId,
        /// Message text.
        message: String,
    },
    /// Print the link for a phone and message without opening it.
    Link {
        /// Phone as typed.
        phone: String,
        /// Message text.
        message: String,
    },
    /// Compose a bulk message for the selection.
    Bulk(String),
    /// Open the bulk link for one recipient.
    Mark(RecordId),
    /// Open the bulk link for the next pending recipient.
    Next,
    /// Show bulk progress.
    Progress,
    /// Close the bulk session.
    Close,
    /// Show or change the sender phone used in the bulk reminder.
    Sender(Option<String>),
    /// Show session status.
    Status,
    /// Leave the shell.
    Quit,
}

const ADD_USAGE: &str = "add <name> <phone>";
const REMOVE_USAGE: &str = "remove <id>";
const SELECT_USAGE: &str = "select <id>";
const SEND_USAGE: &str = "send <id> <message>";
const LINK_USAGE: &str = "link <phone> <message>";
const BULK_USAGE: &str = "bulk <message>";
const MARK_USAGE: &str = "mark <id>";
const FIND_USAGE: &str = "find <text>";
const SENDER_USAGE: &str = "sender [phone]";

/// Command summary printed by `help`.
pub const HELP: &str = "\
Contacts
  list                      show all contacts
  find <text>               show contacts whose name contains <text>
  add <name> <phone>        add a contact (quote names with spaces)
  remove <id>               remove a contact
Selection
  select <id>               select or deselect a contact
  select-all                select everyone, or clear if everyone is selected
  clear                     deselect everyone
Messages
  send <id> <message>       open a message to one contact
  link <phone> <message>    print a link without opening it
  bulk <message>            prepare a message for the selected contacts
  mark <id>                 open the bulk message for one recipient
  next                      open the bulk message for the next recipient
  progress                  show who has been sent the bulk message
  close                     close the bulk message
Other
  sender [phone]            show or change your own number
  status                    show connectivity and session summary
  help                      show this list
  quit                      leave
Use \\n inside a message for a line break.";

impl RosterCommand {
    /// Parse one input line.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing what was wrong with the line.
    pub fn parse(line: &str) -> Result<Self> {
        let Some((head, rest)) = take_word(line)? else {
            return Ok(Self::Empty);
        };

        match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Self::Help),
            "list" | "ls" => Ok(Self::List),
            "find" => Ok(Self::Find(message_text(rest, FIND_USAGE)?)),
            "add" => match words(rest)?.as_slice() {
                [name, phone] => Ok(Self::Add {
                    name: name.clone(),
                    phone: phone.clone(),
                }),
                _ => Err(ParseError::Usage(ADD_USAGE)),
            },
            "remove" | "rm" | "delete" => Ok(Self::Remove(single_id(rest, REMOVE_USAGE)?)),
            "select" | "toggle" => Ok(Self::Select(single_id(rest, SELECT_USAGE)?)),
            "select-all" | "all" => Ok(Self::SelectAll),
            "clear" | "deselect" => Ok(Self::Clear),
            "send" => {
                let (id, message) = take_word(rest)?.ok_or(ParseError::Usage(SEND_USAGE))?;
                Ok(Self::Send {
                    id: parse_id(&id)?,
                    message: message_text(message, SEND_USAGE)?,
                })
            }
            "link" => {
                let (phone, message) = take_word(rest)?.ok_or(ParseError::Usage(LINK_USAGE))?;
                Ok(Self::Link {
                    phone,
                    message: message_text(message, LINK_USAGE)?,
                })
            }
            "bulk" => Ok(Self::Bulk(message_text(rest, BULK_USAGE)?)),
            "mark" => Ok(Self::Mark(single_id(rest, MARK_USAGE)?)),
            "next" => Ok(Self::Next),
            "progress" => Ok(Self::Progress),
            "close" | "finish" => Ok(Self::Close),
            "sender" => match words(rest)?.as_slice() {
                [] => Ok(Self::Sender(None)),
                [phone] => Ok(Self::Sender(Some(phone.clone()))),
                _ => Err(ParseError::Usage(SENDER_USAGE)),
            },
            "status" => Ok(Self::Status),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

/// Split off the next word, honoring a leading `"` or `'`.
///
/// Returns `None` when only whitespace is left.
fn take_word(input: &str) -> Result<Option<(String, &str)>> {
    let input = input.trim_start();
    let Some(first) = input.chars().next() else {
        return Ok(None);
    };

    if first == '"' || first == '\'' {
        let body = &input[1..];
        let end = body
            .find(first)
            .ok_or_else(|| ParseError::Quoting(format!("missing closing {first}")))?;
        Ok(Some((body[..end].to_string(), &body[end + 1..])))
    } else {
        let end = input.find(char::is_whitespace).unwrap_or(input.len());
        Ok(Some((input[..end].to_string(), &input[end..])))
    }
}

fn words(mut input: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    while let Some((word, rest)) = take_word(input)? {
        out.push(word);
        input = rest;
    }
    Ok(out)
}

/// The rest of the line as message text.
fn message_text(rest: &str, usage: &'static str) -> Result<String> {
    let text = rest.trim();
    let text = unquote(text).unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ParseError::Usage(usage));
    }
    Ok(text.replace("\\n", "\n"))
}

/// Strip one pair of matching quotes around the whole text.
fn unquote(text: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        text.strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
            .filter(|inner| !inner.contains(quote))
    })
}

fn single_id(rest: &str, usage: &'static str) -> Result<RecordId> {
    match words(rest)?.as_slice() {
        [id] => parse_id(id),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn parse_id(word: &str) -> Result<RecordId> {
    word.trim_start_matches('#')
        .parse()
        .map_err(|_| ParseError::BadId(word.to_string()))
}
