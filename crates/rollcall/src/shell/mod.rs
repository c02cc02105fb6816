//! Interactive roster shell.
//!
//! The shell is the operator's view of one session. While the connectivity
//! gate reports online it reads roster commands (see [`RosterCommand`]);
//! while offline it hides the roster and runs the guessing game instead.
//! The gate is checked before every prompt, so the surface follows the
//! network as it comes and goes. Roster and bulk state are kept across an
//! offline spell.

mod command;

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

pub use command::{ParseError, RosterCommand, HELP};

use crate::bulk::{BulkSession, CloseAction, DispatchOutcome};
use crate::config::{Config, GameConfig};
use crate::connectivity::{ConnectivitySource, Surface};
use crate::contact::{ContactRecord, RecordId};
use crate::dispatch::{send_individual, Dispatcher};
use crate::error::{Error, Result};
use crate::game::GuessingGame;
use crate::link::{phone_advisory, LinkComposer};
use crate::roster::Roster;

const ROSTER_PROMPT: &str = "rollcall> ";
const GAME_PROMPT: &str = "guess> ";

const GAME_HELP: &str = "\
Type a number to guess it.
  restart   pick a new number
  quit      leave";

/// Whether the read loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One interactive session.
#[derive(Debug)]
pub struct Shell<'a, C: ConnectivitySource> {
    roster: Roster,
    bulk: Option<BulkSession>,
    composer: LinkComposer,
    dispatcher: &'a dyn Dispatcher,
    connectivity: C,
    game_config: GameConfig,
    game: Option<GuessingGame>,
    sender_phone: String,
    surface: Option<Surface>,
}

impl<'a, C: ConnectivitySource> Shell<'a, C> {
    /// Create a shell with an empty roster.
    pub fn new(config: &Config, dispatcher: &'a dyn Dispatcher, connectivity: C) -> Self {
        Self {
            roster: Roster::new(),
            bulk: None,
            composer: config.link_composer(),
            dispatcher,
            connectivity,
            game_config: config.game.clone(),
            game: None,
            sender_phone: config.messaging.sender_phone.clone(),
            surface: None,
        }
    }

    /// The session's roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The bulk message in progress, if any.
    #[must_use]
    pub fn bulk(&self) -> Option<&BulkSession> {
        self.bulk.as_ref()
    }

    /// Read commands until `quit` or end of input.
    ///
    /// Command failures are reported on `out` and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self, mut input: impl BufRead, out: &mut dyn Write) -> Result<()> {
        let mut line = String::new();
        loop {
            let surface = self.sync_surface(out)?;
            let prompt = match surface {
                Surface::Roster => ROSTER_PROMPT,
                Surface::Diversion => GAME_PROMPT,
            };
            write!(out, "{prompt}")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }

            let flow = match surface {
                Surface::Roster => self.roster_line(line.trim(), out),
                Surface::Diversion => match self.game.as_mut() {
                    Some(game) => play_line(game, &line, out),
                    None => Err(Error::internal("offline surface without a game")),
                },
            };

            match flow {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    if e.is_input_error() {
                        debug!(error = %e, "Command rejected");
                    } else {
                        warn!(error = %e, "Command failed");
                    }
                    writeln!(out, "error: {e}")?;
                    if e.is_dispatch_error() {
                        writeln!(
                            out,
                            "hint: set [dispatch] opener in the config file, or start with --dry-run"
                        )?;
                    }
                }
            }
        }
        info!(contacts = self.roster.len(), "Shell session ended");
        Ok(())
    }

    /// Switch surface if connectivity changed since the last prompt.
    fn sync_surface(&mut self, out: &mut dyn Write) -> Result<Surface> {
        let connectivity = self.connectivity.current();
        let surface = connectivity.surface();
        if self.surface == Some(surface) {
            return Ok(surface);
        }

        info!(state = %connectivity, "Switching surface");
        match surface {
            Surface::Diversion => {
                let game = GuessingGame::new(self.game_config.clone());
                writeln!(
                    out,
                    "You are offline. Contacts are hidden until the connection returns."
                )?;
                writeln!(out, "{}", game.intro())?;
                writeln!(out, "{GAME_HELP}")?;
                self.game = Some(game);
            }
            Surface::Roster => {
                if self.surface.is_some() {
                    writeln!(out, "Back online.")?;
                }
                self.game = None;
                writeln!(
                    out,
                    "{} contacts, {} selected. Type 'help' for commands.",
                    self.roster.len(),
                    self.roster.selected_count()
                )?;
            }
        }
        self.surface = Some(surface);
        Ok(surface)
    }

    fn roster_line(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow> {
        let command = match RosterCommand::parse(line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "Roster command");

        match command {
            RosterCommand::Empty => {}
            RosterCommand::Help => writeln!(out, "{HELP}")?,
            RosterCommand::Quit => return Ok(Flow::Quit),
            RosterCommand::List => {
                let records: Vec<&ContactRecord> = self.roster.records().iter().collect();
                self.write_records(&records, out)?;
                writeln!(
                    out,
                    "{} of {} selected",
                    self.roster.selected_count(),
                    self.roster.len()
                )?;
            }
            RosterCommand::Find(query) => {
                let records = self.roster.find_by_name(&query);
                self.write_records(&records, out)?;
            }
            RosterCommand::Add { name, phone } => self.add(&name, &phone, out)?,
            RosterCommand::Remove(id) => match self.roster.remove(id) {
                Some(record) => writeln!(out, "Removed #{} {}", record.id, record.name)?,
                None => writeln!(out, "No contact with id {id}; nothing removed.")?,
            },
            RosterCommand::Select(id) => {
                let selected = self.roster.toggle(id)?;
                let verb = if selected { "Selected" } else { "Deselected" };
                writeln!(
                    out,
                    "{verb} #{id} ({} of {} selected)",
                    self.roster.selected_count(),
                    self.roster.len()
                )?;
            }
            RosterCommand::SelectAll => {
                self.roster.toggle_all();
                if self.roster.all_selected() {
                    writeln!(out, "Selected all {} contacts.", self.roster.len())?;
                } else {
                    writeln!(out, "Selection cleared.")?;
                }
            }
            RosterCommand::Clear => {
                self.roster.clear_selection();
                writeln!(out, "Selection cleared.")?;
            }
            RosterCommand::Send { id, message } => {
                let record = self
                    .roster
                    .get(id)
                    .ok_or(Error::UnknownRecord { id })?;
                send_individual(self.dispatcher, &self.composer, record, &message)?;
                writeln!(out, "Opened message to {}.", record.name)?;
            }
            RosterCommand::Link { phone, message } => {
                writeln!(out, "{}", self.composer.compose(&phone, &message))?;
            }
            RosterCommand::Bulk(message) => self.start_bulk(&message, out)?,
            RosterCommand::Mark(id) => self.dispatch_bulk(id, out)?,
            RosterCommand::Next => {
                let next = self
                    .bulk
                    .as_ref()
                    .ok_or(Error::NoBulkSession)?
                    .next_pending()
                    .map(|r| r.id);
                match next {
                    Some(id) => self.dispatch_bulk(id, out)?,
                    None => writeln!(out, "Everyone has been sent the message. Type 'close' to finish.")?,
                }
            }
            RosterCommand::Progress => {
                let session = self.bulk.as_ref().ok_or(Error::NoBulkSession)?;
                write_progress(session, out)?;
            }
            RosterCommand::Close => {
                let session = self.bulk.take().ok_or(Error::NoBulkSession)?;
                let sent = session.dispatched_count();
                let total = session.recipients().len();
                match session.close_action() {
                    CloseAction::Finish => {
                        writeln!(out, "Bulk message finished: all {total} sent.")?;
                    }
                    CloseAction::Close => {
                        writeln!(out, "Bulk message closed: {sent} of {total} sent.")?;
                    }
                }
            }
            RosterCommand::Sender(None) => {
                let phone = if self.sender_phone.trim().is_empty() {
                    "(not set)"
                } else {
                    self.sender_phone.as_str()
                };
                writeln!(out, "Sender phone: {phone}")?;
            }
            RosterCommand::Sender(Some(phone)) => self.set_sender(&phone, out)?,
            RosterCommand::Status => self.write_status(out)?,
        }
        Ok(Flow::Continue)
    }

    fn add(&mut self, name: &str, phone: &str, out: &mut dyn Write) -> Result<()> {
        let id = self.roster.add(name, phone)?;
        writeln!(out, "Added #{id} {}", name.trim())?;
        if let Some(advisory) = phone_advisory(phone) {
            warn!(%id, %advisory, "Phone number looks unusual");
            writeln!(out, "warning: {advisory}")?;
        }
        Ok(())
    }

    fn set_sender(&mut self, phone: &str, out: &mut dyn Write) -> Result<()> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(Error::empty_field("phone"));
        }
        self.sender_phone = phone.to_string();
        info!(sender = %phone, "Sender phone changed");
        writeln!(out, "Sender phone set to {phone}.")?;
        if let Some(advisory) = phone_advisory(phone) {
            writeln!(out, "warning: {advisory}")?;
        }
        Ok(())
    }

    fn start_bulk(&mut self, message: &str, out: &mut dyn Write) -> Result<()> {
        let session = self.roster.compose_bulk(message)?;
        if let Some(previous) = &self.bulk {
            if !previous.all_dispatched() {
                writeln!(
                    out,
                    "Replaced the unfinished bulk message ({} of {} sent).",
                    previous.dispatched_count(),
                    previous.recipients().len()
                )?;
            }
        }

        writeln!(
            out,
            "Bulk message ready for {} recipients.",
            session.recipients().len()
        )?;
        if !self.sender_phone.trim().is_empty() {
            writeln!(
                out,
                "Reminder: recipients need {} saved in their contacts to receive it.",
                self.sender_phone
            )?;
        }
        write_progress(&session, out)?;
        writeln!(out, "Use 'next' or 'mark <id>' to open each message.")?;
        self.bulk = Some(session);
        Ok(())
    }

    fn dispatch_bulk(&mut self, id: RecordId, out: &mut dyn Write) -> Result<()> {
        let session = self.bulk.as_mut().ok_or(Error::NoBulkSession)?;
        let outcome = session.dispatch(id, self.dispatcher, &self.composer)?;
        let name = session
            .recipient(id)
            .map_or_else(String::new, |r| r.name.clone());

        match outcome {
            DispatchOutcome::Opened { .. } => writeln!(
                out,
                "Opened message to {name} ({} of {} sent).",
                session.dispatched_count(),
                session.recipients().len()
            )?,
            DispatchOutcome::AlreadyDispatched => {
                writeln!(out, "Already sent to {name}.")?;
            }
        }
        if session.all_dispatched() {
            writeln!(out, "All messages opened. Type 'close' to finish.")?;
        }
        Ok(())
    }

    fn write_records(&self, records: &[&ContactRecord], out: &mut dyn Write) -> Result<()> {
        if records.is_empty() {
            writeln!(out, "No contacts.")?;
            return Ok(());
        }
        for record in records {
            let mark = if self.roster.is_selected(record.id) {
                "[x]"
            } else {
                "[ ]"
            };
            writeln!(out, "  {mark} #{}  {}  {}", record.id, record.name, record.phone)?;
        }
        Ok(())
    }

    fn write_status(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Connectivity:  {}", self.connectivity.current())?;
        writeln!(out, "Opener:        {}", self.dispatcher.name())?;
        writeln!(out, "Link base:     {}", self.composer.base_url())?;
        writeln!(out, "Sender phone:  {}", self.sender_phone)?;
        writeln!(out, "Contacts:      {}", self.roster.len())?;
        writeln!(out, "Selected:      {}", self.roster.selected_count())?;
        match &self.bulk {
            Some(session) => writeln!(
                out,
                "Bulk message:  {} of {} sent, {} pending",
                session.dispatched_count(),
                session.recipients().len(),
                session.pending().len()
            )?,
            None => writeln!(out, "Bulk message:  none")?,
        }
        Ok(())
    }
}

fn write_progress(session: &BulkSession, out: &mut dyn Write) -> Result<()> {
    for recipient in session.recipients() {
        let state = session
            .state(recipient.id)
            .map_or_else(String::new, |s| s.to_string());
        let sent_at = session
            .dispatched_at(recipient.id)
            .map(|at| format!("  (opened {} UTC)", at.format("%H:%M:%S")))
            .unwrap_or_default();
        writeln!(
            out,
            "  [{state:<7}] #{}  {}  {}{sent_at}",
            recipient.id, recipient.name, recipient.phone
        )?;
    }
    writeln!(
        out,
        "{} of {} sent",
        session.dispatched_count(),
        session.recipients().len()
    )?;
    Ok(())
}

/// Handle one line of game input.
fn play_line(game: &mut GuessingGame, line: &str, out: &mut dyn Write) -> Result<Flow> {
    let input = line.trim();
    match input.to_ascii_lowercase().as_str() {
        "" => {}
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        "help" | "?" => writeln!(out, "{GAME_HELP}")?,
        "restart" | "new" => {
            game.restart();
            writeln!(out, "{}", game.intro())?;
        }
        _ => {
            let outcome = game.guess(input);
            writeln!(out, "{outcome}")?;
            if outcome.ends_game() {
                writeln!(out, "Type 'restart' to play again.")?;
            }
        }
    }
    Ok(Flow::Continue)
}

/// Play the guessing game on its own until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run_game(config: GameConfig, mut input: impl BufRead, out: &mut dyn Write) -> Result<()> {
    let mut game = GuessingGame::new(config);
    writeln!(out, "{}", game.intro())?;
    writeln!(out, "{GAME_HELP}")?;

    let mut line = String::new();
    loop {
        write!(out, "{GAME_PROMPT}")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        if play_line(&mut game, &line, out)? == Flow::Quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::Connectivity;
    use crate::dispatch::MemoryDispatcher;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Reports queued states in order, then repeats the last one.
    #[derive(Debug)]
    struct Scripted {
        queue: RefCell<VecDeque<Connectivity>>,
        last: Cell<Connectivity>,
    }

    impl Scripted {
        fn new(states: &[Connectivity]) -> Self {
            Self {
                queue: RefCell::new(states.iter().copied().collect()),
                last: Cell::new(Connectivity::Online),
            }
        }
    }

    impl ConnectivitySource for Scripted {
        fn current(&self) -> Connectivity {
            if let Some(next) = self.queue.borrow_mut().pop_front() {
                self.last.set(next);
            }
            self.last.get()
        }
    }

    fn run_online<'a>(
        dispatcher: &'a MemoryDispatcher,
        script: &str,
    ) -> (String, Shell<'a, Connectivity>) {
        crate::logging::init_test_logging();
        let mut shell = Shell::new(&Config::default(), dispatcher, Connectivity::Online);
        let mut out = Vec::new();
        shell.run(Cursor::new(script.to_string()), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), shell)
    }

    #[test]
    fn test_add_and_list() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(
            &dispatcher,
            "add \"Ahmed Ali\" \"+964 770 123 4567\"\nadd Sara 9647709999999\nlist\n",
        );
        assert_eq!(shell.roster().len(), 2);
        assert!(out.contains("Added #1 Ahmed Ali"));
        assert!(out.contains("Added #2 Sara"));
        assert!(out.contains("[ ] #1  Ahmed Ali  +964 770 123 4567"));
        assert!(out.contains("0 of 2 selected"));
    }

    #[test]
    fn test_add_blank_name_reports_error() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(&dispatcher, "add \"  \" 964770\n");
        assert!(shell.roster().is_empty());
        assert!(out.contains("error: name must not be empty"));
    }

    #[test]
    fn test_add_warns_on_leading_zero() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(&dispatcher, "add Ahmed 07701234567\n");
        assert_eq!(shell.roster().len(), 1);
        assert!(out.contains("warning: phone number starts with 0"));
    }

    #[test]
    fn test_send_individual_opens_link() {
        let dispatcher = MemoryDispatcher::new();
        let (out, _) = run_online(
            &dispatcher,
            "add Ahmed \"+964 770 123 4567\"\nsend 1 Hello world\n",
        );
        assert_eq!(
            dispatcher.opened(),
            vec!["https://wa.me/9647701234567?text=Hello%20world".to_string()]
        );
        assert!(out.contains("Opened message to Ahmed."));
    }

    #[test]
    fn test_send_message_keeps_hash() {
        let dispatcher = MemoryDispatcher::new();
        let (out, _) = run_online(
            &dispatcher,
            "add Ahmed 9647701234567\nselect #1\nsend 1 Room #5\n",
        );
        assert!(out.contains("Selected #1"));
        assert_eq!(
            dispatcher.opened(),
            vec!["https://wa.me/9647701234567?text=Room%20%235".to_string()]
        );
    }

    #[test]
    fn test_bulk_message_keeps_hash() {
        let dispatcher = MemoryDispatcher::new();
        let (_, _) = run_online(
            &dispatcher,
            "add A 9641\nselect 1\nbulk Homework #3 is due Sunday\nnext\n",
        );
        assert_eq!(
            dispatcher.opened(),
            vec!["https://wa.me/9641?text=Homework%20%233%20is%20due%20Sunday".to_string()]
        );
    }

    #[test]
    fn test_sender_command() {
        let dispatcher = MemoryDispatcher::new();
        let (out, _) = run_online(
            &dispatcher,
            "sender\nsender 9647500001111\nsender\nadd A 9641\nselect 1\nbulk Hi\nstatus\n",
        );
        assert!(out.contains("Sender phone: 964\n"));
        assert!(out.contains("Sender phone set to 9647500001111."));
        assert!(out.contains("Sender phone: 9647500001111"));
        assert!(out.contains("Reminder: recipients need 9647500001111 saved"));
        assert!(out.contains("Sender phone:  9647500001111"));
    }

    #[test]
    fn test_sender_rejects_blank() {
        let dispatcher = MemoryDispatcher::new();
        let (out, _) = run_online(&dispatcher, "sender \"  \"\nsender\n");
        assert!(out.contains("error: phone must not be empty"));
        assert!(out.contains("Sender phone: 964\n"));
    }

    #[test]
    fn test_send_unknown_id() {
        let dispatcher = MemoryDispatcher::new();
        let (out, _) = run_online(&dispatcher, "send 7 Hi\n");
        assert_eq!(dispatcher.count(), 0);
        assert!(out.contains("error: no contact with id 7"));
    }

    #[test]
    fn test_link_prints_without_dispatch() {
        let dispatcher = MemoryDispatcher::new();
        let (out, _) = run_online(&dispatcher, "link \"+964 770 123 4567\" \"Hello world\"\n");
        assert_eq!(dispatcher.count(), 0);
        assert!(out.contains("https://wa.me/9647701234567?text=Hello%20world"));
    }

    #[test]
    fn test_remove_clears_selection() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(
            &dispatcher,
            "add A 9641\nadd B 9642\nselect 1\nremove 1\nremove 1\n",
        );
        assert_eq!(shell.roster().len(), 1);
        assert_eq!(shell.roster().selected_count(), 0);
        assert!(out.contains("Removed #1 A"));
        assert!(out.contains("No contact with id 1; nothing removed."));
    }

    #[test]
    fn test_select_all_toggles() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(
            &dispatcher,
            "add A 9641\nadd B 9642\nselect-all\nselect-all\n",
        );
        assert_eq!(shell.roster().selected_count(), 0);
        assert!(out.contains("Selected all 2 contacts."));
        assert!(out.contains("Selection cleared."));
    }

    #[test]
    fn test_bulk_requires_selection() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(&dispatcher, "add A 9641\nbulk Hello\n");
        assert!(shell.bulk().is_none());
        assert!(out.contains("error: no contacts selected"));
    }

    #[test]
    fn test_bulk_flow() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(
            &dispatcher,
            "add A 9641\nadd B 9642\nadd C 9643\nselect 1\nselect 3\n\
             bulk \"Exam on Sunday\"\nnext\nmark 1\nprogress\nnext\nnext\n",
        );
        assert!(out.contains("Bulk message ready for 2 recipients."));
        assert!(out.contains("Reminder: recipients need 964 saved"));
        assert!(out.contains("Opened message to A (1 of 2 sent)."));
        assert!(out.contains("Already sent to A."));
        assert!(out.contains("Opened message to C (2 of 2 sent)."));
        assert!(out.contains("All messages opened."));
        assert!(out.contains("Everyone has been sent the message."));
        assert_eq!(
            dispatcher.opened(),
            vec![
                "https://wa.me/9641?text=Exam%20on%20Sunday".to_string(),
                "https://wa.me/9643?text=Exam%20on%20Sunday".to_string(),
            ]
        );
        assert!(shell.bulk().unwrap().all_dispatched());
    }

    #[test]
    fn test_bulk_close_labels() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(
            &dispatcher,
            "add A 9641\nadd B 9642\nselect-all\nbulk Hi\nnext\nclose\n\
             bulk Again\nnext\nnext\nclose\nclose\n",
        );
        assert!(out.contains("Bulk message closed: 1 of 2 sent."));
        assert!(out.contains("Bulk message finished: all 2 sent."));
        assert!(out.contains("error: no bulk message in progress"));
        assert!(shell.bulk().is_none());
    }

    #[test]
    fn test_new_bulk_resets_progress() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(
            &dispatcher,
            "add A 9641\nadd B 9642\nselect-all\nbulk Hi\nnext\nbulk Bye\n",
        );
        assert!(out.contains("Replaced the unfinished bulk message (1 of 2 sent)."));
        let session = shell.bulk().unwrap();
        assert_eq!(session.message(), "Bye");
        assert_eq!(session.dispatched_count(), 0);
    }

    #[test]
    fn test_unknown_command_and_quit() {
        let dispatcher = MemoryDispatcher::new();
        let (out, shell) = run_online(&dispatcher, "bogus\nquit\nadd A 9641\n");
        assert!(out.contains("unknown command 'bogus'"));
        assert!(shell.roster().is_empty());
    }

    #[test]
    fn test_status() {
        let dispatcher = MemoryDispatcher::new();
        let (out, _) = run_online(&dispatcher, "add A 9641\nstatus\n");
        assert!(out.contains("Connectivity:  online"));
        assert!(out.contains("Opener:        memory"));
        assert!(out.contains("Contacts:      1"));
        assert!(out.contains("Bulk message:  none"));
    }

    #[derive(Debug)]
    struct FailingDispatcher;

    impl Dispatcher for FailingDispatcher {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn dispatch(&self, url: &str) -> Result<()> {
            Err(Error::dispatch(url, "no handler"))
        }
    }

    #[test]
    fn test_dispatch_failure_keeps_recipient_pending() {
        let dispatcher = FailingDispatcher;
        let mut shell = Shell::new(&Config::default(), &dispatcher, Connectivity::Online);
        let mut out = Vec::new();
        shell
            .run(
                Cursor::new("add A 9641\nselect 1\nbulk Hi\nnext\nstatus\n"),
                &mut out,
            )
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("error: failed to open https://wa.me/9641?text=Hi: no handler"));
        assert!(out.contains("hint: set [dispatch] opener"));
        assert!(out.contains("Bulk message:  0 of 1 sent, 1 pending"));
        assert_eq!(shell.bulk().unwrap().dispatched_count(), 0);
    }

    #[test]
    fn test_progress_shows_states() {
        let dispatcher = MemoryDispatcher::new();
        let (out, _) = run_online(
            &dispatcher,
            "add A 9641\nadd B 9642\nselect-all\nbulk Hi\nnext\nprogress\n",
        );
        assert!(out.contains("[sent   ] #1  A  9641  (opened "));
        assert!(out.contains("[pending] #2  B  9642\n"));
        assert!(out.contains("1 of 2 sent"));
    }

    #[test]
    fn test_offline_shows_game() {
        let dispatcher = MemoryDispatcher::new();
        let mut shell = Shell::new(&Config::default(), &dispatcher, Connectivity::Offline);
        let mut out = Vec::new();
        shell
            .run(Cursor::new("list\n0\nadd A 9641\n"), &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("You are offline."));
        assert!(out.contains("between 1 and 100"));
        assert!(out.contains("guess> "));
        assert!(!out.contains("rollcall> "));
        assert!(out.contains("Please enter a whole number between 1 and 100."));
        assert!(shell.roster().is_empty());
    }

    #[test]
    fn test_surface_follows_connectivity() {
        let dispatcher = MemoryDispatcher::new();
        let source = Scripted::new(&[
            Connectivity::Online,
            Connectivity::Offline,
            Connectivity::Offline,
            Connectivity::Online,
        ]);
        let mut shell = Shell::new(&Config::default(), &dispatcher, source);
        let mut out = Vec::new();
        shell
            .run(Cursor::new("add A 9641\nabc\nrestart\nlist\n"), &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("You are offline."));
        assert!(out.contains("Please enter a whole number"));
        assert!(out.contains("Back online."));
        assert!(out.contains("[ ] #1  A  9641"));
        assert_eq!(shell.roster().len(), 1);
    }

    #[test]
    fn test_game_quit() {
        let dispatcher = MemoryDispatcher::new();
        let mut shell = Shell::new(&Config::default(), &dispatcher, Connectivity::Offline);
        let mut out = Vec::new();
        shell.run(Cursor::new("quit\n50\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("attempts left"));
    }

    #[test]
    fn test_run_game_standalone() {
        let config = GameConfig {
            upper_bound: 1,
            max_guesses: 3,
        };
        let mut out = Vec::new();
        run_game(config, Cursor::new("1\n1\nrestart\n1\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("between 1 and 1"));
        assert_eq!(out.matches("Congratulations!").count(), 2);
        assert!(out.contains("The game is over."));
    }
}
