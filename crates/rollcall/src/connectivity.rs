//! Connectivity gate.
//!
//! The gate decides which surface the shell shows: the roster while online,
//! the offline diversion otherwise. Connectivity is an observed signal. A
//! [`ConnectivityMonitor`] polls a [`ConnectivityProbe`] on a background task
//! and publishes every change, so a disconnect or reconnect in the middle of
//! a session is picked up without restarting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

/// Network reachability as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// The messaging service is reachable.
    Online,
    /// The messaging service is not reachable.
    Offline,
}

impl Connectivity {
    /// Check whether this is [`Connectivity::Online`].
    #[must_use]
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }

    /// The surface the shell should show for this state.
    #[must_use]
    pub fn surface(self) -> Surface {
        match self {
            Self::Online => Surface::Roster,
            Self::Offline => Surface::Diversion,
        }
    }
}

impl From<bool> for Connectivity {
    fn from(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// What the shell presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Contact management and messaging.
    Roster,
    /// The offline guessing game.
    Diversion,
}

/// Anything that can report the current connectivity.
pub trait ConnectivitySource {
    /// Latest known connectivity.
    fn current(&self) -> Connectivity;
}

impl ConnectivitySource for Connectivity {
    fn current(&self) -> Connectivity {
        *self
    }
}

/// A check of network reachability.
#[async_trait::async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Name of this probe (for logging).
    fn name(&self) -> &'static str;

    /// Run one check.
    async fn probe(&self) -> Connectivity;
}

/// Probes by opening a TCP connection to a host and port.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Create a probe for `addr` (`host:port`).
    #[must_use]
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }

    /// The address being probed.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait::async_trait]
impl ConnectivityProbe for TcpProbe {
    fn name(&self) -> &'static str {
        "tcp"
    }

    async fn probe(&self) -> Connectivity {
        match tokio::time::timeout(self.timeout, tokio::net::TcpStream::connect(&self.addr)).await
        {
            Ok(Ok(_)) => {
                trace!(addr = %self.addr, "Probe connected");
                Connectivity::Online
            }
            Ok(Err(e)) => {
                debug!(addr = %self.addr, error = %e, "Probe failed");
                Connectivity::Offline
            }
            Err(_) => {
                debug!(addr = %self.addr, timeout = ?self.timeout, "Probe timed out");
                Connectivity::Offline
            }
        }
    }
}

/// A probe whose answer is set from outside.
///
/// Clones share the same state, so one clone can be handed to a monitor
/// while another flips it.
#[derive(Debug, Clone)]
pub struct StaticProbe {
    online: Arc<AtomicBool>,
}

impl StaticProbe {
    /// Create a probe reporting `initial`.
    #[must_use]
    pub fn new(initial: Connectivity) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(initial.is_online())),
        }
    }

    /// Change what the probe reports.
    pub fn set(&self, connectivity: Connectivity) {
        self.online
            .store(connectivity.is_online(), Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl ConnectivityProbe for StaticProbe {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn probe(&self) -> Connectivity {
        Connectivity::from(self.online.load(Ordering::SeqCst))
    }
}

/// Polls a probe and publishes changes.
#[derive(Debug)]
pub struct ConnectivityMonitor;

impl ConnectivityMonitor {
    /// Probe once, then keep polling on a background task.
    ///
    /// Must be called from within a tokio runtime. The task runs until the
    /// returned handle (and all its clones) are dropped or
    /// [`ConnectivityHandle::stop`] is called.
    pub async fn start<P>(probe: P, poll_interval: Duration) -> ConnectivityHandle
    where
        P: ConnectivityProbe + 'static,
    {
        let initial = probe.probe().await;
        info!(probe = probe.name(), state = %initial, "Connectivity monitor started");

        let (tx, rx) = watch::channel(initial);
        let stop_signal = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&stop_signal);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial probe covered it.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if stop.load(Ordering::SeqCst) || tx.is_closed() {
                    break;
                }

                let next = probe.probe().await;
                let changed = tx.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
                if changed {
                    info!(state = %next, "Connectivity changed");
                }
            }
            debug!("Connectivity monitor stopped");
        });

        ConnectivityHandle {
            rx,
            stop_signal,
        }
    }
}

/// A cloneable view of the monitored connectivity.
#[derive(Debug, Clone)]
pub struct ConnectivityHandle {
    rx: watch::Receiver<Connectivity>,
    stop_signal: Arc<AtomicBool>,
}

impl ConnectivityHandle {
    /// Wait for the next change and return the new state.
    ///
    /// Returns `None` once the monitor has stopped.
    pub async fn changed(&mut self) -> Option<Connectivity> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Signal the monitor task to stop after its current poll.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }
}

impl ConnectivitySource for ConnectivityHandle {
    fn current(&self) -> Connectivity {
        *self.rx.borrow()
    }
}
