//! Live detection ingestion.
//!
//! One inbound TCP stream of newline-delimited JSON messages feeds the
//! session's event list. The channel walks `Disconnected -> Connecting ->
//! Connected -> Disconnected` and stays down once it drops: reconnecting
//! is an explicit caller action, never automatic.
//!
//! Messages are handled to completion in arrival order by a single pump
//! task. Malformed payloads are logged and dropped without closing the
//! channel. Translated events land in the in-memory [`SessionFeed`];
//! whether they also go through the store's write path is the caller's
//! choice via [`IngestOptions::persist_live_events`].

mod message;

pub use message::{ChannelMessage, DetectionPayload};

use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, watch};
use tokio_stream::{wrappers::LinesStream, StreamExt};

use crate::entity_store::SecurityEvent;
use crate::error::Result;

#[cfg(test)]
use mockall::automock;

/// Where translated events go when live persistence is enabled.
#[cfg_attr(test, automock)]
pub trait EventSink: Send + Sync + 'static {
    fn record_event(&self, event: SecurityEvent) -> Result<SecurityEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
}

/// Session-local event list, most recent first. Live events land here
/// even when persistence is off, which makes the current session richer
/// than a reload until the caller opts into persisting them.
#[derive(Clone)]
pub struct SessionFeed {
    events: Arc<Mutex<Vec<SecurityEvent>>>,
}

impl SessionFeed {
    pub fn new() -> Self {
        SessionFeed {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Starts from already-listed events (newest first).
    pub fn with_backlog(events: Vec<SecurityEvent>) -> Self {
        SessionFeed {
            events: Arc::new(Mutex::new(events)),
        }
    }

    pub fn push_front(&self, event: SecurityEvent) {
        self.events.lock().unwrap().insert(0, event);
    }

    pub fn snapshot(&self) -> Vec<SecurityEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl Default for SessionFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// TCP endpoint of the detection stream.
    pub endpoint: String,
    /// Route live events through the store's write path as well as the
    /// session feed. Off by default: live events are session-only.
    pub persist_live_events: bool,
}

/// Handle to the live channel task.
pub struct LiveChannel {
    state_rx: watch::Receiver<ChannelState>,
    drop_tx: Option<oneshot::Sender<()>>,
}

impl LiveChannel {
    /// Starts connecting in the background and returns immediately; a
    /// failed connect is logged and settles the state at `Disconnected`
    /// rather than surfacing to this caller.
    pub fn connect<S>(options: IngestOptions, feed: SessionFeed, sink: S) -> Self
    where
        S: EventSink,
    {
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
        let (drop_tx, mut drop_rx) = oneshot::channel();

        tokio::spawn(async move {
            let connect = tokio::select! {
                res = TcpStream::connect(&options.endpoint) => Some(res),
                _ = &mut drop_rx => None,
            };

            match connect {
                Some(Ok(stream)) => {
                    info!("Connected to detection stream at {}", options.endpoint);
                    let _ = state_tx.send(ChannelState::Connected);
                    pump(
                        stream,
                        &feed,
                        &sink,
                        options.persist_live_events,
                        &mut drop_rx,
                    )
                    .await;
                }
                Some(Err(e)) => {
                    error!(
                        "Live channel unavailable at {}: {}",
                        options.endpoint, e
                    );
                }
                None => {
                    info!("Live channel closed while connecting");
                }
            }

            let _ = state_tx.send(ChannelState::Disconnected);
            info!("Live channel stopped");
        });

        LiveChannel {
            state_rx,
            drop_tx: Some(drop_tx),
        }
    }

    pub fn state(&self) -> ChannelState {
        *self.state_rx.borrow()
    }

    /// Watch handle for observing state transitions.
    pub fn state_changes(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }

    /// Tears the channel down. Safe to call more than once.
    pub fn close(&mut self) {
        self.drop_tx.take();
    }
}

async fn pump<R, S>(
    reader: R,
    feed: &SessionFeed,
    sink: &S,
    persist: bool,
    drop_rx: &mut oneshot::Receiver<()>,
) where
    R: AsyncRead + Unpin,
    S: EventSink,
{
    let mut lines = LinesStream::new(BufReader::new(reader).lines());
    loop {
        tokio::select! {
            line = lines.next() => match line {
                Some(Ok(line)) => handle_frame(&line, feed, sink, persist),
                Some(Err(e)) => {
                    warn!("Detection stream read failed: {}", e);
                    break;
                }
                None => {
                    info!("Detection stream closed by peer");
                    break;
                }
            },
            _ = &mut *drop_rx => {
                info!("Live channel task is stopping");
                break;
            }
        }
    }
}

// Runs to completion before the next frame is read, so applied order
// matches arrival order.
fn handle_frame<S: EventSink>(line: &str, feed: &SessionFeed, sink: &S, persist: bool) {
    if line.trim().is_empty() {
        return;
    }

    let message: ChannelMessage = match serde_json::from_str(line) {
        Ok(message) => message,
        Err(e) => {
            warn!("Dropping malformed channel payload: {}", e);
            return;
        }
    };

    let ChannelMessage::Detection(payload) = message else {
        return;
    };

    let event = payload.into_event(Utc::now());
    let event = if persist {
        match sink.record_event(event.clone()) {
            Ok(stored) => stored,
            Err(e) => {
                // The session keeps the event even when the store cannot.
                error!("Failed to persist live event {}: {}", event.id, e);
                event
            }
        }
    } else {
        event
    };

    info!("Live event {} on {}", event.id, event.camera_name);
    feed.push_front(event);
}
