//! Streaming pump
//!
//! Turns the compose output channel into a lazy, finite stream of
//! [`PumpEvent`]s with a per-item timeout. The stream ends right after its
//! first terminal item, so every operation delivers exactly one of
//! `Complete`, a fatal line, `Closed`, or `TimedOut`.

use crate::message::Message;
use futures::{Stream, StreamExt};
use stackman_provider::OutputLine;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One item delivered to the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpEvent {
    Line(OutputLine),
    /// The producer hung up without a completion line
    Closed,
    /// Nothing arrived within the per-line timeout
    TimedOut { after: Duration },
}

impl PumpEvent {
    pub fn is_terminal(&self) -> bool {
        match self {
            PumpEvent::Line(line) => line.is_terminal(),
            PumpEvent::Closed | PumpEvent::TimedOut { .. } => true,
        }
    }
}

/// Read `rx` one item at a time, waiting at most `line_timeout` for each
pub fn output_stream(
    rx: mpsc::Receiver<OutputLine>,
    line_timeout: Duration,
) -> impl Stream<Item = PumpEvent> {
    futures::stream::unfold(Some(rx), move |state| async move {
        let Some(mut rx) = state else {
            return None;
        };
        let event = match tokio::time::timeout(line_timeout, rx.recv()).await {
            Ok(Some(line)) => PumpEvent::Line(line),
            Ok(None) => PumpEvent::Closed,
            Err(_) => PumpEvent::TimedOut {
                after: line_timeout,
            },
        };
        // Dropping the receiver after a terminal item tells the relay to stop forwarding
        let next = if event.is_terminal() { None } else { Some(rx) };
        Some((event, next))
    })
}

/// Forward a stream into the reducer's queue, tagged with its operation id
pub fn spawn_pump(
    rx: mpsc::Receiver<OutputLine>,
    line_timeout: Duration,
    stream_id: u64,
    tx: mpsc::UnboundedSender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = Box::pin(output_stream(rx, line_timeout));
        while let Some(event) = events.next().await {
            tracing::trace!("stream {} event: {:?}", stream_id, event);
            if tx.send(Message::Stream { stream_id, event }).is_err() {
                break;
            }
        }
        tracing::debug!("stream {} pump finished", stream_id);
    })
}
