//! Session manager.
//!
//! Owns the one piece of mutable state in the toolkit: the current
//! [`SessionMode`] and the pending write. Every start/stop call and every
//! discovery dispatch holds the state lock for its full duration, so a
//! stop issued while a tag is being written waits for the write, and a
//! discovery that arrives after a stop sees `Idle`.
//!
//! # State Diagram
//!
//! ```text
//!            start_read                    start_write
//!   Reading ◄──────────── Idle ───────────────────► Writing
//!      │                  ▲  ▲                        │
//!      │    stop_read     │  │  stop_write / one tag  │
//!      └──────────────────┘  └────────────────────────┘
//! ```
//!
//! Switching between reading and writing passes through `Idle`: reader
//! mode is released and acknowledged before it is claimed again.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use tagkit_core::{
    Error, Result, SessionMode, TagOperation, Technology, WriteIntent, WriteProgress,
    WriteResult, format_tag_id,
};
use tagkit_hardware::{NfcAdapter, NfcTag};
use tagkit_ndef::{encode_template, encode_text};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::events::{EventChannel, NfcEvent};
use crate::lifecycle;
use crate::snapshot::build_snapshot;

/// A write intent that passed validation and is ready for the next tag.
#[derive(Debug, Clone)]
enum PreparedWrite {
    Message {
        bytes: Bytes,
        records: usize,
        description: String,
    },
    Lifecycle(TagOperation),
}

impl PreparedWrite {
    /// Validate and encode an intent without touching hardware.
    fn prepare(intent: &WriteIntent) -> Result<Self> {
        let message = match intent {
            WriteIntent::Template(template) => encode_template(template)?,
            WriteIntent::Text(text) => encode_text(text)?,
            WriteIntent::Lifecycle(operation) => return Ok(Self::Lifecycle(*operation)),
        };

        Ok(Self::Message {
            bytes: message.to_bytes()?,
            records: message.len(),
            description: intent.describe(),
        })
    }

    fn describe(&self) -> String {
        match self {
            Self::Message { description, .. } => description.clone(),
            Self::Lifecycle(operation) => operation.to_string(),
        }
    }

    async fn execute<T: NfcTag>(&self, tag: &T) -> Result<String> {
        match self {
            Self::Message { bytes, records, .. } => {
                write_message(tag, bytes).await?;
                Ok(format!("Successfully wrote {records} record(s) to tag"))
            }
            Self::Lifecycle(operation) => lifecycle::run(*operation, tag).await,
        }
    }
}

/// Write an encoded message, formatting the tag first if it needs it.
async fn write_message<T: NfcTag>(tag: &T, bytes: &[u8]) -> Result<()> {
    let technologies = tag.technologies();

    if technologies.contains(&Technology::Ndef) {
        let capabilities = tag.ndef_capabilities().await?;
        if !capabilities.writable {
            return Err(Error::ReadOnly);
        }
        if bytes.len() > capabilities.max_size {
            return Err(Error::CapacityExceeded {
                required: bytes.len(),
                capacity: capabilities.max_size,
            });
        }
        tag.write_ndef(bytes).await?;
    } else if technologies.contains(&Technology::NdefFormatable) {
        tag.format_ndef(bytes).await?;
    } else {
        return Err(Error::NotNdef);
    }

    Ok(())
}

#[derive(Debug, Default)]
struct SessionState {
    mode: SessionMode,
    pending: Option<PreparedWrite>,
}

impl SessionState {
    fn transition(&mut self, target: SessionMode) -> Result<()> {
        if !self.mode.can_transition_to(target) {
            return Err(Error::SessionConflict {
                active: self.mode.to_string(),
            });
        }
        debug!(from = %self.mode, to = %target, "Session mode changed");
        self.mode = target;
        Ok(())
    }
}

/// Coordinates reader mode, pending writes and event publishing for one
/// platform adapter.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tagkit_core::SessionMode;
/// use tagkit_hardware::mock::MockNfcAdapter;
/// use tagkit_session::{EventChannel, SessionConfig, SessionManager};
///
/// #[tokio::main]
/// async fn main() -> tagkit_core::Result<()> {
///     let (adapter, _handle) = MockNfcAdapter::new();
///     let session = SessionManager::new(
///         Arc::new(adapter),
///         EventChannel::new(),
///         SessionConfig::default(),
///     );
///
///     session.start_read().await?;
///     assert_eq!(session.mode().await, SessionMode::Reading);
///
///     session.stop_read().await?;
///     assert_eq!(session.mode().await, SessionMode::Idle);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct SessionManager<A: NfcAdapter> {
    adapter: Arc<A>,
    events: EventChannel,
    state: Mutex<SessionState>,
    config: SessionConfig,
}

impl<A: NfcAdapter> SessionManager<A> {
    pub fn new(adapter: Arc<A>, events: EventChannel, config: SessionConfig) -> Self {
        Self {
            adapter,
            events,
            state: Mutex::new(SessionState::default()),
            config,
        }
    }

    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    pub fn events(&self) -> &EventChannel {
        &self.events
    }

    pub async fn mode(&self) -> SessionMode {
        self.state.lock().await.mode
    }

    /// Current mode without waiting; `None` while an operation holds the state.
    pub fn try_mode(&self) -> Option<SessionMode> {
        self.state.try_lock().ok().map(|state| state.mode)
    }

    /// Enter reading mode.
    ///
    /// An active write session is stopped first and its pending write
    /// discarded. Calling this while already reading does nothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Adapter` if the platform does not acknowledge the
    /// reader-mode change in time. The session is `Idle` afterwards.
    pub async fn start_read(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        match state.mode {
            SessionMode::Reading => {
                debug!("Read session already active");
                return Ok(());
            }
            SessionMode::Writing => {
                info!("Stopping write session to start reading");
                self.release(&mut state).await?;
            }
            SessionMode::Idle => {}
        }

        self.acknowledge("enable reader mode", self.adapter.enable_reader_mode())
            .await?;
        state.transition(SessionMode::Reading)?;
        info!("Read session started");
        Ok(())
    }

    /// Leave reading mode. Does nothing unless reading.
    pub async fn stop_read(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.mode != SessionMode::Reading {
            debug!(mode = %state.mode, "No read session to stop");
            return Ok(());
        }
        self.release(&mut state).await?;
        info!("Read session stopped");
        Ok(())
    }

    /// Arm a single-shot write for the next tag.
    ///
    /// The intent is validated and encoded before any hardware is touched.
    /// An active read session is stopped first; an active write session
    /// keeps running with its pending write replaced.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTemplate` or `InvalidFieldValue` for a bad intent,
    /// and `Error::Adapter` when reader mode cannot be changed.
    pub async fn start_write(&self, intent: WriteIntent) -> Result<()> {
        let prepared = PreparedWrite::prepare(&intent)?;
        let mut state = self.state.lock().await;

        match state.mode {
            SessionMode::Writing => {
                info!(intent = %prepared.describe(), "Pending write replaced");
                state.pending = Some(prepared);
                return Ok(());
            }
            SessionMode::Reading => {
                info!("Stopping read session to start writing");
                self.release(&mut state).await?;
            }
            SessionMode::Idle => {}
        }

        self.acknowledge("enable reader mode", self.adapter.enable_reader_mode())
            .await?;
        state.transition(SessionMode::Writing)?;
        info!(intent = %prepared.describe(), "Write session started");
        state.pending = Some(prepared);
        Ok(())
    }

    /// Leave writing mode, discarding the pending write. Does nothing
    /// unless writing.
    pub async fn stop_write(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.mode != SessionMode::Writing {
            debug!(mode = %state.mode, "No write session to stop");
            return Ok(());
        }
        self.release(&mut state).await?;
        info!("Write session stopped");
        Ok(())
    }

    pub async fn erase(&self) -> Result<()> {
        self.start_write(TagOperation::Erase.into()).await
    }

    pub async fn format(&self) -> Result<()> {
        self.start_write(TagOperation::Format.into()).await
    }

    pub async fn make_read_only(&self) -> Result<()> {
        self.start_write(TagOperation::MakeReadOnly.into()).await
    }

    /// Dispatch a tag the platform discovered.
    ///
    /// Reading publishes a snapshot. Writing runs the pending write, then
    /// returns to `Idle` whatever the outcome. Idle ignores the tag.
    pub async fn handle_discovery(&self, tag: &A::Tag) {
        let mut state = self.state.lock().await;

        match state.mode {
            SessionMode::Idle => {
                debug!("Tag discovered outside a session, ignoring");
            }
            SessionMode::Reading => match build_snapshot(tag).await {
                Ok(snapshot) => {
                    info!(
                        tag_id = snapshot.id.as_deref().unwrap_or("-"),
                        records = snapshot.payloads.len(),
                        "Tag discovered"
                    );
                    self.events.publish(NfcEvent::TagDiscovered(snapshot));
                }
                Err(e) => warn!(error = %e, "Dropping unreadable tag"),
            },
            SessionMode::Writing => {
                let Some(pending) = state.pending.take() else {
                    warn!("Write session had no pending write");
                    self.finish(&mut state).await;
                    return;
                };

                self.events
                    .publish(NfcEvent::WriteProgress(WriteProgress::Started));

                let tag_id = tag.id().map(|id| format_tag_id(&id));
                let result = match pending.execute(tag).await {
                    Ok(message) => {
                        info!(intent = %pending.describe(), tag_id = ?tag_id, "{message}");
                        WriteResult::success(message, tag_id)
                    }
                    Err(e) => {
                        warn!(intent = %pending.describe(), error = %e, "Tag operation failed");
                        WriteResult::failure(&e, tag_id)
                    }
                };

                self.events.publish(NfcEvent::WriteResult(result));
                self.events
                    .publish(NfcEvent::WriteProgress(WriteProgress::Finished));
                self.finish(&mut state).await;
            }
        }
    }

    /// Return to `Idle` and release reader mode.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if state.mode != SessionMode::Idle {
            self.finish(&mut state).await;
        }
        info!("Session manager shut down");
    }

    /// Release after a single-shot write; failures are only logged.
    async fn finish(&self, state: &mut SessionState) {
        if let Err(e) = self.release(state).await {
            warn!(error = %e, "Reader mode not released");
        }
    }

    /// Go to `Idle`, discard the pending write and disable reader mode.
    ///
    /// The state is `Idle` even when the platform fails to acknowledge.
    async fn release(&self, state: &mut SessionState) -> Result<()> {
        state.pending = None;
        state.transition(SessionMode::Idle)?;
        self.acknowledge("disable reader mode", self.adapter.disable_reader_mode())
            .await
    }

    async fn acknowledge<F>(&self, action: &str, change: F) -> Result<()>
    where
        F: Future<Output = tagkit_hardware::Result<()>>,
    {
        let timeout = self.config.ack_timeout();
        match tokio::time::timeout(timeout, change).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::Adapter(format!("{action} failed: {e}"))),
            Err(_) => Err(Error::Adapter(format!(
                "{action} not acknowledged within {}ms",
                timeout.as_millis()
            ))),
        }
    }
}
