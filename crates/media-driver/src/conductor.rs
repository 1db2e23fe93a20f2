//! Minimal reference conductor.
//!
//! The conductor's real bookkeeping — term-buffer allocation policy, client
//! IPC, subscription admission — is named as an external collaborator and is
//! not part of this driver. This module answers every `create_term_buffer`
//! request with a fixed-size buffer so the receive path can run end to end
//! without a full conductor implementation.

use media_core::{ConductorCommand, ConductorCommandInbox, NewReceiveBufferEvent, ReceiverProxy};

/// Poll interval for draining the receiver's `create_term_buffer` requests.
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(20);

/// Spawn the reference conductor as a background task.
///
/// For every `CreateTermBuffer` request observed on `inbox`, allocates a
/// zeroed buffer of `term_buffer_capacity` bytes and hands it back via
/// `receiver_proxy.new_receive_buffer`. Logs and drops the notification
/// (rather than retrying) when the receiver's buffer-ready queue is
/// momentarily full.
pub fn spawn_reference_conductor(
    inbox: ConductorCommandInbox,
    receiver_proxy: ReceiverProxy,
    term_buffer_capacity: usize,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            while let Some(command) = inbox.try_recv() {
                let ConductorCommand::CreateTermBuffer { session_id, channel_id, term_id, .. } =
                    command;

                let event = NewReceiveBufferEvent {
                    channel_id,
                    session_id,
                    term_id,
                    buffer: media_core::TermBuffer::new(term_id, term_buffer_capacity),
                };

                if !receiver_proxy.new_receive_buffer(event) {
                    tracing::warn!(
                        session_id,
                        channel_id,
                        term_id,
                        "receiver buffer-ready queue full, reference conductor dropping notification"
                    );
                }
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    })
}
