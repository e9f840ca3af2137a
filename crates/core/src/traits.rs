//! Core traits for the message-passing boundary.

use crate::{Envelope, TransportError};
use tracing::trace;
use verdant_messages::{decode_message, encode_message, Tag, WireMessage};
use verdant_types::Rank;

/// A member of a fixed-size group of ranks exchanging tagged payloads.
///
/// This is the only thing the campaign needs from a message-passing runtime:
///
/// - **Fixed group**: `size()` and `rank()` never change after creation
/// - **Blocking**: `send` and both receives return only when done or failed
/// - **Matched receives**: a receive only consumes a payload matching its
///   (source, tag); anything else that arrives first is kept for later
///
/// The transport is assumed ready before the first send and alive until the
/// final receive. Startup and teardown belong to whoever creates it.
///
/// # Example
///
/// ```ignore
/// // Coordinator
/// for peer in 1..transport.size() as u32 {
///     transport.send(Rank(peer), Tag::CONFIG, bytes.clone())?;
/// }
///
/// // Worker
/// let bytes = transport.recv(Rank::COORDINATOR, Tag::CONFIG)?;
/// ```
pub trait Transport {
    /// Rank of this endpoint.
    fn rank(&self) -> Rank;

    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// Send `payload` to `to` under `tag`.
    ///
    /// # Errors
    ///
    /// [`TransportError::InvalidRank`] for a rank outside the group,
    /// [`TransportError::Disconnected`] if the receiver is gone.
    fn send(&mut self, to: Rank, tag: Tag, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Block until a payload tagged `tag` arrives from `from`.
    fn recv(&mut self, from: Rank, tag: Tag) -> Result<Vec<u8>, TransportError>;

    /// Block until a payload tagged `tag` arrives from any sender.
    ///
    /// Arrival order across senders is unspecified.
    ///
    /// # Errors
    ///
    /// [`TransportError::Disconnected`] once for each peer that goes away,
    /// after everything it sent has been received. A later call skips that
    /// peer. [`TransportError::GroupDisconnected`] when no peer is left.
    fn recv_any(&mut self, tag: Tag) -> Result<Envelope, TransportError>;
}

/// Typed send/receive on top of any [`Transport`].
///
/// Implemented for every transport; each message type travels under its own
/// [`WireMessage::TAG`].
pub trait MessageTransport: Transport {
    /// Encode and send a message.
    fn send_message<M: WireMessage>(&mut self, to: Rank, message: &M) -> Result<(), TransportError> {
        let payload = encode_message(message)?;
        trace!(
            from = %self.rank(),
            to = %to,
            message = M::type_name(),
            bytes = payload.len(),
            "send"
        );
        self.send(to, M::TAG, payload)
    }

    /// Receive and decode a message from a specific rank.
    fn recv_message<M: WireMessage>(&mut self, from: Rank) -> Result<M, TransportError> {
        let payload = self.recv(from, M::TAG)?;
        Ok(decode_message(&payload)?)
    }

    /// Receive and decode a message from whichever rank delivers first.
    fn recv_any_message<M: WireMessage>(&mut self) -> Result<(Rank, M), TransportError> {
        let envelope = self.recv_any(M::TAG)?;
        let message = decode_message(&envelope.payload)?;
        Ok((envelope.source, message))
    }
}

impl<T: Transport + ?Sized> MessageTransport for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use verdant_messages::{ConfigAnnouncement, ResultBatchMessage};
    use verdant_types::{ResultBatch, RunConfig, RunIndex, RunResult};

    /// A group of one that delivers everything to itself.
    #[derive(Default)]
    struct Loopback {
        queue: VecDeque<Envelope>,
    }

    impl Transport for Loopback {
        fn rank(&self) -> Rank {
            Rank::COORDINATOR
        }

        fn size(&self) -> usize {
            1
        }

        fn send(&mut self, to: Rank, tag: Tag, payload: Vec<u8>) -> Result<(), TransportError> {
            if to != Rank::COORDINATOR {
                return Err(TransportError::InvalidRank { rank: to, size: 1 });
            }
            self.queue.push_back(Envelope::new(self.rank(), tag, payload));
            Ok(())
        }

        fn recv(&mut self, from: Rank, tag: Tag) -> Result<Vec<u8>, TransportError> {
            let position = self
                .queue
                .iter()
                .position(|e| e.matches(Some(from), tag))
                .ok_or(TransportError::Disconnected { peer: from })?;
            Ok(self.queue.remove(position).map(|e| e.payload).unwrap_or_default())
        }

        fn recv_any(&mut self, tag: Tag) -> Result<Envelope, TransportError> {
            let position = self
                .queue
                .iter()
                .position(|e| e.matches(None, tag))
                .ok_or(TransportError::GroupDisconnected { tag })?;
            self.queue
                .remove(position)
                .ok_or(TransportError::GroupDisconnected { tag })
        }
    }

    #[test]
    fn test_typed_messages_use_their_tags() {
        let mut transport = Loopback::default();
        let mut batch = ResultBatch::new(Rank::COORDINATOR, RunIndex::FIRST);
        batch.push(RunResult::new(4, 9));

        transport
            .send_message(Rank::COORDINATOR, &ResultBatchMessage::new(batch.clone()))
            .unwrap();
        transport
            .send_message(
                Rank::COORDINATOR,
                &ConfigAnnouncement::new(RunConfig::new(3, 3, 0.1, 1, 1)),
            )
            .unwrap();

        // The config is received first even though it was sent second.
        let announcement: ConfigAnnouncement = transport.recv_message(Rank::COORDINATOR).unwrap();
        assert_eq!(announcement.config.width, 3);

        let (source, message): (Rank, ResultBatchMessage) = transport.recv_any_message().unwrap();
        assert_eq!(source, Rank::COORDINATOR);
        assert_eq!(message.batch, batch);
    }

    #[test]
    fn test_codec_errors_surface_as_transport_errors() {
        let mut transport = Loopback::default();
        transport
            .send(Rank::COORDINATOR, Tag::CONFIG, vec![0, 0])
            .unwrap();

        let result: Result<ConfigAnnouncement, _> = transport.recv_message(Rank::COORDINATOR);
        assert!(matches!(result, Err(TransportError::Codec(_))));
    }

    #[test]
    fn test_invalid_rank() {
        let mut transport = Loopback::default();
        let result = transport.send(Rank(4), Tag::CONFIG, vec![]);
        assert!(matches!(
            result,
            Err(TransportError::InvalidRank { size: 1, .. })
        ));
    }
}
