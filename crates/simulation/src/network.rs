//! In-process message passing between ranks.
//!
//! Every ordered pair of ranks gets its own unbounded channel, so a rank can
//! block on one specific peer, or select across all of them, and learn
//! exactly which peer went away when an endpoint is dropped.

use crossbeam::channel::{unbounded, Receiver, RecvError, Select, Sender};
use std::collections::VecDeque;
use tracing::trace;
use verdant_core::{Envelope, Tag, Transport, TransportError};
use verdant_types::Rank;

/// Factory for a fixed-size group of connected endpoints.
#[derive(Debug, Clone, Copy)]
pub struct LocalNetwork {
    size: usize,
}

impl LocalNetwork {
    /// Describe a group of `size` ranks.
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Create one endpoint per rank, indexed by rank.
    ///
    /// Each endpoint is meant to move to the thread acting as that rank.
    /// Dropping an endpoint disconnects it from every peer.
    pub fn connect(&self) -> Vec<LocalEndpoint> {
        let mut outboxes: Vec<Vec<Option<Sender<Envelope>>>> =
            (0..self.size).map(|_| vec![None; self.size]).collect();
        let mut inboxes: Vec<Vec<Option<Receiver<Envelope>>>> =
            (0..self.size).map(|_| vec![None; self.size]).collect();

        for from in 0..self.size {
            for to in 0..self.size {
                if from != to {
                    let (tx, rx) = unbounded();
                    outboxes[from][to] = Some(tx);
                    inboxes[to][from] = Some(rx);
                }
            }
        }

        outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outboxes, inboxes))| LocalEndpoint {
                rank: Rank(rank as u32),
                outboxes,
                inboxes,
                pending: VecDeque::new(),
            })
            .collect()
    }
}

/// One rank's view of a [`LocalNetwork`].
#[derive(Debug)]
pub struct LocalEndpoint {
    rank: Rank,
    /// Sender to each peer, `None` at our own rank.
    outboxes: Vec<Option<Sender<Envelope>>>,
    /// Receiver from each peer, `None` at our own rank or once the peer
    /// has disconnected.
    inboxes: Vec<Option<Receiver<Envelope>>>,
    /// Arrived payloads no receive has asked for yet, in arrival order.
    pending: VecDeque<Envelope>,
}

impl LocalEndpoint {
    fn check_rank(&self, rank: Rank) -> Result<(), TransportError> {
        if rank.index() >= self.outboxes.len() {
            return Err(TransportError::InvalidRank {
                rank,
                size: self.outboxes.len(),
            });
        }
        Ok(())
    }

    fn take_pending(&mut self, from: Option<Rank>, tag: Tag) -> Option<Envelope> {
        let position = self.pending.iter().position(|e| e.matches(from, tag))?;
        self.pending.remove(position)
    }

    /// Number of arrived payloads waiting for a matching receive.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Transport for LocalEndpoint {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.outboxes.len()
    }

    fn send(&mut self, to: Rank, tag: Tag, payload: Vec<u8>) -> Result<(), TransportError> {
        self.check_rank(to)?;
        let envelope = Envelope::new(self.rank, tag, payload);

        match &self.outboxes[to.index()] {
            // Sending to ourselves: deliver straight into the pending queue.
            None => {
                self.pending.push_back(envelope);
                Ok(())
            }
            Some(outbox) => {
                trace!(from = %self.rank, to = %to, tag = %tag, "deliver");
                outbox
                    .send(envelope)
                    .map_err(|_| TransportError::Disconnected { peer: to })
            }
        }
    }

    fn recv(&mut self, from: Rank, tag: Tag) -> Result<Vec<u8>, TransportError> {
        self.check_rank(from)?;
        loop {
            if let Some(envelope) = self.take_pending(Some(from), tag) {
                return Ok(envelope.payload);
            }

            let received = match &self.inboxes[from.index()] {
                Some(inbox) => inbox.recv(),
                None => return Err(TransportError::Disconnected { peer: from }),
            };

            match received {
                Ok(envelope) if envelope.tag == tag => return Ok(envelope.payload),
                Ok(envelope) => self.pending.push_back(envelope),
                Err(RecvError) => {
                    self.inboxes[from.index()] = None;
                    return Err(TransportError::Disconnected { peer: from });
                }
            }
        }
    }

    fn recv_any(&mut self, tag: Tag) -> Result<Envelope, TransportError> {
        loop {
            if let Some(envelope) = self.take_pending(None, tag) {
                return Ok(envelope);
            }

            let (peer, received) = {
                let live: Vec<(usize, &Receiver<Envelope>)> = self
                    .inboxes
                    .iter()
                    .enumerate()
                    .filter_map(|(peer, inbox)| inbox.as_ref().map(|inbox| (peer, inbox)))
                    .collect();
                if live.is_empty() {
                    return Err(TransportError::GroupDisconnected { tag });
                }

                let mut select = Select::new();
                for (_, inbox) in &live {
                    select.recv(inbox);
                }
                let operation = select.select();
                let (peer, inbox) = live[operation.index()];
                (peer, operation.recv(inbox))
            };

            match received {
                Ok(envelope) if envelope.tag == tag => return Ok(envelope),
                Ok(envelope) => self.pending.push_back(envelope),
                Err(RecvError) => {
                    trace!(rank = %self.rank, peer, "peer disconnected");
                    self.inboxes[peer] = None;
                    return Err(TransportError::Disconnected {
                        peer: Rank(peer as u32),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_connect_assigns_ranks() {
        let endpoints = LocalNetwork::new(3).connect();
        assert_eq!(endpoints.len(), 3);
        for (i, endpoint) in endpoints.iter().enumerate() {
            assert_eq!(endpoint.rank(), Rank(i as u32));
            assert_eq!(endpoint.size(), 3);
        }
    }

    #[test]
    fn test_point_to_point() {
        let mut endpoints = LocalNetwork::new(2).connect();
        let mut b = endpoints.pop().unwrap();
        let mut a = endpoints.pop().unwrap();

        a.send(Rank(1), Tag::CONFIG, vec![7]).unwrap();
        assert_eq!(b.recv(Rank(0), Tag::CONFIG).unwrap(), vec![7]);
    }

    #[test]
    fn test_mismatched_tag_is_buffered() {
        let mut endpoints = LocalNetwork::new(2).connect();
        let mut b = endpoints.pop().unwrap();
        let mut a = endpoints.pop().unwrap();

        a.send(Rank(1), Tag::RESULTS, vec![2]).unwrap();
        a.send(Rank(1), Tag::CONFIG, vec![1]).unwrap();

        assert_eq!(b.recv(Rank(0), Tag::CONFIG).unwrap(), vec![1]);
        assert_eq!(b.pending_len(), 1);
        assert_eq!(b.recv(Rank(0), Tag::RESULTS).unwrap(), vec![2]);
        assert_eq!(b.pending_len(), 0);
    }

    #[test]
    fn test_recv_filters_by_source() {
        let mut endpoints = LocalNetwork::new(3).connect();
        let mut c = endpoints.pop().unwrap();
        let mut b = endpoints.pop().unwrap();
        let mut a = endpoints.pop().unwrap();

        b.send(Rank(0), Tag::RESULTS, vec![1]).unwrap();
        c.send(Rank(0), Tag::RESULTS, vec![2]).unwrap();

        assert_eq!(a.recv(Rank(2), Tag::RESULTS).unwrap(), vec![2]);
        assert_eq!(a.recv(Rank(1), Tag::RESULTS).unwrap(), vec![1]);
    }

    #[test]
    fn test_recv_any_collects_from_every_peer() {
        let endpoints = LocalNetwork::new(5).connect();
        let mut endpoints = endpoints.into_iter();
        let mut coordinator = endpoints.next().unwrap();

        let sources = thread::scope(|scope| {
            for mut endpoint in endpoints {
                scope.spawn(move || {
                    let payload = vec![endpoint.rank().0 as u8];
                    endpoint.send(Rank(0), Tag::RESULTS, payload).unwrap();
                });
            }

            let mut sources: Vec<u32> = (1..5)
                .map(|_| {
                    let envelope = coordinator.recv_any(Tag::RESULTS).unwrap();
                    assert_eq!(envelope.payload, vec![envelope.source.0 as u8]);
                    envelope.source.0
                })
                .collect();
            sources.sort_unstable();
            sources
        });

        assert_eq!(sources, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_dropped_peer_disconnects() {
        let mut endpoints = LocalNetwork::new(3).connect();
        let c = endpoints.pop().unwrap();
        let mut b = endpoints.pop().unwrap();
        let mut a = endpoints.pop().unwrap();

        // Delivered before the drop, so still readable afterwards.
        b.send(Rank(0), Tag::RESULTS, vec![9]).unwrap();
        drop(b);
        drop(c);

        assert!(matches!(
            a.send(Rank(2), Tag::CONFIG, vec![]),
            Err(TransportError::Disconnected { peer: Rank(2) })
        ));
        assert!(matches!(
            a.recv(Rank(2), Tag::CONFIG),
            Err(TransportError::Disconnected { peer: Rank(2) })
        ));

        // Rank 2 may be reported before or after rank 1's payload, but
        // rank 1's payload comes before rank 1's own disconnect.
        let mut disconnected = Vec::new();
        let mut payloads = Vec::new();
        loop {
            match a.recv_any(Tag::RESULTS) {
                Ok(envelope) => {
                    assert!(!disconnected.contains(&envelope.source));
                    payloads.push((envelope.source, envelope.payload));
                }
                Err(TransportError::Disconnected { peer }) => disconnected.push(peer),
                Err(TransportError::GroupDisconnected { .. }) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(payloads, vec![(Rank(1), vec![9])]);
        disconnected.sort();
        assert_eq!(disconnected, vec![Rank(1), Rank(2)]);
    }

    #[test]
    fn test_recv_any_names_lost_peer() {
        let mut endpoints = LocalNetwork::new(3).connect();
        let c = endpoints.pop().unwrap();
        let _b = endpoints.pop().unwrap();
        let mut a = endpoints.pop().unwrap();

        drop(c);
        assert!(matches!(
            a.recv_any(Tag::RESULTS),
            Err(TransportError::Disconnected { peer: Rank(2) })
        ));
    }

    #[test]
    fn test_invalid_rank() {
        let mut endpoints = LocalNetwork::new(2).connect();
        let result = endpoints[0].send(Rank(2), Tag::CONFIG, vec![]);
        assert!(matches!(
            result,
            Err(TransportError::InvalidRank { size: 2, .. })
        ));
    }

    #[test]
    fn test_send_to_self() {
        let mut endpoints = LocalNetwork::new(1).connect();
        let endpoint = &mut endpoints[0];
        endpoint.send(Rank(0), Tag::RESULTS, vec![3]).unwrap();
        assert_eq!(endpoint.recv(Rank(0), Tag::RESULTS).unwrap(), vec![3]);
    }
}
