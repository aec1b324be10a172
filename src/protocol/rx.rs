//! Subscription table and transfer reassembly
//!
//! One reassembly session per (subject, source node). Malformed, stale,
//! oversized, service-kind, and unknown-subject frames are all discarded
//! internally; only completed message transfers surface to the caller.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::format::{self, TailByte, TransferCrc, SOT_TOGGLE};
use super::frame::CanFrame;
use super::{NodeId, SubjectId, Transfer, TransferId};
use crate::error::{Error, Result};

/// Default staleness window for multi-frame reassembly sessions.
pub const DEFAULT_TRANSFER_ID_TIMEOUT: Duration = Duration::from_secs(2);

/// All subscriptions of the local node, fixed after startup.
#[derive(Debug, Default)]
pub struct SubscriptionTable {
    entries: HashMap<SubjectId, Subscription>,
}

#[derive(Debug)]
struct Subscription {
    /// Maximum accepted payload size; larger transfers are rejected here.
    extent: usize,
    /// Staleness window for multi-frame reassembly.
    transfer_id_timeout: Duration,
    sessions: HashMap<NodeId, Session>,
}

#[derive(Debug)]
struct Session {
    transfer_id: TransferId,
    next_toggle: bool,
    payload: Vec<u8>,
    crc: TransferCrc,
    updated_at: Instant,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription. At most one entry may exist per subject.
    pub fn subscribe(
        &mut self,
        subject: SubjectId,
        extent: usize,
        transfer_id_timeout: Duration,
    ) -> Result<()> {
        if self.entries.contains_key(&subject) {
            return Err(Error::DuplicateSubscription(subject.into_u16()));
        }
        self.entries.insert(
            subject,
            Subscription {
                extent,
                transfer_id_timeout,
                sessions: HashMap::new(),
            },
        );
        Ok(())
    }

    pub fn contains(&self, subject: SubjectId) -> bool {
        self.entries.contains_key(&subject)
    }

    /// Feed one raw frame into reassembly.
    ///
    /// Returns a completed transfer when this frame finishes one, `None`
    /// otherwise (accumulating, filtered, or discarded).
    pub fn accept(&mut self, frame: &CanFrame, now: Instant) -> Option<Transfer> {
        let header = format::parse_message_id(frame.id())?;
        let entry = self.entries.get_mut(&header.subject)?;

        let data = frame.data();
        let tail = TailByte::from(frame.tail()?);
        let chunk = &data[..data.len() - 1];

        if tail.sot() && tail.eot() {
            // Single-frame transfer, no session state involved.
            if tail.toggle() != SOT_TOGGLE || chunk.len() > entry.extent {
                return None;
            }
            return Some(Transfer {
                priority: header.priority,
                subject: header.subject,
                source: header.source,
                transfer_id: tail.transfer_id(),
                payload: chunk.to_vec(),
            });
        }

        // Multi-frame transfers require an identified source for session
        // tracking; anonymous senders are single-frame only.
        let source = header.source?;

        if tail.sot() {
            if tail.toggle() != SOT_TOGGLE {
                return None;
            }
            let mut crc = TransferCrc::default();
            crc.add_bytes(chunk);
            entry.sessions.insert(
                source,
                Session {
                    transfer_id: tail.transfer_id(),
                    next_toggle: !SOT_TOGGLE,
                    payload: chunk.to_vec(),
                    crc,
                    updated_at: now,
                },
            );
            return None;
        }

        let session = entry.sessions.get_mut(&source)?;
        let stale = now.duration_since(session.updated_at) > entry.transfer_id_timeout;
        let mismatched =
            session.transfer_id != tail.transfer_id() || session.next_toggle != tail.toggle();
        let oversized =
            session.payload.len() + chunk.len() > entry.extent + TransferCrc::LENGTH;
        if stale || mismatched || oversized {
            entry.sessions.remove(&source);
            return None;
        }

        session.payload.extend_from_slice(chunk);
        session.crc.add_bytes(chunk);
        session.next_toggle = !session.next_toggle;
        session.updated_at = now;

        if !tail.eot() {
            return None;
        }

        let session = entry.sessions.remove(&source)?;
        if session.crc.get() != TransferCrc::RESIDUE
            || session.payload.len() < TransferCrc::LENGTH
        {
            return None;
        }
        let mut payload = session.payload;
        payload.truncate(payload.len() - TransferCrc::LENGTH);
        if payload.len() > entry.extent {
            return None;
        }
        Some(Transfer {
            priority: header.priority,
            subject: header.subject,
            source: Some(source),
            transfer_id: session.transfer_id,
            payload,
        })
    }
}
