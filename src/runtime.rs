//! The cooperative node runtime loop
//!
//! Every tick: publish the heartbeat if a second boundary passed, drain the
//! outbound queue, then poll the transport and dispatch completed transfers.
//! Single-threaded; the bounded receive is the only blocking point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::dispatch::HandlerTable;
use crate::heartbeat::HeartbeatClock;
use crate::messages::{Heartbeat, HEARTBEAT_SUBJECT};
use crate::node::LocalNode;
use crate::protocol::rx::SubscriptionTable;
use crate::protocol::Priority;
use crate::transport::FrameIo;

/// Bounded wait for inbound frames, as the loop's suspension point.
pub const DEFAULT_RX_TIMEOUT: Duration = Duration::from_millis(1000);

pub struct Runtime<T: FrameIo> {
    node: LocalNode,
    subscriptions: SubscriptionTable,
    handlers: HandlerTable,
    heartbeat: HeartbeatClock,
    io: T,
    running: Arc<AtomicBool>,
    rx_timeout: Duration,
    tx_failures: u64,
}

impl<T: FrameIo> Runtime<T> {
    pub fn new(
        node: LocalNode,
        subscriptions: SubscriptionTable,
        handlers: HandlerTable,
        io: T,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            node,
            subscriptions,
            handlers,
            heartbeat: HeartbeatClock::new(Instant::now()),
            io,
            running,
            rx_timeout: DEFAULT_RX_TIMEOUT,
            tx_failures: 0,
        }
    }

    /// Shorten the receive wait; tests use this to step without stalling.
    pub fn with_rx_timeout(mut self, timeout: Duration) -> Self {
        self.rx_timeout = timeout;
        self
    }

    pub fn node_mut(&mut self) -> &mut LocalNode {
        &mut self.node
    }

    /// Send attempts that failed and were dropped, best-effort.
    pub fn tx_failures(&self) -> u64 {
        self.tx_failures
    }

    /// Run until the stop flag clears. Never returns on its own otherwise.
    pub fn run(&mut self) {
        info!("Node {} running on the bus", self.node.id());
        while self.running.load(Ordering::Relaxed) {
            self.step(Instant::now());
        }
        info!("Node runtime stopped");
    }

    /// One full scheduler tick.
    pub fn step(&mut self, now: Instant) {
        if let Some(uptime_secs) = self.heartbeat.due(now) {
            let payload = Heartbeat { uptime_secs }.encode();
            self.node.publish(Priority::Nominal, HEARTBEAT_SUBJECT, &payload);
            debug!("Heartbeat queued: uptime={}s", uptime_secs);
        }
        self.drain_tx();
        self.poll_rx(now);
    }

    /// Move every queued outbound frame to the transport, FIFO. A failed
    /// send drops the frame and moves on; periodic traffic self-heals.
    fn drain_tx(&mut self) {
        while let Some(frame) = self.node.pop_frame() {
            if let Err(e) = self.io.send(&frame) {
                self.tx_failures += 1;
                debug!("Frame send failed, dropped: {}", e);
            }
        }
    }

    /// Receive until the transport reports no frame within the timeout,
    /// dispatching each completed transfer by subject.
    fn poll_rx(&mut self, now: Instant) {
        loop {
            match self.io.recv(self.rx_timeout) {
                Ok(Some(frame)) => {
                    if let Some(transfer) = self.subscriptions.accept(&frame, now) {
                        if !self.handlers.route(transfer) {
                            trace!("Transfer without handler discarded");
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    debug!("Frame receive failed: {}", e);
                    break;
                }
            }
        }
    }
}
