//! setu-node - Cyphal/CAN bus node daemon
//!
//! Publishes a 1 Hz heartbeat and dispatches subscribed sensor messages
//! received from the bus. Runs until externally terminated.

use std::env;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use setu_node::dispatch::HandlerTable;
use setu_node::messages::{
    Heartbeat, UltrasoundReading, HEARTBEAT_EXTENT, HEARTBEAT_SUBJECT, ULTRASOUND_EXTENT,
    ULTRASOUND_SUBJECT,
};
use setu_node::node::LocalNode;
use setu_node::protocol::rx::{SubscriptionTable, DEFAULT_TRANSFER_ID_TIMEOUT};
use setu_node::protocol::NodeId;
use setu_node::runtime::Runtime;
use setu_node::transport::SocketCanIo;
use setu_node::Result;

fn print_usage(program: &str) {
    eprintln!("Usage:   {} <iface-name> <node-id>", program);
    eprintln!("Example: {} vcan0 42", program);
}

/// Build the fixed subscription and dispatch tables.
fn build_tables() -> Result<(SubscriptionTable, HandlerTable)> {
    let mut subscriptions = SubscriptionTable::new();
    subscriptions.subscribe(
        HEARTBEAT_SUBJECT,
        HEARTBEAT_EXTENT,
        DEFAULT_TRANSFER_ID_TIMEOUT,
    )?;
    subscriptions.subscribe(
        ULTRASOUND_SUBJECT,
        ULTRASOUND_EXTENT,
        DEFAULT_TRANSFER_ID_TIMEOUT,
    )?;

    let mut handlers = HandlerTable::new();
    handlers.register(
        HEARTBEAT_SUBJECT,
        Box::new(|transfer| match transfer.source {
            Some(source) => match Heartbeat::decode(&transfer.payload) {
                Some(hb) => {
                    log::info!("Heartbeat from node {}: uptime={}s", source, hb.uptime_secs)
                }
                None => log::info!("Heartbeat from node {}", source),
            },
            None => log::info!("Heartbeat from anonymous node"),
        }),
    )?;
    handlers.register(
        ULTRASOUND_SUBJECT,
        Box::new(|transfer| match UltrasoundReading::decode(&transfer.payload) {
            Some(reading) => log::info!("Ultrasound range: {:.3} m", reading.range_m),
            None => log::warn!("Ultrasound payload too short, reading absent"),
        }),
    )?;

    Ok((subscriptions, handlers))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let node_id = match args[2].parse::<u16>().ok().and_then(|v| NodeId::try_from(v).ok()) {
        Some(id) => id,
        None => {
            eprintln!("Invalid node id: {}", args[2]);
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let io = match SocketCanIo::open(&args[1]) {
        Ok(io) => io,
        Err(e) => {
            eprintln!("Could not open the CAN interface {}: {}", args[1], e);
            process::exit(1);
        }
    };

    let (subscriptions, handlers) = match build_tables() {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Startup failed: {}", e);
            process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    }) {
        log::warn!("Could not set Ctrl-C handler: {}", e);
    }

    log::info!("setu-node starting on {} as node {}", args[1], node_id);

    let node = LocalNode::new(node_id);
    let mut runtime = Runtime::new(node, subscriptions, handlers, io, running);
    runtime.run();

    log::info!("setu-node stopped");
}
