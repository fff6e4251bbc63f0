//! Background scheduler for the clock trigger.
//!
//! Periodically reports every track ingested since the previous tick to one
//! fixed sink URL.

use std::sync::Arc;
use std::time::Duration;

use paragliding_core::webhooks::Dispatcher;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Starts the clock trigger. The first report happens one `period` after startup.
pub fn start_clock_trigger(
    dispatcher: Arc<Dispatcher>,
    sink_url: String,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Clock trigger started ({}s interval, sink {})",
            period.as_secs(),
            sink_url
        );

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_clock_tick(&dispatcher, &sink_url).await;
        }
    })
}

async fn run_clock_tick(dispatcher: &Dispatcher, sink_url: &str) {
    match dispatcher.clock_tick(sink_url).await {
        Ok(true) => debug!("Clock trigger delivered"),
        Ok(false) => debug!("Clock trigger had nothing to deliver"),
        Err(e) => warn!("Clock trigger failed: {}", e),
    }
}
