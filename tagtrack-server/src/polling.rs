use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tokio_graceful_shutdown::SubsystemHandle;

use crate::error::TrackerError;
use crate::publisher::PositionSink;
use crate::store::LocationStore;
use crate::tracker::{PublishOutcome, Tracker};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What happened to each device during one polling pass
#[derive(Debug, Default)]
pub struct CycleReport {
    pub published: Vec<String>,
    pub skipped: Vec<String>,
    pub refresh_failures: Vec<(String, TrackerError)>,
    pub publish_failures: Vec<(String, TrackerError)>,
}

impl CycleReport {
    pub fn is_clean(&self) -> bool {
        self.refresh_failures.is_empty() && self.publish_failures.is_empty()
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} published, {} skipped, {} refresh failures, {} publish failures",
            self.published.len(),
            self.skipped.len(),
            self.refresh_failures.len(),
            self.publish_failures.len()
        )
    }
}

/// Drives a [`Tracker`]: every interval, refresh and then publish each device
/// in registry order.
///
/// Devices are handled one after the other and a full pass always completes
/// before the loop sleeps. A failing device is logged and the pass moves on.
pub struct PollingLoop<S, P> {
    tracker: Tracker<S, P>,
    interval: Duration,
}

impl<S: LocationStore, P: PositionSink> PollingLoop<S, P> {
    pub fn new(tracker: Tracker<S, P>, interval: Duration) -> Self {
        PollingLoop { tracker, interval }
    }

    pub fn tracker(&self) -> &Tracker<S, P> {
        &self.tracker
    }

    /// One pass over all devices
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        let names: Vec<String> = self.tracker.registry().names().map(String::from).collect();

        for name in names {
            // On failure the previous fix, if any, is still published below
            if let Err(e) = self.tracker.refresh(&name).await {
                log::error!("{}: {}", name, e);
                report.refresh_failures.push((name.clone(), e));
            }

            match self.tracker.publish(&name).await {
                Ok(PublishOutcome::Published(_)) => report.published.push(name),
                Ok(PublishOutcome::Skipped) => report.skipped.push(name),
                Err(e) => {
                    log::error!("{}: {}", name, e);
                    report.publish_failures.push((name, e));
                }
            }
        }

        report
    }

    async fn poll_loop(&mut self, subsys: &SubsystemHandle) -> Result<(), TrackerError> {
        loop {
            let report = self.run_cycle().await;
            log::debug!("Polling pass done: {}", report);

            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    log::debug!("Polling loop shutdown");
                    return Err(TrackerError::Shutdown);
                },
                _ = sleep(self.interval) => {}
            }
        }
    }

    pub async fn run(mut self, subsys: SubsystemHandle) -> Result<(), TrackerError> {
        log::info!(
            "Tracking {} devices every {:?}",
            self.tracker.registry().len(),
            self.interval
        );

        match self.poll_loop(&subsys).await {
            Err(TrackerError::Shutdown) => Ok(()),
            r => r,
        }
    }
}
