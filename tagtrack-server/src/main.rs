use clap::Parser;
use miette::{miette, IntoDiagnostic};
use std::time::Duration;
use tokio_graceful_shutdown::{SubsystemBuilder, SubsystemHandle, Toplevel};

use tagtrack_core::DeviceRegistry;
use tagtrack_server::config::{Cli, QueryWith};
use tagtrack_server::polling::PollingLoop;
use tagtrack_server::publisher::HttpPositionPublisher;
use tagtrack_server::store::{FileLocationStore, JqLocationStore, LocationStore};
use tagtrack_server::tracker::Tracker;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let registry = cli.registry().into_diagnostic()?;
    let path = cli
        .store_path()
        .ok_or_else(|| miette!("No home directory found, use --store to name the location cache"))?;
    let publisher = HttpPositionPublisher::new(cli.sink.clone()).into_diagnostic()?;

    log::info!(
        "Reading {} with {:?}, publishing to {}",
        path.display(),
        cli.query_with,
        cli.sink
    );
    for device in registry.iter() {
        log::debug!("{}: node {}", device.name, device.node_id);
    }

    match cli.query_with {
        QueryWith::Jq => {
            let store = JqLocationStore::with_program(&cli.jq, path);
            track(registry, store, publisher, cli.interval()).await
        }
        QueryWith::File => {
            let store = FileLocationStore::new(path);
            track(registry, store, publisher, cli.interval()).await
        }
    }
}

async fn track<S>(
    registry: DeviceRegistry,
    store: S,
    publisher: HttpPositionPublisher,
    interval: Duration,
) -> miette::Result<()>
where
    S: LocationStore + 'static,
{
    let polling = PollingLoop::new(Tracker::new(registry, store, publisher), interval);

    Toplevel::new(move |s: SubsystemHandle| async move {
        s.start(SubsystemBuilder::new("poller", move |h| polling.run(h)));
    })
    .catch_signals()
    .handle_shutdown_requests(Duration::from_millis(1000))
    .await
    .map_err(Into::into)
}
