use chrono::Utc;
use std::time::Instant as StdInstant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

use super::interval::PollInterval;
use super::state::{DashboardState, Readings, SharedDashboard};
use crate::eth_rpc::{Address, EthRpcClient, RpcError};
use crate::metrics;

/// Periodically reads the watched account and chain head into the shared dashboard.
pub struct Poller {
    client: EthRpcClient,
    address: Address,
    interval: PollInterval,
    dashboard: SharedDashboard,
}

impl Poller {
    pub fn new(client: EthRpcClient, address: Address, interval: PollInterval) -> Self {
        info!(
            "Initializing poller for {} with interval {:?}..={:?}",
            address,
            interval.min(),
            interval.max()
        );

        Self {
            client,
            address,
            interval,
            dashboard: DashboardState::shared(),
        }
    }

    pub fn dashboard(&self) -> SharedDashboard {
        SharedDashboard::clone(&self.dashboard)
    }

    /// Issues the five queries one after the other; the first failure aborts the round.
    pub async fn fetch_readings(&self) -> Result<Readings, RpcError> {
        let balance_wei = self.client.get_balance(&self.address).await?;
        let block_number = self.client.get_block_number().await?;
        let chain_id = self.client.get_chain_id().await?;
        let nonce = self.client.get_transaction_count(&self.address).await?;
        let gas_price_wei = self.client.get_gas_price().await?;

        Ok(Readings {
            balance_wei,
            block_number,
            chain_id,
            nonce,
            gas_price_wei,
        })
    }

    /// Runs one fetch and publishes the outcome. Returns whether it succeeded.
    pub async fn refresh(&self) -> bool {
        self.dashboard.write().await.begin_fetch();

        let started = StdInstant::now();
        let result = self.fetch_readings().await;
        let elapsed = started.elapsed();

        let mut dashboard = self.dashboard.write().await;
        match result {
            Ok(readings) => {
                debug!(
                    "Fetched block {} on chain {} in {:?}",
                    readings.block_number, readings.chain_id, elapsed
                );
                metrics::record_fetch(elapsed, true);
                metrics::record_readings(&readings);
                dashboard.record_success(readings, Utc::now());
                info!("Dashboard updated (update #{})", dashboard.update_count());
                true
            }
            Err(e) => {
                error!("Failed to fetch data: {}", e);
                metrics::record_fetch(elapsed, false);
                dashboard.record_failure();
                false
            }
        }
    }

    /// Starts polling: one fetch right away, then one after each random delay.
    pub fn spawn(self) -> PollerHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        PollerHandle { shutdown, task }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("Starting poller against {}", self.client.url());

        loop {
            tokio::select! {
                _ = self.refresh() => {}
                _ = shutdown.changed() => break,
            }

            let delay = self.interval.next();
            self.dashboard
                .write()
                .await
                .schedule_next(Instant::now() + delay);
            debug!("Next data fetch in {:?}", delay);

            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        self.dashboard.write().await.stop();
        info!("Poller stopped");
    }
}

/// Owns the polling task. Dropping the handle also stops the task.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!("Poller task ended abnormally: {}", e);
        }
    }
}
