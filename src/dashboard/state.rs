use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::eth_rpc::units::{format_ether, format_gwei};

/// Message shown to the user whenever a fetch fails. Details go to the log.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch data. Check console for details.";

pub type SharedDashboard = Arc<RwLock<DashboardState>>;

/// Values returned by one successful round of RPC calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readings {
    pub balance_wei: u128,
    pub block_number: u64,
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price_wei: u128,
}

impl Readings {
    /// Balance in ether, three decimals.
    pub fn balance(&self) -> String {
        format_ether(self.balance_wei)
    }

    /// Gas price in gwei, three decimals.
    pub fn gas_price(&self) -> String {
        format_gwei(self.gas_price_wei)
    }
}

#[derive(Debug, Default)]
pub struct DashboardState {
    readings: Option<Readings>,
    error: Option<String>,
    update_count: u64,
    loading: bool,
    next_fetch_at: Option<Instant>,
    last_updated: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn shared() -> SharedDashboard {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn readings(&self) -> Option<&Readings> {
        self.readings.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.next_fetch_at = None;
    }

    pub fn record_success(&mut self, readings: Readings, at: DateTime<Utc>) {
        self.readings = Some(readings);
        self.error = None;
        self.update_count += 1;
        self.loading = false;
        self.last_updated = Some(at);
    }

    /// Keeps the last good readings on screen and flags the failure.
    pub fn record_failure(&mut self) {
        self.error = Some(FETCH_ERROR_MESSAGE.to_string());
        self.loading = false;
    }

    pub fn schedule_next(&mut self, at: Instant) {
        self.next_fetch_at = Some(at);
    }

    pub fn stop(&mut self) {
        self.loading = false;
        self.next_fetch_at = None;
    }

    pub fn snapshot(&self, now: Instant) -> DashboardSnapshot {
        let readings = self.readings.as_ref();
        DashboardSnapshot {
            balance: readings.map(Readings::balance),
            block_number: readings.map(|r| r.block_number.to_string()),
            chain_id: readings.map(|r| r.chain_id.to_string()),
            nonce: readings.map(|r| r.nonce.to_string()),
            gas_price: readings.map(Readings::gas_price),
            error: self.error.clone(),
            update_count: self.update_count,
            loading: self.loading,
            next_fetch_in_secs: self.next_fetch_at.map(|at| {
                let remaining = at.saturating_duration_since(now);
                let secs = remaining.as_secs();
                if remaining.subsec_nanos() > 0 {
                    secs + 1
                } else {
                    secs
                }
            }),
            last_updated: self.last_updated,
        }
    }
}

/// Point-in-time view of the dashboard, as served by the API and rendered by the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub balance: Option<String>,
    pub block_number: Option<String>,
    pub chain_id: Option<String>,
    pub nonce: Option<String>,
    pub gas_price: Option<String>,
    pub error: Option<String>,
    pub update_count: u64,
    pub loading: bool,
    pub next_fetch_in_secs: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn readings() -> Readings {
        Readings {
            balance_wei: 2_500_000_000_000_000_000,
            block_number: 19_000_000,
            chain_id: 1,
            nonce: 7,
            gas_price_wei: 30_123_456_789,
        }
    }

    #[test]
    fn fields_are_null_before_first_success() {
        let state = DashboardState::default();
        let snapshot = state.snapshot(Instant::now());

        assert_eq!(snapshot.balance, None);
        assert_eq!(snapshot.block_number, None);
        assert_eq!(snapshot.chain_id, None);
        assert_eq!(snapshot.nonce, None);
        assert_eq!(snapshot.gas_price, None);
        assert_eq!(snapshot.update_count, 0);
        assert!(!snapshot.loading);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["balance"].is_null());
        assert!(json["gas_price"].is_null());
    }

    #[test]
    fn success_formats_fields() {
        let mut state = DashboardState::default();
        state.begin_fetch();
        state.record_success(readings(), Utc::now());

        let snapshot = state.snapshot(Instant::now());
        assert_eq!(snapshot.balance.as_deref(), Some("2.500"));
        assert_eq!(snapshot.block_number.as_deref(), Some("19000000"));
        assert_eq!(snapshot.chain_id.as_deref(), Some("1"));
        assert_eq!(snapshot.nonce.as_deref(), Some("7"));
        assert_eq!(snapshot.gas_price.as_deref(), Some("30.123"));
        assert_eq!(snapshot.update_count, 1);
        assert!(!snapshot.loading);
        assert!(snapshot.last_updated.is_some());
    }

    #[test]
    fn failure_keeps_previous_readings() {
        let mut state = DashboardState::default();
        state.record_success(readings(), Utc::now());
        state.begin_fetch();
        state.record_failure();

        assert_eq!(state.readings(), Some(&readings()));
        assert_eq!(state.error(), Some(FETCH_ERROR_MESSAGE));
        assert_eq!(state.update_count(), 1);
        assert!(!state.is_loading());
    }

    #[test]
    fn success_after_failure_clears_error() {
        let mut state = DashboardState::default();
        state.record_failure();
        state.record_success(readings(), Utc::now());

        assert_eq!(state.error(), None);
    }

    #[test]
    fn countdown_rounds_up_to_whole_seconds() {
        let now = Instant::now();
        let mut state = DashboardState::default();

        state.schedule_next(now + Duration::from_millis(4_200));
        assert_eq!(state.snapshot(now).next_fetch_in_secs, Some(5));

        state.schedule_next(now + Duration::from_secs(7));
        assert_eq!(state.snapshot(now).next_fetch_in_secs, Some(7));

        assert_eq!(
            state.snapshot(now + Duration::from_secs(9)).next_fetch_in_secs,
            Some(0)
        );

        state.begin_fetch();
        assert_eq!(state.snapshot(now).next_fetch_in_secs, None);
    }
}
