pub mod api;
pub mod config;
pub mod dashboard;
pub mod eth_rpc;
pub mod frontend;
pub mod metrics;

#[cfg(test)]
mod test_support;

pub use config::Settings;
pub use dashboard::{DashboardSnapshot, Poller, PollerHandle};
pub use eth_rpc::{Address, EthRpcClient, RpcError};
