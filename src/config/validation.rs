use anyhow::{anyhow, Result};
use url::Url;

use crate::eth_rpc::Address;

pub fn validate_settings(settings: &crate::config::Settings) -> Result<()> {
    let url = Url::parse(&settings.rpc.url)
        .map_err(|e| anyhow!("Invalid RPC URL {}: {}", settings.rpc.url, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "RPC URL must use http or https, got {}",
            url.scheme()
        ));
    }

    settings
        .account
        .address
        .parse::<Address>()
        .map_err(|e| anyhow!("Invalid account address: {}", e))?;

    let poller = &settings.poller;
    if poller.min_interval_seconds == 0 {
        return Err(anyhow!("min_interval_seconds must be at least 1"));
    }
    if poller.max_interval_seconds < poller.min_interval_seconds {
        return Err(anyhow!(
            "max_interval_seconds ({}) must be greater than or equal to min_interval_seconds ({})",
            poller.max_interval_seconds,
            poller.min_interval_seconds
        ));
    }

    if settings.rpc.timeout_seconds == 0 {
        return Err(anyhow!("rpc.timeout_seconds must be at least 1"));
    }

    Ok(())
}
