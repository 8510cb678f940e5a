//! Conversions between JSON-RPC hex quantities and human readable amounts.

use thiserror::Error;

/// Decimals of one ether expressed in wei.
pub const ETHER_DECIMALS: u32 = 18;
/// Decimals of one gwei expressed in wei.
pub const GWEI_DECIMALS: u32 = 9;
/// Digits shown after the decimal point on the dashboard.
pub const DISPLAY_PRECISION: u32 = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("quantity {0:?} is missing the 0x prefix")]
    MissingPrefix(String),
    #[error("quantity {0:?} is not valid hex")]
    InvalidHex(String),
    #[error("quantity {0:?} does not fit in {1} bits")]
    Overflow(String, u32),
}

/// Parses a `0x`-prefixed hex quantity as returned by `eth_*` methods.
pub fn parse_quantity(raw: &str) -> Result<u128, UnitsError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| UnitsError::MissingPrefix(raw.to_string()))?;

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(UnitsError::InvalidHex(raw.to_string()));
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err(UnitsError::Overflow(raw.to_string(), 128));
    }

    u128::from_str_radix(significant, 16).map_err(|_| UnitsError::InvalidHex(raw.to_string()))
}

/// Same as [`parse_quantity`] for values that must fit a `u64` (block numbers, nonces, chain ids).
pub fn parse_quantity_u64(raw: &str) -> Result<u64, UnitsError> {
    let value = parse_quantity(raw)?;
    u64::try_from(value).map_err(|_| UnitsError::Overflow(raw.to_string(), 64))
}

/// Renders `value / 10^decimals` with exactly `precision` fractional digits,
/// rounding half up.
pub fn format_units(value: u128, decimals: u32, precision: u32) -> String {
    let (scaled, precision) = if precision >= decimals {
        (value, decimals)
    } else {
        let divisor = 10u128.pow(decimals - precision);
        let mut scaled = value / divisor;
        if (value % divisor) >= divisor - divisor / 2 {
            scaled += 1;
        }
        (scaled, precision)
    };

    if precision == 0 {
        return scaled.to_string();
    }

    let unit = 10u128.pow(precision);
    format!(
        "{}.{:0width$}",
        scaled / unit,
        scaled % unit,
        width = precision as usize
    )
}

pub fn format_ether(wei: u128) -> String {
    format_units(wei, ETHER_DECIMALS, DISPLAY_PRECISION)
}

pub fn format_gwei(wei: u128) -> String {
    format_units(wei, GWEI_DECIMALS, DISPLAY_PRECISION)
}
