// src/utils.rs
use crate::error::{DashboardError, DashboardResult};
use chrono::DateTime;
use ethers::types::{Address, U256};
use ethers::utils::parse_units;

pub const ETHER_DECIMALS: u8 = 18;

pub fn u256_to_human(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let divisor = U256::exp10(decimals as usize);
    let integer = value / divisor;
    let mut fraction = (value % divisor).to_string();
    let width = decimals as usize;
    while fraction.len() < width {
        fraction.insert(0, '0');
    }
    while fraction.ends_with('0') && !fraction.is_empty() {
        fraction.pop();
    }
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    }
}

pub fn format_ether(value: U256) -> String {
    u256_to_human(value, ETHER_DECIMALS)
}

/// Parses a decimal ether amount into wei. Empty, malformed and non-positive input is rejected.
pub fn parse_amount(input: &str) -> DashboardResult<U256> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DashboardError::invalid("amount is required"));
    }
    if input.starts_with('-') {
        return Err(DashboardError::invalid("amount must be greater than zero"));
    }

    let amount: U256 = parse_units(input, ETHER_DECIMALS as u32)
        .map_err(|_| DashboardError::invalid(format!("'{}' is not a valid amount", input)))?
        .into();

    if amount.is_zero() {
        return Err(DashboardError::invalid("amount must be greater than zero"));
    }
    Ok(amount)
}

pub fn parse_address(input: &str) -> DashboardResult<Address> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DashboardError::invalid("address is required"));
    }
    input
        .parse::<Address>()
        .map_err(|_| DashboardError::invalid(format!("'{}' is not a valid address", input)))
}

pub fn require_text<'a>(input: &'a str, field: &str) -> DashboardResult<&'a str> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DashboardError::invalid(format!("{} is required", field)));
    }
    Ok(input)
}

pub fn format_timestamp(seconds: U256) -> String {
    if seconds.is_zero() {
        return "never".to_string();
    }
    if seconds > U256::from(i64::MAX as u64) {
        return seconds.to_string();
    }
    DateTime::from_timestamp(seconds.as_u64() as i64, 0)
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| seconds.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_formatting_trims_trailing_zeros() {
        let one_and_half = U256::from(15u64) * U256::exp10(17);
        assert_eq!(format_ether(one_and_half), "1.5");
        assert_eq!(format_ether(U256::exp10(18)), "1");
        assert_eq!(format_ether(U256::zero()), "0");
        assert_eq!(format_ether(U256::one()), "0.000000000000000001");
        assert_eq!(u256_to_human(U256::from(42u64), 0), "42");
    }

    #[test]
    fn amounts_are_parsed_in_wei() {
        assert_eq!(parse_amount("1.5").unwrap(), U256::from(15u64) * U256::exp10(17));
        assert_eq!(parse_amount(" 2 ").unwrap(), U256::from(2u64) * U256::exp10(18));
    }

    #[test]
    fn empty_or_non_positive_amounts_are_rejected() {
        for input in ["", "   ", "0", "-1", "abc"] {
            let err = parse_amount(input).unwrap_err();
            assert!(matches!(err, DashboardError::Invalid(_)), "accepted {:?}", input);
        }
    }

    #[test]
    fn addresses_must_be_twenty_bytes() {
        assert!(parse_address("0x9C34c7d588C2db8f5f4626C5e8C6E51cffFDF9e1").is_ok());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn timestamps_render_as_utc() {
        assert_eq!(format_timestamp(U256::zero()), "never");
        assert_eq!(format_timestamp(U256::from(1_700_000_000u64)), "2023-11-14T22:13:20+00:00");
    }
}
