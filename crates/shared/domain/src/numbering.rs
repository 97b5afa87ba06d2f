//! Human-readable order and booking numbers.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::constants::{BOOKING_NUMBER_PREFIX, ORDER_NUMBER_PREFIX};

const RANDOM_SUFFIX_LEN: usize = 6;

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn generate(prefix: &str, now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(RANDOM_SUFFIX_LEN)
        .collect();
    format!("{}-{}-{}", prefix, to_base36(millis), suffix).to_uppercase()
}

/// `ORD-<base36 millis>-<random>`
pub fn order_number(now: DateTime<Utc>) -> String {
    generate(ORDER_NUMBER_PREFIX, now)
}

/// `BK-<base36 millis>-<random>`
pub fn booking_number(now: DateTime<Utc>) -> String {
    generate(BOOKING_NUMBER_PREFIX, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn numbers_are_prefixed_and_uppercase() {
        let now = Utc::now();
        let order = order_number(now);
        let booking = booking_number(now);

        assert!(order.starts_with("ORD-"));
        assert!(booking.starts_with("BK-"));
        assert_eq!(order, order.to_uppercase());
        assert_eq!(order.rsplit('-').next().map(str::len), Some(RANDOM_SUFFIX_LEN));
        assert_ne!(order_number(now), order_number(now));
    }
}
