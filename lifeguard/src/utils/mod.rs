//! Utility functions for identifiers and timestamps.

pub mod timestamps;
mod uuid_utils;

pub use timestamps::{format_iso8601, parse_timestamp, Timestamp, TimestampError, UnixPrecision};
pub use uuid_utils::generate_uuid;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_is_valid() {
        let id = generate_uuid();
        assert_eq!(id.get_version_num(), 4);
    }
}
