use xxhash_rust::xxh3::xxh3_64;

/// Geocode cache entries live for about a year; addresses move rarely.
pub const GEOCODE_TTL_DAYS: i64 = 365;

/// Lowercase and collapse runs of whitespace, so trivially different
/// spellings of the same address share a cache entry.
pub fn normalize_address(address: &str) -> String {
    address
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cache key for a geocode lookup: xxh3 hex over the normalized address and
/// the country filter.
pub fn address_hash(address: &str, country: &str) -> String {
    let raw = format!("{}|{}", normalize_address(address), country.to_lowercase());
    format!("{:016x}", xxh3_64(raw.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_whitespace_and_case() {
        assert_eq!(
            normalize_address("  100  Main St,\tSpringfield "),
            "100 main st, springfield"
        );
    }

    #[test]
    fn hash_is_stable_across_spellings() {
        let a = address_hash("100 Main St, Springfield, IL", "us");
        let b = address_hash("100  main st,  springfield, il", "US");
        assert_eq!(a, b);
    }

    #[test]
    fn hash_distinguishes_country() {
        let a = address_hash("100 Main St", "us");
        let b = address_hash("100 Main St", "ca");
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_hex_16() {
        let hash = address_hash("200 Oak Ave, Springfield, IL", "us");
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
