//! Tracking tag generation.
//!
//! A tracking tag links a sent message to the response events it later
//! produces. Tags are random, so uniqueness is only probabilistic.

use rand::Rng;

/// Generates a long tracking tag: a random 64-bit value as uppercase hex.
///
/// Leading zeros are not padded, so the result is 1 to 16 characters.
pub fn generate_long_tag() -> String {
    format!("{:X}", rand::rng().random::<u64>())
}

/// Generates a short tracking tag: a random 32-bit value as uppercase hex.
///
/// Leading zeros are not padded, so the result is 1 to 8 characters.
pub fn generate_short_tag() -> String {
    format!("{:X}", rand::rng().random::<u32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_upper_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    }

    #[test]
    fn test_long_tag_format() {
        for _ in 0..1000 {
            let tag = generate_long_tag();
            assert!((1..=16).contains(&tag.len()), "{tag}");
            assert!(is_upper_hex(&tag), "{tag}");
        }
    }

    #[test]
    fn test_short_tag_format() {
        for _ in 0..1000 {
            let tag = generate_short_tag();
            assert!((1..=8).contains(&tag.len()), "{tag}");
            assert!(is_upper_hex(&tag), "{tag}");
        }
    }

    #[test]
    fn test_long_tags_rarely_collide() {
        let tags: HashSet<String> = (0..10_000).map(|_| generate_long_tag()).collect();
        assert_eq!(tags.len(), 10_000);
    }

    #[test]
    fn test_short_tags_rarely_collide() {
        // Birthday bound for 1000 draws from 2^32 is ~1e-4.
        let tags: HashSet<String> = (0..1000).map(|_| generate_short_tag()).collect();
        assert!(tags.len() >= 999);
    }
}
