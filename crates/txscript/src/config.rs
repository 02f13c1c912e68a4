//! Classification policy for standard script matching.

/// Controls how strictly the standard patterns are matched.
///
/// The standard policy matches on structure alone: any 33 or 65 byte push
/// counts as a public key. The strict policy also requires a valid SEC1
/// prefix on every key and a multisig threshold no larger than its key count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub strict: bool,
}

impl Config {
    pub fn standard() -> Self {
        Config { strict: false }
    }

    pub fn strict() -> Self {
        Config { strict: true }
    }

    /// Whether `key` is acceptable as a public key push.
    pub fn accepts_pubkey(&self, key: &[u8]) -> bool {
        match (key.len(), key.first()) {
            (33, Some(&prefix)) => !self.strict || matches!(prefix, 0x02 | 0x03),
            (65, Some(&prefix)) => !self.strict || matches!(prefix, 0x04 | 0x06 | 0x07),
            _ => false,
        }
    }

    /// Whether an `m`-of-`n` multisig threshold is acceptable.
    pub fn accepts_threshold(&self, m: usize, n: usize) -> bool {
        !self.strict || m <= n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard() {
        assert_eq!(Config::default(), Config::standard());
    }

    #[test]
    fn test_standard_accepts_any_prefix() {
        let config = Config::standard();
        assert!(config.accepts_pubkey(&[0xff; 33]));
        assert!(config.accepts_pubkey(&[0x00; 65]));
        assert!(!config.accepts_pubkey(&[0x02; 32]));
        assert!(!config.accepts_pubkey(&[]));
        assert!(config.accepts_threshold(3, 2));
    }

    #[test]
    fn test_strict_checks_prefix_and_threshold() {
        let config = Config::strict();
        let mut compressed = [0u8; 33];
        compressed[0] = 0x03;
        assert!(config.accepts_pubkey(&compressed));
        compressed[0] = 0x04;
        assert!(!config.accepts_pubkey(&compressed));

        let mut uncompressed = [0u8; 65];
        uncompressed[0] = 0x04;
        assert!(config.accepts_pubkey(&uncompressed));
        uncompressed[0] = 0x02;
        assert!(!config.accepts_pubkey(&uncompressed));

        assert!(config.accepts_threshold(2, 3));
        assert!(!config.accepts_threshold(3, 2));
    }
}
