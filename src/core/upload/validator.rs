//! Entry validator
//!
//! Classifies one candidate line as a valid IP/CIDR directive or an invalid
//! entry with a reason. Classification is pure and per-line: validating one
//! entry never depends on its neighbors, so batching order is free.

use std::net::IpAddr;

/// One parsed address directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpec {
    /// Untouched input text, used verbatim in reporting
    pub original: String,
    /// True when the line began with `!` (explicit deny)
    pub negated: bool,
    /// The IP literal with any `/prefix` removed; always a well-formed
    /// IPv4 or IPv6 address
    pub address: String,
    /// CIDR prefix length, present only when the line carried one;
    /// within 0-32 for IPv4 and 0-128 for IPv6
    pub prefix: Option<u8>,
}

/// Outcome of classifying one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Well-formed directive
    Valid(EntrySpec),
    /// Rejected line with the untouched original and a reason
    Invalid {
        /// Untouched input text
        original: String,
        /// Why the line was rejected
        reason: String,
    },
}

impl ValidationOutcome {
    /// The untouched input text, whichever way classification went
    pub fn original(&self) -> &str {
        match self {
            ValidationOutcome::Valid(spec) => &spec.original,
            ValidationOutcome::Invalid { original, .. } => original,
        }
    }
}

/// Classify one candidate line.
///
/// A leading `!` negates the entry; a `/` splits address from prefix text.
/// The address must be a syntactic IPv4/IPv6 literal (no DNS, no
/// reachability); the prefix, when present, a base-10 integer within the
/// address family's range.
pub fn validate_line(line: &str) -> ValidationOutcome {
    let (negated, working) = match line.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, line),
    };

    let (address, prefix_text) = match working.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (working, None),
    };

    let parsed: IpAddr = match address.parse() {
        Ok(ip) => ip,
        Err(_) => {
            return ValidationOutcome::Invalid {
                original: line.to_string(),
                reason: "malformed address".to_string(),
            };
        }
    };

    let prefix = match prefix_text {
        Some(text) => {
            let max: u8 = if parsed.is_ipv4() { 32 } else { 128 };
            match text.parse::<u8>() {
                Ok(value) if value <= max => Some(value),
                _ => {
                    return ValidationOutcome::Invalid {
                        original: line.to_string(),
                        reason: format!("invalid CIDR prefix (must be 0-{})", max),
                    };
                }
            }
        }
        None => None,
    };

    ValidationOutcome::Valid(EntrySpec {
        original: line.to_string(),
        negated,
        address: address.to_string(),
        prefix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_valid(line: &str) -> EntrySpec {
        match validate_line(line) {
            ValidationOutcome::Valid(spec) => spec,
            ValidationOutcome::Invalid { reason, .. } => {
                panic!("expected {:?} to be valid, got: {}", line, reason)
            }
        }
    }

    fn expect_invalid(line: &str) -> (String, String) {
        match validate_line(line) {
            ValidationOutcome::Invalid { original, reason } => (original, reason),
            ValidationOutcome::Valid(spec) => panic!("expected {:?} to be invalid: {:?}", line, spec),
        }
    }

    #[test]
    fn plain_literals_validate_unchanged() {
        for input in ["192.168.1.1", "10.0.0.0", "::1", "2001:db8::1", "fe80::1"] {
            let spec = expect_valid(input);
            assert_eq!(spec.address, input);
            assert_eq!(spec.original, input);
            assert!(!spec.negated);
            assert_eq!(spec.prefix, None);
        }
    }

    #[test]
    fn ipv4_cidr_splits_address_and_prefix() {
        let spec = expect_valid("10.0.0.0/24");
        assert_eq!(spec.address, "10.0.0.0");
        assert_eq!(spec.prefix, Some(24));
        assert_eq!(spec.original, "10.0.0.0/24");
    }

    #[test]
    fn ipv4_prefix_out_of_range() {
        let (original, reason) = expect_invalid("10.0.0.0/33");
        assert_eq!(original, "10.0.0.0/33");
        assert!(reason.contains("0-32"), "reason was: {}", reason);
    }

    #[test]
    fn ipv6_prefix_out_of_range() {
        let (original, reason) = expect_invalid("::1/129");
        assert_eq!(original, "::1/129");
        assert!(reason.contains("0-128"), "reason was: {}", reason);
    }

    #[test]
    fn ipv6_accepts_full_prefix_range() {
        assert_eq!(expect_valid("::1/128").prefix, Some(128));
        assert_eq!(expect_valid("2001:db8::/32").prefix, Some(32));
    }

    #[test]
    fn zero_prefix_is_allowed() {
        assert_eq!(expect_valid("0.0.0.0/0").prefix, Some(0));
    }

    #[test]
    fn negation_is_stripped_but_original_preserved() {
        let spec = expect_valid("!192.168.1.1");
        assert!(spec.negated);
        assert_eq!(spec.address, "192.168.1.1");
        assert_eq!(spec.original, "!192.168.1.1");
    }

    #[test]
    fn negated_cidr_combines_both_markers() {
        let spec = expect_valid("!10.0.0.0/8");
        assert!(spec.negated);
        assert_eq!(spec.address, "10.0.0.0");
        assert_eq!(spec.prefix, Some(8));
        assert_eq!(spec.original, "!10.0.0.0/8");
    }

    #[test]
    fn malformed_address_keeps_original() {
        let (original, reason) = expect_invalid("not-an-ip");
        assert_eq!(original, "not-an-ip");
        assert_eq!(reason, "malformed address");
    }

    #[test]
    fn malformed_negated_address_keeps_marker_in_original() {
        let (original, _) = expect_invalid("!garbage");
        assert_eq!(original, "!garbage");
    }

    #[test]
    fn bare_negation_is_malformed() {
        let (_, reason) = expect_invalid("!");
        assert_eq!(reason, "malformed address");
    }

    #[test]
    fn prefix_must_be_a_base_10_integer() {
        for input in ["10.0.0.0/", "10.0.0.0/abc", "10.0.0.0/2.5", "10.0.0.0/-1"] {
            let (original, reason) = expect_invalid(input);
            assert_eq!(original, input);
            assert!(reason.contains("invalid CIDR prefix"), "{}: {}", input, reason);
        }
    }

    #[test]
    fn missing_address_before_slash_is_malformed() {
        let (_, reason) = expect_invalid("/24");
        assert_eq!(reason, "malformed address");
    }

    #[test]
    fn only_first_slash_splits() {
        // "10.0.0.0/24/7" leaves "24/7" as prefix text, which fails to parse
        let (_, reason) = expect_invalid("10.0.0.0/24/7");
        assert!(reason.contains("invalid CIDR prefix"));
    }
}
