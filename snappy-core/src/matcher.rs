//! Lexical matchers for the identifier shapes snappy understands.
//!
//! Anything that is not a volume ID, an instance ID or an IPv4 address is
//! treated as an instance name, so there is no name matcher here.

use regex::Regex;
use std::sync::OnceLock;

// Compile regex patterns once at initialization
static VOLUME_ID_RE: OnceLock<Regex> = OnceLock::new();
static INSTANCE_ID_RE: OnceLock<Regex> = OnceLock::new();
static IPV4_RE: OnceLock<Regex> = OnceLock::new();

fn compile(pattern: &str) -> Regex {
    // Never-matching fallback keeps the matchers total
    Regex::new(pattern).unwrap_or_else(|_| Regex::new(r"a^").unwrap())
}

fn volume_id_regex() -> &'static Regex {
    VOLUME_ID_RE.get_or_init(|| compile(r"^vol-[0-9a-f]{17}$"))
}

fn instance_id_regex() -> &'static Regex {
    INSTANCE_ID_RE.get_or_init(|| compile(r"^i-[0-9a-f]{17}$"))
}

fn ipv4_regex() -> &'static Regex {
    IPV4_RE.get_or_init(|| {
        compile(r"^((25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$")
    })
}

/// True if `value` looks like an EBS volume ID (`vol-` + 17 hex digits).
pub fn is_volume_id(value: &str) -> bool {
    volume_id_regex().is_match(value)
}

/// True if `value` looks like an EC2 instance ID (`i-` + 17 hex digits).
pub fn is_instance_id(value: &str) -> bool {
    instance_id_regex().is_match(value)
}

/// True if `value` is a dotted-quad IPv4 address with every octet in 0-255
/// written without leading zeros.
pub fn is_ipv4(value: &str) -> bool {
    ipv4_regex().is_match(value)
}
