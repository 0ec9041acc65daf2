//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of `/proc` files into
//! structured data. They are designed to be easily testable with string inputs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Field key to value, as parsed from `/proc/net/sockstat`.
///
/// Optional fields missing from the input are absent, never zero-filled.
pub type SockStatFields = BTreeMap<String, f64>;

/// Group holding the total socket count; matched but not reported.
const SOCKETS_USED: &str = "sockets_used";

static SOCKSTAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"sockets: used (?P<sockets_used>\d+)\n",
        r"TCP: inuse (?P<tcp_inuse>\d+) orphan (?P<orphans>\d+)",
        r" tw (?P<tw_count>\d+) alloc (?P<tcp_sockets>\d+)",
        r" mem (?P<tcp_pages>\d+)\n",
        r"UDP: inuse (?P<udp_inuse>\d+)",
        // UDP memory accounting appeared in 2.6.25.
        r"(?: mem (?P<udp_pages>\d+))?\n",
        // UDP-Lite (RFC 3828) appeared in 2.6.20.
        r"(?:UDPLITE: inuse (?P<udplite_inuse>\d+)\n)?",
        r"RAW: inuse (?P<raw_inuse>\d+)\n",
        r"FRAG: inuse (?P<ip_frag_nqueues>\d+) memory (?P<ip_frag_mem>\d+)\n?",
    ))
    .expect("invalid sockstat pattern")
});

/// Parses `/proc/net/sockstat` content.
///
/// The whole block is matched by one structural pattern, so the input must be
/// complete. Format (kernel 2.6.25+):
///
/// ```text
/// sockets: used 229
/// TCP: inuse 4 orphan 0 tw 4 alloc 17 mem 1
/// UDP: inuse 0 mem 0
/// UDPLITE: inuse 0
/// RAW: inuse 0
/// FRAG: inuse 0 memory 0
/// ```
pub fn parse_sockstat(content: &str) -> Result<SockStatFields, ParseError> {
    let caps = SOCKSTAT_RE
        .captures(content)
        .ok_or_else(|| ParseError::new("sockstat content does not match expected structure"))?;

    let mut fields = SockStatFields::new();
    for name in SOCKSTAT_RE.capture_names().flatten() {
        if name == SOCKETS_USED {
            continue;
        }
        let Some(m) = caps.name(name) else {
            continue;
        };
        let value: u64 = m
            .as_str()
            .parse()
            .map_err(|e| ParseError::new(format!("invalid {} '{}': {}", name, m.as_str(), e)))?;
        fields.insert(name.to_string(), value as f64);
    }

    Ok(fields)
}

/// Parses raw `/proc/net/sockstat` bytes.
pub fn parse_sockstat_bytes(raw: &[u8]) -> Result<SockStatFields, ParseError> {
    let content = std::str::from_utf8(raw)
        .map_err(|e| ParseError::new(format!("sockstat is not valid UTF-8: {}", e)))?;
    parse_sockstat(content)
}
