//! Collectors for the Linux `/proc` filesystem.
//!
//! This module provides the sockstat parser and the collector reading
//! `/proc/net/sockstat` through the `FileSystem` abstraction.

pub mod parser;
pub mod sockstat;

pub use parser::{ParseError, SockStatFields, parse_sockstat};
pub use sockstat::{SockStatCollector, SockStatConfig, read_sockstat};
