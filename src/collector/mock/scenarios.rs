//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc/net/sockstat` contents for the
//! kernel generations the parser has to cope with.

use super::filesystem::MockFs;

impl MockFs {
    /// Kernel 2.6.25+ output: UDP memory accounting and UDP-Lite present.
    pub fn sockstat_modern() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/net/sockstat",
            "\
sockets: used 229
TCP: inuse 5 orphan 3 tw 2 alloc 10 mem 100
UDP: inuse 8 mem 50
UDPLITE: inuse 0
RAW: inuse 0
FRAG: inuse 0 memory 4096
",
        );
        fs
    }

    /// Pre-2.6.20 output: no UDP memory field and no UDPLITE line.
    pub fn sockstat_legacy() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/net/sockstat",
            "\
sockets: used 120
TCP: inuse 5 orphan 0 tw 1 alloc 6 mem 2
UDP: inuse 8
RAW: inuse 0
FRAG: inuse 0 memory 0
",
        );
        fs
    }

    /// Sockstat with a non-numeric mandatory field.
    pub fn sockstat_corrupt() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/net/sockstat",
            "\
sockets: used 229
TCP: inuse ? orphan 3 tw 2 alloc 10 mem 100
UDP: inuse 8 mem 50
RAW: inuse 0
FRAG: inuse 0 memory 0
",
        );
        fs
    }
}
