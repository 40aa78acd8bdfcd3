//! Static feed bodies used across harnesses.
//!
//! Shapes are taken from real published lists: bare `address # timestamp`
//! lines, row-label prefixes (`… : address # timestamp`), trailing tokens
//! after the timestamp, interleaved comments and blanks.

/// Minimal valid body: one host, one timestamp (2023-11-14T22:13:20Z).
pub const BODY_ONE_HOST: &str = "192.168.1.1 # 1700000000 UTC\n";

/// Two hosts, ascending timestamps.
pub const BODY_TWO_HOSTS: &str = "10.0.0.1 # 1700000000 UTC\n10.0.0.2 # 1700000600 UTC\n";

/// The first host alone (the "previous" snapshot for BODY_TWO_HOSTS).
pub const BODY_FIRST_HOST: &str = "10.0.0.1 # 1700000000 UTC\n";

/// A realistic body: header comments, row labels, CIDR entries, trailing
/// tokens, blanks, and one malformed line.
pub const BODY_MESSY: &str = concat!(
    "# ssh dictionary attackers, generated hourly\n",
    "// do not redistribute\n",
    "\n",
    "row 1 : 203.0.113.7 # 1700000100 UTC sshd\n",
    "198.51.100.0/24 # 1700000200\n",
    "not an ip # 1700000000\n",
    "row 2 : 2001:db8::9 # 1700000300 UTC\n",
    "\n",
);

/// Four hosts, used for cold-start halving checks (first half = first two).
pub const BODY_FOUR_HOSTS: &str = concat!(
    "10.0.0.1 # 1700000000\n",
    "10.0.0.2 # 1700000001\n",
    "10.0.0.3 # 1700000002\n",
    "10.0.0.4 # 1700000003\n",
);

/// Build a body of `n` sequential hosts `10.0.x.y` with ascending timestamps.
pub fn synthetic_body(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "10.0.{}.{} # {}\n",
                i / 256,
                i % 256,
                1_700_000_000 + i as i64
            )
        })
        .collect()
}
