//! Link quality reader for `/proc/net/wireless`
//!
//! ```text
//! Inter-| sta-|   Quality        |   Discarded packets               | Missed | WE
//!  face | tus | link level noise |  nwid  crypt   frag  retry   misc | beacon | 22
//!  wlan0: 0000   70.  -40.  -256        0      0      0      0      0        0
//! ```
//!
//! Interface rows are matched by prefix on the configured name, so `eth1`
//! also matches an `eth10` row. Existing setups depend on that, keep it.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, trace};

use crate::constants::wireless;

/// Current reading on the driver's 0..=92 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LinkQuality(u8);

impl LinkQuality {
    pub const MAX: LinkQuality = LinkQuality(wireless::LINK_QUALITY_MAX);

    /// Clamp a raw driver value into range
    pub fn new(raw: i64) -> Self {
        Self(raw.clamp(0, i64::from(wireless::LINK_QUALITY_MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Share of the maximum, truncated toward zero
    pub fn percent(self) -> u8 {
        (u32::from(self.0) * 100 / u32::from(wireless::LINK_QUALITY_MAX)) as u8
    }

    /// Fraction of the maximum in [0.0, 1.0]
    pub fn ratio(self) -> f64 {
        f64::from(self.0) / f64::from(wireless::LINK_QUALITY_MAX)
    }
}

impl fmt::Display for LinkQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, wireless::LINK_QUALITY_MAX)
    }
}

/// Reads the statistics file for a single interface
#[derive(Debug, Clone)]
pub struct QualityReader {
    path: PathBuf,
    interface: String,
}

impl QualityReader {
    pub fn new(path: impl Into<PathBuf>, interface: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            interface: interface.into(),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Read the file and return the interface's link quality.
    ///
    /// `Ok(None)` when no row matches or the link field is unparsable;
    /// the caller keeps its previous value in that case.
    pub fn read(&self) -> Result<Option<LinkQuality>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("couldn't open {} for reading", self.path.display()))?;
        let quality = parse_link_quality(&text, &self.interface);
        trace!(
            path = %self.path.display(),
            interface = %self.interface,
            quality = ?quality,
            "Scanned wireless statistics"
        );
        Ok(quality)
    }

    /// Fold a fresh reading into `current`, leaving it untouched if the
    /// interface is missing from the file
    pub fn poll(&self, current: LinkQuality) -> Result<LinkQuality> {
        Ok(self.read()?.unwrap_or_else(|| {
            debug!(interface = %self.interface, "Interface not listed, keeping last link quality");
            current
        }))
    }
}

/// Scan statistics text for `interface`. The last matching row wins.
pub fn parse_link_quality(text: &str, interface: &str) -> Option<LinkQuality> {
    text.lines()
        .skip(wireless::HEADER_LINES)
        .filter_map(|line| {
            let row = line.trim_start_matches(' ');
            if !row.starts_with(interface) {
                return None;
            }
            // name, status, link
            let link = row.split_whitespace().nth(2)?;
            leading_int(link).map(LinkQuality::new)
        })
        .last()
}

/// `%d`-style scan: optional sign followed by at least one digit.
/// `"70."` is 70.
fn leading_int(token: &str) -> Option<i64> {
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
