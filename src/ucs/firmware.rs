//! UCS Manager version strings
//!
//! UCS Manager reports versions as `major.minor(maintenance patch)`, e.g.
//! `4.2(3d)` or `3.1(2b)`. The `major.minor` pair names the release train.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::ucs::error::UcsError;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)\((\d+)([a-zA-Z]*)\)$").expect("version regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
    pub maintenance: u32,
    pub patch: String,
}

impl FirmwareVersion {
    /// Release train, e.g. `4.2` for `4.2(3d)`
    pub fn train(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl FromStr for FirmwareVersion {
    type Err = UcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || UcsError::InvalidVersion(trimmed.to_string());

        let caps = VERSION_RE.captures(trimmed).ok_or_else(invalid)?;
        let number = |i: usize| caps[i].parse::<u32>().map_err(|_| invalid());

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            maintenance: number(3)?,
            patch: caps[4].to_ascii_lowercase(),
        })
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}({}{})",
            self.major, self.minor, self.maintenance, self.patch
        )
    }
}
