//! Block-format versioning
//!
//! A block version is a packed `u32` laid out as `0xMMmmpp00`:
//!
//! ```text
//! byte 3   byte 2   byte 1   byte 0
//! major    minor    patch    reserved
//! ```
//!
//! Data is compatible across builds that share `major.minor`; the patch byte
//! never affects compatibility and the last byte is reserved, so `3.1.0`
//! (`0x03010000`) interoperates with `3.1.1` (`0x03010100`). One legacy
//! pre-release value, [`BlockVersion::Rc4`] (`4`), predates the packed
//! layout and sorts below every release.
//!
//! Peers advertise versions as raw integers while local reference versions
//! are compiled in, so comparison takes a [`VersionArg`] on the left and a
//! [`BlockVersion`] on the right. Nothing here rejects an out-of-range
//! value; [`is_supported`] and [`ensure_supported`] let callers detect it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::{ProtocolError, ProtocolResult};

pub const RC4_VERSION_STR: &str = "3.0.0-rc4";
pub const V3_0_VERSION_STR: &str = "3.0.0";
pub const V3_1_VERSION_STR: &str = "3.1.0";
pub const V3_2_VERSION_STR: &str = "3.2.0";

/// Prefix shared by all 3.0.0 release candidates
pub const RC_VERSION_PREFIX: &str = "3.0.0-rc";

/// Rendering for any value that is not a named milestone
pub const UNKNOWN_VERSION_STR: &str = "Unknown";

pub const MIN_MAJOR_VERSION: u8 = 3;
pub const MAX_MAJOR_VERSION: u8 = u8::MAX;

/// Named block-format milestones
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockVersion {
    Rc4 = 4,
    V3_0 = 0x0300_0000,
    V3_1 = 0x0301_0000,
    V3_2 = 0x0302_0000,
}

impl BlockVersion {
    /// Oldest version this build accepts
    pub const MIN_VERSION: BlockVersion = BlockVersion::Rc4;
    /// Newest version this build produces
    pub const MAX_VERSION: BlockVersion = BlockVersion::V3_2;
    /// Version used before any negotiation has happened
    pub const DEFAULT_VERSION: BlockVersion = BlockVersion::V3_1;

    /// Packed wire value
    pub const fn raw(self) -> u32 {
        self as u32
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rc4 => RC4_VERSION_STR,
            Self::V3_0 => V3_0_VERSION_STR,
            Self::V3_1 => V3_1_VERSION_STR,
            Self::V3_2 => V3_2_VERSION_STR,
        }
    }
}

impl fmt::Display for BlockVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockVersion {
    type Err = ProtocolError;

    /// Exact milestone lookup; use [`parse_packed`] for arbitrary
    /// `major.minor.patch` strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        match input {
            RC4_VERSION_STR => Ok(Self::Rc4),
            V3_0_VERSION_STR => Ok(Self::V3_0),
            V3_1_VERSION_STR => Ok(Self::V3_1),
            V3_2_VERSION_STR => Ok(Self::V3_2),
            _ if input.starts_with(RC_VERSION_PREFIX) => Err(ProtocolError::invalid_version(
                s,
                format!("pre-release {input} is not supported, only {RC4_VERSION_STR} is"),
            )),
            _ => Err(ProtocolError::invalid_version(s, "not a named block version")),
        }
    }
}

/// Left-hand side of a version comparison
///
/// Either a raw value as received from a peer or a compiled-in milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionArg {
    Raw(u32),
    Named(BlockVersion),
}

impl VersionArg {
    pub const fn raw(self) -> u32 {
        match self {
            Self::Raw(raw) => raw,
            Self::Named(version) => version.raw(),
        }
    }
}

impl From<u32> for VersionArg {
    fn from(raw: u32) -> Self {
        Self::Raw(raw)
    }
}

impl From<BlockVersion> for VersionArg {
    fn from(version: BlockVersion) -> Self {
        Self::Named(version)
    }
}

impl fmt::Display for VersionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(canonical_string(*self))
    }
}

/// Order `version` against a compiled-in reference over the full 32 bits
pub fn compare(version: impl Into<VersionArg>, reference: BlockVersion) -> Ordering {
    let version: VersionArg = version.into();
    version.raw().cmp(&reference.raw())
}

/// Textual tag of a named milestone, `"Unknown"` for everything else
///
/// Never synthesizes a dotted string from the packed bytes: `3.1.1` has no
/// name and renders as `"Unknown"`.
pub fn canonical_string(version: impl Into<VersionArg>) -> &'static str {
    let version: VersionArg = version.into();
    match version {
        VersionArg::Named(version) => version.as_str(),
        VersionArg::Raw(raw) => BlockVersion::try_from(raw)
            .map(BlockVersion::as_str)
            .unwrap_or(UNKNOWN_VERSION_STR),
    }
}

/// Pack `major.minor.patch` into the `0xMMmmpp00` layout
pub const fn pack(major: u8, minor: u8, patch: u8) -> u32 {
    (major as u32) << 24 | (minor as u32) << 16 | (patch as u32) << 8
}

pub const fn major(raw: u32) -> u8 {
    (raw >> 24) as u8
}

pub const fn minor(raw: u32) -> u8 {
    (raw >> 16) as u8
}

pub const fn patch(raw: u32) -> u8 {
    (raw >> 8) as u8
}

/// Whether two versions share `major.minor` and can exchange data
pub fn is_compatible(a: impl Into<VersionArg>, b: impl Into<VersionArg>) -> bool {
    let (a, b): (VersionArg, VersionArg) = (a.into(), b.into());
    a.raw() >> 16 == b.raw() >> 16
}

/// Whether `raw` lies within `MIN_VERSION..=MAX_VERSION`
pub fn is_supported(raw: u32) -> bool {
    (BlockVersion::MIN_VERSION.raw()..=BlockVersion::MAX_VERSION.raw()).contains(&raw)
}

/// Reject values outside the supported range with a reportable error
pub fn ensure_supported(raw: u32) -> ProtocolResult<u32> {
    if is_supported(raw) {
        Ok(raw)
    } else {
        Err(ProtocolError::UnsupportedVersion {
            version: raw,
            label: canonical_string(raw),
            min: BlockVersion::MIN_VERSION.raw(),
            max: BlockVersion::MAX_VERSION.raw(),
        })
    }
}

/// Parse a textual version such as `"3.1.0"` into its packed value
///
/// Milestone tags (including the `3.0.0-rc4` pre-release) map to their
/// milestone; anything else must be three dot-separated bytes with a major
/// in `MIN_MAJOR_VERSION..=MAX_MAJOR_VERSION`. The result is not range
/// checked, see [`ensure_supported`].
pub fn parse_packed(s: &str) -> ProtocolResult<u32> {
    if let Ok(version) = s.parse::<BlockVersion>() {
        return Ok(version.raw());
    }

    let input = s.trim();
    if input.starts_with(RC_VERSION_PREFIX) {
        // Surface the pre-release diagnostic from the milestone lookup
        return s.parse::<BlockVersion>().map(BlockVersion::raw);
    }

    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() != 3 {
        return Err(ProtocolError::invalid_version(
            s,
            format!("expected major.minor.patch, got {} component(s)", parts.len()),
        ));
    }

    let mut bytes = [0u8; 3];
    for (slot, part) in bytes.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::invalid_version(
                s,
                format!("component '{part}' must be decimal digits"),
            ));
        }
        if part.len() > 1 && part.starts_with('0') {
            return Err(ProtocolError::invalid_version(
                s,
                format!("component '{part}' has a leading zero"),
            ));
        }
        *slot = part.parse::<u8>().map_err(|e| {
            ProtocolError::invalid_version(s, format!("component '{part}' is not a byte: {e}"))
        })?;
    }

    let [major, minor, patch] = bytes;
    if major < MIN_MAJOR_VERSION {
        return Err(ProtocolError::invalid_version(
            s,
            format!("major version {major} is below minimum {MIN_MAJOR_VERSION}"),
        ));
    }

    Ok(pack(major, minor, patch))
}
