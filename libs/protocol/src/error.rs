//! Protocol-level errors for identifier and version resolution
//!
//! The lookups in this crate never fail on their own: name lookups return
//! `Option`, id lookups fall back to sentinel strings and version comparison
//! is total. These errors exist for the layers that turn external text or
//! peer-advertised values into protocol types (configuration loading,
//! handshake validation) and need to report *why* a value was refused.

use thiserror::Error;

/// Identifier and version resolution errors with diagnostic context
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Module name is not in the registry (typo or deprecated name)
    #[error("Unknown module name '{name}': registered modules are {registered}")]
    UnknownModule { name: String, registered: String },

    /// Textual version could not be turned into a packed block version
    #[error("Invalid block version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    /// Packed block version lies outside the range this build accepts
    #[error("Unsupported block version {version:#010x} ({label}): supported range is {min:#010x}..={max:#010x}")]
    UnsupportedVersion {
        version: u32,
        label: &'static str,
        min: u32,
        max: u32,
    },

    /// Deployment architecture name is not recognized
    #[error("Unknown node architecture '{0}': expected one of air, pro, max, light")]
    UnknownArchitecture(String),

    /// Node role name is not recognized
    #[error("Unknown node type '{0}'")]
    UnknownNodeType(String),
}

impl ProtocolError {
    /// Create UnknownModule error listing the names that would have matched
    pub fn unknown_module(name: impl Into<String>) -> Self {
        let registered = crate::module_id::MODULE_NAMES
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");

        Self::UnknownModule {
            name: name.into(),
            registered,
        }
    }

    /// Create InvalidVersion error
    pub fn invalid_version(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for protocol operations
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
