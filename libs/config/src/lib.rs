//! # Node Protocol Configuration
//!
//! Loads the protocol-facing part of a node's configuration and resolves it
//! against the identifier registries in the `protocol` crate.
//!
//! ## Features
//!
//! - **Node Role**: Role flags and deployment architecture
//! - **Module Selection**: Module names resolved to routing ids
//! - **Compatibility Version**: Textual version parsed and range checked
//!
//! ## Usage
//!
//! ```no_run
//! use protocol_config::load_protocol_config;
//!
//! let resolved = load_protocol_config(None)?;
//! println!("running {} as {}", resolved.version_label(), resolved.node_type);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod protocol_config;

// Re-export commonly used types
pub use protocol_config::{
    load_protocol_config, NodeSection, ProtocolConfig, ProtocolSection, ResolvedProtocol,
    DEFAULT_CONFIG_PATH, ENV_PREFIX,
};
