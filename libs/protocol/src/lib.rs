//! # Ledger Protocol Identifiers
//!
//! ## Purpose
//!
//! Protocol identification and versioning layer shared by every node
//! subsystem:
//! - Message extension flags, message types and service ids
//! - Node role flags and deployment architectures
//! - Module id catalogue with the name/id registry
//! - Packed block-format versions with compatibility rules
//!
//! ## Integration Points
//!
//! - **Message Routing**: Router and session layer dispatch on [`ModuleId`]
//! - **Handshake / Sync Negotiation**: Peers compare advertised versions
//!   against compiled-in [`BlockVersion`] milestones
//! - **Configuration Loading**: Module names and textual versions resolve
//!   through [`name_to_id`] and [`parse_packed`]
//!
//! ## Architecture Role
//!
//! ```text
//! config loader → [protocol] ← consensus / sync
//!        ↓            ↓              ↓
//!   Module names  Constants     Version gates
//!   Version text  Registries    Module dispatch
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Wire header byte layout or message serialization
//! - Network transport or consensus logic
//! - Logging: lookups are pure and never fail loudly
//!
//! Every value here is wire-fixed. Renumbering any of them is a breaking
//! protocol change.

pub mod error;
pub mod message;
pub mod module_id;
pub mod node;
pub mod version;

pub use error::{ProtocolError, ProtocolResult};
pub use message::{MessageExtFieldFlag, MessageType, ProtocolVersion, ServiceId};
pub use module_id::{id_to_name, name_to_id, ModuleFamily, ModuleId, UNRECOGNIZED_MODULE};
pub use node::{NodeArchitectureType, NodeType};
pub use version::{
    canonical_string, compare, ensure_supported, is_compatible, is_supported, parse_packed,
    BlockVersion, VersionArg,
};
