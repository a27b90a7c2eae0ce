//! Message-level identifiers: extension flags, message types and service ids
//!
//! These values are part of the wire contract between nodes and between a
//! node and its SDK clients. They MUST NOT be renumbered once released;
//! renumbering is a breaking protocol change.

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

bitflags! {
    /// Flags carried in a message's extension field
    ///
    /// The extension field is shared with [`crate::NodeType`] bits and the
    /// two sets overlap at bit 0 (`RESPONSE` and `LIGHT_NODE`). Which set a
    /// field holds is known from the message context, not from the bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MessageExtFieldFlag: u32 {
        /// Message is a response to an earlier request
        const RESPONSE = 0x0001;
        /// Payload is compressed
        const COMPRESS = 0x0010;
    }
}

impl MessageExtFieldFlag {
    /// Check if the response bit is set
    pub fn is_response(&self) -> bool {
        self.contains(Self::RESPONSE)
    }

    /// Check if the compress bit is set
    pub fn is_compressed(&self) -> bool {
        self.contains(Self::COMPRESS)
    }
}

/// Message types exchanged between a node and its clients
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageType {
    // Session and notification messages (0x100-0x11F)
    Handshake = 0x100,
    BlockNotify = 0x101,
    RpcRequest = 0x102,
    GroupNotify = 0x103,

    // Event subscription messages (0x120-0x13F)
    EventSubscribe = 0x120,
    EventUnsubscribe = 0x121,
    EventLogPush = 0x122,
}

impl MessageType {
    /// Check if this message belongs to the event subscription group
    pub fn is_event(&self) -> bool {
        matches!(u32::from(*self), 0x120..=0x13F)
    }
}

/// Services a protocol message can be addressed to
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServiceId {
    NodeService = 0x0,
    GatewayService = 0x1,
    RpcService = 0x2,
    ExecutorService = 0x3,
}

impl ServiceId {
    /// Highest service id in use
    pub const MAX_SERVICE_ID: ServiceId = ServiceId::ExecutorService;
}

/// Versions of the node-to-service protocol negotiated at connect time
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolVersion {
    V0 = 0,
    V1 = 1,
    V2 = 2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_flags_combine() {
        let flags = MessageExtFieldFlag::RESPONSE | MessageExtFieldFlag::COMPRESS;
        assert_eq!(flags.bits(), 0x0011);
        assert!(flags.is_response());
        assert!(flags.is_compressed());
        assert!(!MessageExtFieldFlag::COMPRESS.is_response());
    }

    #[test]
    fn test_ext_flags_from_wire() {
        // Unknown bits are dropped, known bits survive
        let flags = MessageExtFieldFlag::from_bits_truncate(0x0101);
        assert_eq!(flags, MessageExtFieldFlag::RESPONSE);
        assert!(MessageExtFieldFlag::from_bits(0x0100).is_none());
    }

    #[test]
    fn test_ext_field_overlaps_node_type() {
        // Both sets occupy the same field; bit 0 means RESPONSE or LIGHT_NODE
        let overlap = MessageExtFieldFlag::RESPONSE.bits() & crate::NodeType::LIGHT_NODE.bits();
        assert_eq!(overlap, 0x1);
        assert_eq!(
            MessageExtFieldFlag::all().bits() & crate::NodeType::all().bits(),
            0x1
        );
    }

    #[test]
    fn test_message_type_wire_values() {
        assert_eq!(u32::from(MessageType::Handshake), 256);
        assert_eq!(u32::from(MessageType::EventLogPush), 290);
        assert_eq!(MessageType::try_from(0x103).unwrap(), MessageType::GroupNotify);
        assert!(MessageType::try_from(0x104).is_err());
        assert!(MessageType::EventSubscribe.is_event());
        assert!(!MessageType::RpcRequest.is_event());
    }

    #[test]
    fn test_service_ids() {
        assert_eq!(ServiceId::MAX_SERVICE_ID, ServiceId::ExecutorService);
        assert_eq!(u32::from(ServiceId::MAX_SERVICE_ID), 3);
        assert!(ServiceId::try_from(4).is_err());
    }

    #[test]
    fn test_protocol_version_ordering() {
        assert!(ProtocolVersion::V0 < ProtocolVersion::V2);
        assert_eq!(ProtocolVersion::try_from(1).unwrap(), ProtocolVersion::V1);
    }
}
