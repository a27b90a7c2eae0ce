//! Node roles and deployment topologies

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::ProtocolError;

bitflags! {
    /// Role flags a peer advertises
    ///
    /// Occupies the message extension field alongside
    /// [`crate::MessageExtFieldFlag`]; `LIGHT_NODE` and `RESPONSE` share
    /// bit 0, so decoders must know which set they are reading.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NodeType: u32 {
        const LIGHT_NODE = 0x1;
        const CONSENSUS_NODE = 0x2;
        const OBSERVER_NODE = 0x4;
        const NODE_OUTSIDE_GROUP = 0x8;
    }
}

impl NodeType {
    /// No role assigned
    pub const NONE: NodeType = NodeType::empty();

    /// Name of a single role flag, `None` for combinations and unknown bits
    pub fn name(&self) -> Option<&'static str> {
        if self.is_empty() {
            return Some("None");
        }
        self.iter_names()
            .next()
            .filter(|(_, flag)| flag == self)
            .map(|(name, _)| name)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("Unknown"))
    }
}

impl FromStr for NodeType {
    type Err = ProtocolError;

    /// Parse a single role name, accepting either the flag name or its
    /// short form (`consensus`, `observer`, `light`, `outside_group`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = match s.to_ascii_lowercase().as_str() {
            "none" => Self::NONE,
            "light" | "light_node" => Self::LIGHT_NODE,
            "consensus" | "consensus_node" => Self::CONSENSUS_NODE,
            "observer" | "observer_node" => Self::OBSERVER_NODE,
            "outside_group" | "node_outside_group" => Self::NODE_OUTSIDE_GROUP,
            _ => return Err(ProtocolError::UnknownNodeType(s.to_string())),
        };
        Ok(role)
    }
}

/// Deployment topology of a chain
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeArchitectureType {
    /// All services in one process
    Air = 0,
    /// Services split across processes, single executor
    Pro = 1,
    /// Distributed storage and executors
    Max = 2,
    Light = 3,
}

impl NodeArchitectureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Pro => "pro",
            Self::Max => "max",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for NodeArchitectureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeArchitectureType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Air, Self::Pro, Self::Max, Self::Light]
            .into_iter()
            .find(|arch| arch.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProtocolError::UnknownArchitecture(s.to_string()))
    }
}
