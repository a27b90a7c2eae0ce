//! Module identifiers and the module name registry
//!
//! Every message on the node's front/gateway transport carries a module id
//! so the router can dispatch it to the owning subsystem. Ids are grouped
//! into disjoint numeric families:
//!
//! ```text
//! 1000-1999  Consensus       PBFT, Raft
//! 2000-2999  BlockSync       block and transaction gossip
//! 3000-3999  PubSub          AMOP
//! 4000-4999  LightClient     light node request/response
//! 5000-5999  TxSync          transaction push/pull
//! ```
//!
//! Only a subset of ids has a canonical name. [`id_to_name`] maps the rest
//! to [`UNRECOGNIZED_MODULE`], so it is not the inverse of [`name_to_id`].

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::ProtocolError;

/// Name returned for ids without a registered name
pub const UNRECOGNIZED_MODULE: &str = "unrecognized module";

/// Canonical module names, matched case-insensitively by [`name_to_id`]
pub const MODULE_NAMES: [(&str, ModuleId); 7] = [
    ("raft", ModuleId::Raft),
    ("pbft", ModuleId::Pbft),
    ("amop", ModuleId::Amop),
    ("block_sync", ModuleId::BlockSync),
    ("txs_sync", ModuleId::TxsSync),
    ("cons_txs_sync", ModuleId::ConsTxsSync),
    ("light_node", ModuleId::LightNodeGetBlock),
];

/// Subsystem module identifiers used for message routing
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModuleId {
    // Consensus (1000-1999)
    Pbft = 1000,
    Raft = 1001,

    // Block sync (2000-2999)
    BlockSync = 2000,
    TxsSync = 2001,
    ConsTxsSync = 2002,

    // Pub/sub (3000-3999)
    Amop = 3000,

    // Light client (4000-4999)
    LightNodeGetBlock = 4000,
    LightNodeGetTransactions = 4001,
    LightNodeGetReceipts = 4002,
    LightNodeGetStatus = 4003,
    LightNodeSendTransaction = 4004,
    LightNodeCall = 4005,
    LightNodeGetAbi = 4006,
    LightNodeEnd = 4999,

    // Transaction sync (5000-5999)
    SyncPushTransaction = 5000,
    SyncGetTransactions = 5001,
    SyncEnd = 5999,
}

impl ModuleId {
    /// Every module id in the catalogue, in ascending order
    pub const ALL: [ModuleId; 17] = [
        ModuleId::Pbft,
        ModuleId::Raft,
        ModuleId::BlockSync,
        ModuleId::TxsSync,
        ModuleId::ConsTxsSync,
        ModuleId::Amop,
        ModuleId::LightNodeGetBlock,
        ModuleId::LightNodeGetTransactions,
        ModuleId::LightNodeGetReceipts,
        ModuleId::LightNodeGetStatus,
        ModuleId::LightNodeSendTransaction,
        ModuleId::LightNodeCall,
        ModuleId::LightNodeGetAbi,
        ModuleId::LightNodeEnd,
        ModuleId::SyncPushTransaction,
        ModuleId::SyncGetTransactions,
        ModuleId::SyncEnd,
    ];

    /// Family this id belongs to
    pub fn family(&self) -> ModuleFamily {
        match self {
            Self::Pbft | Self::Raft => ModuleFamily::Consensus,
            Self::BlockSync | Self::TxsSync | Self::ConsTxsSync => ModuleFamily::BlockSync,
            Self::Amop => ModuleFamily::PubSub,
            Self::LightNodeGetBlock
            | Self::LightNodeGetTransactions
            | Self::LightNodeGetReceipts
            | Self::LightNodeGetStatus
            | Self::LightNodeSendTransaction
            | Self::LightNodeCall
            | Self::LightNodeGetAbi
            | Self::LightNodeEnd => ModuleFamily::LightClient,
            Self::SyncPushTransaction | Self::SyncGetTransactions | Self::SyncEnd => {
                ModuleFamily::TxSync
            }
        }
    }

    /// Canonical name, or [`UNRECOGNIZED_MODULE`]
    pub fn name(&self) -> &'static str {
        id_to_name(*self)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModuleId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        name_to_id(s).ok_or_else(|| ProtocolError::unknown_module(s))
    }
}

/// Numeric family a module id range belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleFamily {
    Consensus,
    BlockSync,
    PubSub,
    LightClient,
    TxSync,
}

impl ModuleFamily {
    /// Id range reserved for this family
    pub fn range(&self) -> RangeInclusive<u32> {
        match self {
            Self::Consensus => 1000..=1999,
            Self::BlockSync => 2000..=2999,
            Self::PubSub => 3000..=3999,
            Self::LightClient => 4000..=4999,
            Self::TxSync => 5000..=5999,
        }
    }

    /// Determine the family from a raw id read off the wire
    pub fn of(raw: u32) -> Option<Self> {
        match raw {
            1000..=1999 => Some(Self::Consensus),
            2000..=2999 => Some(Self::BlockSync),
            3000..=3999 => Some(Self::PubSub),
            4000..=4999 => Some(Self::LightClient),
            5000..=5999 => Some(Self::TxSync),
            _ => None,
        }
    }
}

/// Look up a module by its canonical name, ignoring ASCII case
///
/// Anything that is not exactly one of the registered names returns `None`;
/// callers treat that as a configuration error.
pub fn name_to_id(name: &str) -> Option<ModuleId> {
    MODULE_NAMES
        .iter()
        .find(|(registered, _)| registered.eq_ignore_ascii_case(name))
        .map(|(_, id)| *id)
}

/// Canonical name of a module id
///
/// Ids without a registered name collapse to [`UNRECOGNIZED_MODULE`].
pub fn id_to_name(id: ModuleId) -> &'static str {
    match id {
        ModuleId::Pbft => "pbft",
        ModuleId::Raft => "raft",
        ModuleId::BlockSync => "block_sync",
        ModuleId::TxsSync => "txs_sync",
        ModuleId::ConsTxsSync => "cons_txs_sync",
        ModuleId::Amop => "amop",
        ModuleId::LightNodeGetBlock => "light_node",
        _ => UNRECOGNIZED_MODULE,
    }
}
