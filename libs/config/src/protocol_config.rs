//! Protocol Configuration Module
//!
//! Loads node protocol settings from a TOML file with environment variable
//! overrides, then resolves names and version strings into protocol types.
//! Resolution is where unknown modules and unsupported versions surface as
//! configuration errors.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use protocol::{
    canonical_string, ensure_supported, is_compatible, parse_packed, BlockVersion, ModuleId,
    NodeArchitectureType, NodeType,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Config file used when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/protocol.toml";

/// Prefix for environment overrides, e.g. `LEDGER__PROTOCOL__COMPATIBILITY_VERSION`
pub const ENV_PREFIX: &str = "LEDGER";

/// Raw protocol configuration as written by the operator
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProtocolConfig {
    #[serde(default)]
    pub node: NodeSection,

    #[serde(default)]
    pub protocol: ProtocolSection,
}

/// Node role settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NodeSection {
    /// Role names, combined into one flag set
    #[serde(default)]
    pub node_type: Vec<String>,

    #[serde(default = "default_architecture")]
    pub architecture: String,
}

/// Protocol version and module settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProtocolSection {
    #[serde(default = "default_compatibility_version")]
    pub compatibility_version: String,

    #[serde(default = "default_modules")]
    pub modules: Vec<String>,
}

/// Configuration after every name and version has been resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProtocol {
    pub node_type: NodeType,
    pub architecture: NodeArchitectureType,
    /// Packed block version, always within the supported range
    pub version: u32,
    /// Enabled modules, sorted and deduplicated
    pub modules: Vec<ModuleId>,
}

fn default_architecture() -> String {
    NodeArchitectureType::Air.as_str().to_string()
}

fn default_compatibility_version() -> String {
    BlockVersion::DEFAULT_VERSION.as_str().to_string()
}

fn default_modules() -> Vec<String> {
    [ModuleId::Pbft, ModuleId::BlockSync, ModuleId::TxsSync, ModuleId::Amop]
        .iter()
        .map(|id| id.name().to_string())
        .collect()
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            node_type: Vec::new(),
            architecture: default_architecture(),
        }
    }
}

impl Default for ProtocolSection {
    fn default() -> Self {
        Self {
            compatibility_version: default_compatibility_version(),
            modules: default_modules(),
        }
    }
}

/// Environment source mapping `PREFIX__SECTION__KEY` onto `section.key`
fn env_overrides(env_prefix: &str) -> Environment {
    Environment::with_prefix(env_prefix)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("node.node_type")
        .with_list_parse_key("protocol.modules")
}

impl ProtocolConfig {
    /// Load configuration from a file with `LEDGER__` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load configuration using a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        Self::load_with_env(path, env_overrides(env_prefix))
    }

    fn load_with_env(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        info!("Loading protocol config: {:?}", path);

        let config = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(environment)
            .build()
            .context("Failed to build protocol configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize protocol configuration")
    }

    /// Resolve names and version strings into protocol types
    pub fn resolve(&self) -> Result<ResolvedProtocol> {
        let node_type = self
            .node
            .node_type
            .iter()
            .map(|name| name.parse::<NodeType>())
            .try_fold(NodeType::NONE, |acc, role| role.map(|role| acc | role))
            .context("Invalid node.node_type")?;

        let architecture = self
            .node
            .architecture
            .parse::<NodeArchitectureType>()
            .context("Invalid node.architecture")?;

        let requested = &self.protocol.compatibility_version;
        let version = parse_packed(requested)
            .and_then(ensure_supported)
            .with_context(|| format!("Invalid protocol.compatibility_version '{requested}'"))?;

        if BlockVersion::try_from(version).is_err() {
            warn!(
                "compatibility_version {} is not a named milestone, treating it as {:#010x}",
                requested, version
            );
        }

        let mut modules = self
            .protocol
            .modules
            .iter()
            .map(|name| name.parse::<ModuleId>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid protocol.modules")?;

        let listed = modules.len();
        modules.sort();
        modules.dedup();
        if modules.len() != listed {
            warn!("protocol.modules lists {} duplicate module(s)", listed - modules.len());
        }

        for module in &modules {
            debug!("Enabled module {} ({})", module, u32::from(*module));
        }

        let resolved = ResolvedProtocol {
            node_type,
            architecture,
            version,
            modules,
        };

        info!(
            "Resolved protocol config: version={} node_type={} architecture={} modules={}",
            resolved.version_label(),
            resolved.node_type,
            resolved.architecture,
            resolved.modules.len()
        );

        Ok(resolved)
    }
}

impl ResolvedProtocol {
    /// Milestone name of the configured version, or its dotted form
    pub fn version_label(&self) -> String {
        match BlockVersion::try_from(self.version) {
            Ok(milestone) => milestone.as_str().to_string(),
            Err(_) => format!(
                "{}.{}.{}",
                protocol::version::major(self.version),
                protocol::version::minor(self.version),
                protocol::version::patch(self.version)
            ),
        }
    }

    /// Check if a module is enabled on this node
    pub fn has_module(&self, module: ModuleId) -> bool {
        self.modules.binary_search(&module).is_ok()
    }

    /// Check if a peer-advertised version can exchange data with this node
    pub fn accepts_peer_version(&self, peer_version: u32) -> bool {
        let accepted = ensure_supported(peer_version).is_ok()
            && is_compatible(peer_version, self.version);
        if !accepted {
            debug!(
                "Rejecting peer version {:#010x} ({}) against local {}",
                peer_version,
                canonical_string(peer_version),
                self.version_label()
            );
        }
        accepted
    }
}

/// Convenience function to load and resolve configuration
pub fn load_protocol_config(path: Option<&Path>) -> Result<ResolvedProtocol> {
    ProtocolConfig::load(path)?.resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("protocol.toml");
        fs::write(&config_path, content).unwrap();
        (dir, config_path)
    }

    #[test]
    fn test_load_and_resolve() {
        init_tracing();
        let (_dir, config_path) = write_config(
            r#"
[node]
node_type = ["consensus"]
architecture = "Pro"

[protocol]
compatibility_version = "3.2.0"
modules = ["PBFT", "block_sync", "light_node"]
"#,
        );

        let resolved = load_protocol_config(Some(&config_path)).unwrap();

        assert_eq!(resolved.node_type, NodeType::CONSENSUS_NODE);
        assert_eq!(resolved.architecture, NodeArchitectureType::Pro);
        assert_eq!(resolved.version, BlockVersion::V3_2.raw());
        assert_eq!(
            resolved.modules,
            vec![ModuleId::Pbft, ModuleId::BlockSync, ModuleId::LightNodeGetBlock]
        );
        assert!(resolved.has_module(ModuleId::BlockSync));
        assert!(!resolved.has_module(ModuleId::Raft));
    }

    #[test]
    fn test_defaults_apply_to_empty_file() {
        let (_dir, config_path) = write_config("");

        let resolved = load_protocol_config(Some(&config_path)).unwrap();

        assert_eq!(resolved.node_type, NodeType::NONE);
        assert_eq!(resolved.architecture, NodeArchitectureType::Air);
        assert_eq!(resolved.version, BlockVersion::DEFAULT_VERSION.raw());
        assert_eq!(resolved.version_label(), "3.1.0");
        assert_eq!(
            resolved.modules,
            vec![ModuleId::Pbft, ModuleId::BlockSync, ModuleId::TxsSync, ModuleId::Amop]
        );
    }

    #[test]
    fn test_unknown_module_is_config_error() {
        let mut config = ProtocolConfig::default();
        config.protocol.modules = vec!["pbft".to_string(), "hotstuff".to_string()];

        let err = config.resolve().unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("Invalid protocol.modules"));
        assert!(chain.contains("hotstuff"));
    }

    #[test]
    fn test_out_of_range_version_is_config_error() {
        let mut config = ProtocolConfig::default();
        config.protocol.compatibility_version = "3.3.0".to_string();

        let err = config.resolve().unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("'3.3.0'"));
        assert!(chain.contains("Unsupported block version"));
    }

    #[test]
    fn test_patch_version_resolves_with_dotted_label() {
        let mut config = ProtocolConfig::default();
        config.protocol.compatibility_version = "3.1.4".to_string();

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.version, 0x0301_0400);
        assert_eq!(resolved.version_label(), "3.1.4");
    }

    #[test]
    fn test_duplicate_modules_collapse() {
        let mut config = ProtocolConfig::default();
        config.protocol.modules = vec!["raft".into(), "RAFT".into(), "amop".into()];

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.modules, vec![ModuleId::Raft, ModuleId::Amop]);
    }

    #[test]
    fn test_node_roles_combine() {
        let mut config = ProtocolConfig::default();
        config.node.node_type = vec!["observer".into(), "outside_group".into()];

        let resolved = config.resolve().unwrap();
        assert_eq!(
            resolved.node_type,
            NodeType::OBSERVER_NODE | NodeType::NODE_OUTSIDE_GROUP
        );
        assert_eq!(resolved.node_type.to_string(), "Unknown");
    }

    #[test]
    fn test_peer_version_acceptance() {
        let resolved = ProtocolConfig::default().resolve().unwrap();

        assert!(resolved.accepts_peer_version(BlockVersion::V3_1.raw()));
        assert!(resolved.accepts_peer_version(0x0301_0200));
        assert!(!resolved.accepts_peer_version(BlockVersion::V3_2.raw()));
        assert!(!resolved.accepts_peer_version(0x0301_0000 | 0x0400_0000));
    }

    #[test]
    fn test_environment_override() {
        let (_dir, config_path) = write_config(
            r#"
[protocol]
compatibility_version = "3.1.0"
"#,
        );

        // Overrides come from an explicit map so the process environment is untouched
        let mut vars = config_crate::Map::new();
        vars.insert(
            "LEDGER__PROTOCOL__COMPATIBILITY_VERSION".to_string(),
            "3.0.0".to_string(),
        );
        vars.insert("LEDGER__PROTOCOL__MODULES".to_string(), "raft,amop".to_string());
        let environment = env_overrides(ENV_PREFIX).source(Some(vars));

        let config = ProtocolConfig::load_with_env(Some(&config_path), environment).unwrap();

        assert_eq!(config.protocol.compatibility_version, "3.0.0");
        assert_eq!(config.protocol.modules, vec!["raft", "amop"]);

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.version, BlockVersion::V3_0.raw());
        assert_eq!(resolved.modules, vec![ModuleId::Raft, ModuleId::Amop]);
    }

    #[test]
    fn test_version_label_names_milestones() {
        let mut config = ProtocolConfig::default();
        config.protocol.compatibility_version = "3.0.0-rc4".to_string();
        assert_eq!(config.resolve().unwrap().version_label(), "3.0.0-rc4");

        config.protocol.compatibility_version = "3.2.0".to_string();
        assert_eq!(config.resolve().unwrap().version_label(), "3.2.0");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(ProtocolConfig::load(Some(&missing)).is_err());
    }
}
