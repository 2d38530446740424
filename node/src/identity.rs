//! Loading and checking this process's private node identity.
//!
//! Each node has one private-info artifact in the bootstrap directory,
//! named by its identifier. The private keys in it must correspond to the
//! public keys recorded for that identifier in protocol state; the check
//! runs before any component starts and a mismatch is fatal.

use std::path::Path;

use serde::{Deserialize, Serialize};

use meridian_crypto::public_from_private;
use meridian_model::{bootstrap::node_info_priv_filename, Identifier, Identity, PrivateKey, Role};

use crate::NodeError;

/// The private half of a node's identity, loaded once from the bootstrap
/// directory.
#[derive(Serialize, Deserialize)]
pub struct NodeIdentity {
    pub node_id: Identifier,
    pub role: Role,
    pub staking_key: PrivateKey,
    pub network_key: PrivateKey,
}

/// This node's resolved identity: the persisted public record joined with
/// the locally held private keys. Only constructed after
/// [`verify_key_consistency`] has passed.
pub struct Local {
    identity: Identity,
    keys: NodeIdentity,
}

impl Local {
    pub(crate) fn new(identity: Identity, keys: NodeIdentity) -> Self {
        Self { identity, keys }
    }

    pub fn node_id(&self) -> Identifier {
        self.identity.node_id
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    /// The persisted identity record, including the network address other
    /// nodes dial.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn staking_key(&self) -> &PrivateKey {
        &self.keys.staking_key
    }

    pub fn network_key(&self) -> &PrivateKey {
        &self.keys.network_key
    }

    /// Sign a message with the staking key. Consensus collaborators use
    /// this through the node handle instead of touching the raw key.
    pub fn sign(&self, message: &[u8]) -> meridian_model::Signature {
        meridian_crypto::sign_message(message, &self.keys.staking_key)
    }
}

/// Load the private identity artifact for `node_id` from the bootstrap
/// directory.
pub fn load_node_identity(
    bootstrap_dir: &Path,
    node_id: &Identifier,
) -> Result<NodeIdentity, NodeError> {
    let path = bootstrap_dir.join(node_info_priv_filename(node_id));
    let raw = std::fs::read_to_string(&path).map_err(|e| {
        NodeError::Identity(format!(
            "could not read private node info {}: {e}",
            path.display()
        ))
    })?;
    let info: NodeIdentity = serde_json::from_str(&raw).map_err(|e| {
        NodeError::Identity(format!(
            "could not parse private node info {}: {e}",
            path.display()
        ))
    })?;
    if info.node_id != *node_id {
        return Err(NodeError::Identity(format!(
            "private node info is for {}, configured node id is {node_id}",
            info.node_id
        )));
    }
    Ok(info)
}

/// Check that the locally held private keys correspond to the public keys
/// persisted for this node in protocol state.
pub fn verify_key_consistency(keys: &NodeIdentity, persisted: &Identity) -> Result<(), NodeError> {
    if public_from_private(&keys.staking_key) != persisted.staking_pub_key {
        return Err(NodeError::Consistency { key: "staking" });
    }
    if public_from_private(&keys.network_key) != persisted.network_pub_key {
        return Err(NodeError::Consistency { key: "network" });
    }
    Ok(())
}
