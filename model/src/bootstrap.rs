//! File names of the bootstrap directory artifacts.
//!
//! The bootstrap directory is produced by the genesis ceremony tooling and
//! consumed only at process start. Each artifact is a single JSON file.

use crate::identifier::Identifier;

/// Root (genesis) block.
pub const PATH_ROOT_BLOCK: &str = "root-block.json";
/// Quorum certificate for the root block.
pub const PATH_ROOT_QC: &str = "root-qc.json";
/// Execution result for the root block.
pub const PATH_ROOT_RESULT: &str = "root-result.json";
/// Seal over the root block's execution result.
pub const PATH_ROOT_SEAL: &str = "root-seal.json";
/// Public output of the DKG ceremony.
pub const PATH_DKG_DATA_PUB: &str = "dkg-data.pub.json";

/// File name of a node's private identity artifact, parameterized by the
/// node identifier.
pub fn node_info_priv_filename(node_id: &Identifier) -> String {
    format!("node-info.priv.{node_id}.json")
}
