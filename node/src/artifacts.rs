//! Loaders for the genesis artifacts in the bootstrap directory.
//!
//! One JSON file per artifact. A missing or malformed file is fatal on any
//! path that needs it, and the error names the artifact.

use std::path::Path;

use serde::de::DeserializeOwned;

use meridian_model::bootstrap::{
    PATH_DKG_DATA_PUB, PATH_ROOT_BLOCK, PATH_ROOT_QC, PATH_ROOT_RESULT, PATH_ROOT_SEAL,
};
use meridian_model::{Block, DkgPublicData, ExecutionResult, QuorumCertificate, Seal};

use crate::NodeError;

pub fn load_root_block(bootstrap_dir: &Path) -> Result<Block, NodeError> {
    load_json(bootstrap_dir, PATH_ROOT_BLOCK, "root block")
}

pub fn load_root_qc(bootstrap_dir: &Path) -> Result<QuorumCertificate, NodeError> {
    load_json(bootstrap_dir, PATH_ROOT_QC, "root quorum certificate")
}

pub fn load_root_result(bootstrap_dir: &Path) -> Result<ExecutionResult, NodeError> {
    load_json(bootstrap_dir, PATH_ROOT_RESULT, "root execution result")
}

pub fn load_root_seal(bootstrap_dir: &Path) -> Result<Seal, NodeError> {
    load_json(bootstrap_dir, PATH_ROOT_SEAL, "root seal")
}

pub fn load_dkg_public_data(bootstrap_dir: &Path) -> Result<DkgPublicData, NodeError> {
    load_json(bootstrap_dir, PATH_DKG_DATA_PUB, "DKG public data")
}

fn load_json<T: DeserializeOwned>(
    dir: &Path,
    file_name: &str,
    artifact: &str,
) -> Result<T, NodeError> {
    let path = dir.join(file_name);
    let raw = std::fs::read_to_string(&path).map_err(|e| NodeError::BootstrapArtifact {
        artifact: artifact.to_string(),
        reason: format!("{}: {e}", path.display()),
    })?;
    serde_json::from_str(&raw).map_err(|e| NodeError::BootstrapArtifact {
        artifact: artifact.to_string(),
        reason: e.to_string(),
    })
}
