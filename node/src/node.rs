//! The runtime node handed to modules, hooks, and component factories.

use std::sync::Arc;

use meridian_model::{
    Block, ChainId, ExecutionResult, PublicKey, QuorumCertificate, Seal,
};
use meridian_state::{DkgState, ProtocolState};
use meridian_storage_lmdb::{
    LmdbBlocks, LmdbCollections, LmdbEnvironment, LmdbGuarantees, LmdbHeaders, LmdbIdentities,
    LmdbIndex, LmdbPayloads, LmdbSeals, LmdbTransactions,
};

use crate::config::NodeConfig;
use crate::identity::Local;
use crate::metrics::NodeMetrics;
use crate::NodeError;

/// The storage collaborators, all backed by one shared LMDB environment.
///
/// The environment is exclusively owned by the supervisor for the process
/// lifetime; collaborators get shared read access through `Arc` and the
/// environment closes when the last handle drops, after teardown.
pub struct Storage {
    pub env: Arc<LmdbEnvironment>,
    pub headers: Arc<LmdbHeaders>,
    pub identities: Arc<LmdbIdentities>,
    pub guarantees: Arc<LmdbGuarantees>,
    pub seals: Arc<LmdbSeals>,
    pub index: Arc<LmdbIndex>,
    pub payloads: Arc<LmdbPayloads>,
    pub blocks: Arc<LmdbBlocks>,
    pub transactions: Arc<LmdbTransactions>,
    pub collections: Arc<LmdbCollections>,
}

const LMDB_MAX_DBS: u32 = 32;
const LMDB_MAP_SIZE: usize = 16 * 1024 * 1024 * 1024;

impl Storage {
    /// Open the environment at the configured data directory and construct
    /// every collaborator over it.
    pub fn open(config: &NodeConfig) -> Result<Self, NodeError> {
        let env = Arc::new(LmdbEnvironment::open(
            &config.data_dir,
            LMDB_MAX_DBS,
            LMDB_MAP_SIZE,
        )?);

        let headers = Arc::new(LmdbHeaders::new(Arc::clone(&env)));
        let identities = Arc::new(LmdbIdentities::new(Arc::clone(&env)));
        let guarantees = Arc::new(LmdbGuarantees::new(Arc::clone(&env)));
        let seals = Arc::new(LmdbSeals::new(Arc::clone(&env)));
        let index = Arc::new(LmdbIndex::new(Arc::clone(&env)));
        let payloads = Arc::new(LmdbPayloads::new(
            Arc::clone(&env),
            LmdbIdentities::new(Arc::clone(&env)),
            LmdbGuarantees::new(Arc::clone(&env)),
            LmdbSeals::new(Arc::clone(&env)),
        ));
        let blocks = Arc::new(LmdbBlocks::new(Arc::clone(&headers), Arc::clone(&payloads)));
        let transactions = Arc::new(LmdbTransactions::new(Arc::clone(&env)));
        let collections = Arc::new(LmdbCollections::new(
            Arc::clone(&env),
            Arc::clone(&transactions),
        ));

        Ok(Self {
            env,
            headers,
            identities,
            guarantees,
            seals,
            index,
            payloads,
            blocks,
            transactions,
            collections,
        })
    }
}

/// The canonical root-of-chain context. Produced once per process, either
/// by the genesis commit (first run) or re-derived from the bootstrap
/// artifacts (resume run). Never mutated after the node starts.
pub struct RootContext {
    pub block: Block,
    pub qc: QuorumCertificate,
    pub result: ExecutionResult,
    pub seal: Seal,
    pub chain_id: ChainId,
    pub dkg: Arc<DkgState>,
    /// Public key of the root account, set by execution-role deployments.
    pub account_key: Option<PublicKey>,
    /// Initial token supply recorded at genesis.
    pub token_supply: u64,
}

/// The assembled runtime node. Modules and component factories receive
/// `&mut Node`; everything here is live by the time they run.
pub struct Node {
    pub config: NodeConfig,
    pub local: Local,
    pub storage: Storage,
    pub state: Arc<ProtocolState>,
    pub root: RootContext,
    /// Whether this process took the genesis bootstrap path.
    pub bootstrapped: bool,
    pub metrics: Arc<NodeMetrics>,
}

impl Node {
    /// The address protocol services bind to: the configured override, or
    /// the address recorded in this node's persisted identity.
    pub fn bind_addr(&self) -> &str {
        self.config
            .bind_addr
            .as_deref()
            .unwrap_or(&self.local.identity().address)
    }
}
