//! Read access to the threshold key ceremony output.

use meridian_model::{DkgParticipant, DkgPublicData, Identifier};

/// The public DKG output as loaded during initialization. Consensus
/// components read group and share keys through this instead of touching the
/// raw artifact.
pub struct DkgState {
    data: DkgPublicData,
}

impl DkgState {
    pub fn new(data: DkgPublicData) -> Self {
        Self { data }
    }

    pub fn group_key(&self) -> &[u8] {
        &self.data.group_pub_key
    }

    pub fn size(&self) -> usize {
        self.data.participants.len()
    }

    pub fn participant(&self, node_id: &Identifier) -> Option<&DkgParticipant> {
        self.data.participant(node_id)
    }

    /// Whether the given node took part in the ceremony.
    pub fn has_participant(&self, node_id: &Identifier) -> bool {
        self.data.participant(node_id).is_some()
    }
}
