//! Namespaced auxiliary state for subsystems.

use std::sync::Arc;

use meridian_storage_lmdb::LmdbEnvironment;

use crate::error::StateError;

/// A handle a subsystem uses to persist its own bookkeeping alongside the
/// protocol state. Keys are prefixed with the subsystem's namespace so two
/// subsystems can never clobber each other's entries.
pub struct StateMutator {
    env: Arc<LmdbEnvironment>,
    namespace: String,
}

impl StateMutator {
    pub(crate) fn new(env: Arc<LmdbEnvironment>, namespace: &str) -> Self {
        Self {
            env,
            namespace: namespace.to_owned(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn put(&self, key: &str, value: &[u8]) -> Result<(), StateError> {
        self.env.put_meta(&self.scoped(key), value)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.env.get_meta(&self.scoped(key))?)
    }

    fn scoped(&self, key: &str) -> String {
        format!("aux/{}/{}", self.namespace, key)
    }
}
