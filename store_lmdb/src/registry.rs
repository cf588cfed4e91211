//! LMDB implementation of RegistryStore.

use trail_store::{Registry, RegistryStore, StoreError};
use trail_types::SymbolCode;

use crate::txn::LmdbTxn;

impl RegistryStore for LmdbTxn<'_> {
    fn get_registry(&self, code: &SymbolCode) -> Result<Option<Registry>, StoreError> {
        self.get_record(self.env.registries_db, code.as_bytes())
    }

    fn put_registry(&mut self, registry: &Registry) -> Result<(), StoreError> {
        let db = self.env.registries_db;
        self.put_record(db, registry.code().as_bytes(), registry)
    }
}
