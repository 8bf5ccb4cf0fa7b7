//! Aggregation of the host-side services the bridge forwards to.

use std::sync::Arc;

use vaultdesk_service_traits::{NoopVaultService, NoopVercelService, VaultService, VercelService};

/// The privileged operations behind the bridge, one trait object per
/// namespace. Defaults to noop implementations so the gateway can run
/// standalone.
pub struct BridgeServices {
    pub vault: Arc<dyn VaultService>,
    pub vercel: Arc<dyn VercelService>,
}

impl Default for BridgeServices {
    fn default() -> Self {
        Self {
            vault: Arc::new(NoopVaultService),
            vercel: Arc::new(NoopVercelService),
        }
    }
}

impl BridgeServices {
    pub fn with_vault(mut self, vault: Arc<dyn VaultService>) -> Self {
        self.vault = vault;
        self
    }

    pub fn with_vercel(mut self, vercel: Arc<dyn VercelService>) -> Self {
        self.vercel = vercel;
        self
    }
}
