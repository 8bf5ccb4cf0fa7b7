//! Channel allowlist: the closed set of identifiers the bridge will forward.

use std::collections::HashSet;

/// Credential vault channels.
pub const VAULT_CHANNELS: &[&str] = &[
    "vault:get-status",
    "vault:get-config",
    "vault:get-settings",
    "vault:save-settings",
    "vault:test-connection",
    "vault:get-diagnostics",
    "vault:list-backups",
    "vault:create-backup",
    "vault:restore-backup",
    "vault:delete-backup",
];

/// Deployment-provider channels.
pub const VERCEL_CHANNELS: &[&str] = &[
    "vercel:save-token",
    "vercel:list-projects",
    "vercel:is-project-available",
    "vercel:create-project",
    "vercel:connect-existing-project",
    "vercel:get-deployments",
    "vercel:disconnect",
    "vercel:test-connection",
    "vercel:deploy",
];

/// Immutable membership check over the fixed channel set.
///
/// Matching is exact string equality on the raw identifier. No prefix,
/// wildcard, or pattern matching: anything not byte-for-byte equal to a
/// registered entry is rejected.
pub struct ChannelRegistry {
    channels: HashSet<&'static str>,
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelRegistry {
    pub fn new() -> Self {
        let channels = VAULT_CHANNELS
            .iter()
            .chain(VERCEL_CHANNELS)
            .copied()
            .collect();
        Self { channels }
    }

    pub fn is_allowed(&self, channel: &str) -> bool {
        self.channels.contains(channel)
    }

    /// Sorted channel list, used for the feature advertisement sent to the
    /// front-end after the transport comes up.
    pub fn channel_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.channels.iter().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
