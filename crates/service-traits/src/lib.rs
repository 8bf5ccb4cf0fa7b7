//! Trait interfaces for the privileged operations behind the bridge.
//!
//! These are the host dispatcher's seam: the gateway forwards validated
//! calls here and treats each method as an opaque async operation. Each
//! trait has a `Noop` implementation that returns empty/default responses,
//! allowing the bridge to run standalone before domain crates are wired in.

use {async_trait::async_trait, serde_json::Value};

/// Error type returned by service methods.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    Message { message: String },
    #[error("{0}")]
    Serde(#[from] serde_json::Error),
}

impl ServiceError {
    #[must_use]
    pub fn message(message: impl std::fmt::Display) -> Self {
        Self::Message {
            message: message.to_string(),
        }
    }
}

impl From<String> for ServiceError {
    fn from(value: String) -> Self {
        Self::message(value)
    }
}

impl From<&str> for ServiceError {
    fn from(value: &str) -> Self {
        Self::message(value)
    }
}

impl From<ServiceError> for vaultdesk_protocol::ErrorShape {
    fn from(err: ServiceError) -> Self {
        Self::new(vaultdesk_protocol::error_codes::UNAVAILABLE, err.to_string())
    }
}

pub type ServiceResult<T = Value> = Result<T, ServiceError>;

// ── Vault ───────────────────────────────────────────────────────────────────

/// Credential vault operations, one method per `vault:*` channel.
#[async_trait]
pub trait VaultService: Send + Sync {
    async fn get_status(&self) -> ServiceResult;
    async fn get_config(&self) -> ServiceResult;
    async fn get_settings(&self) -> ServiceResult;
    async fn save_settings(&self, params: Value) -> ServiceResult;
    async fn test_connection(&self, params: Value) -> ServiceResult;
    async fn get_diagnostics(&self) -> ServiceResult;
    async fn list_backups(&self) -> ServiceResult;
    async fn create_backup(&self, params: Value) -> ServiceResult;
    async fn restore_backup(&self, params: Value) -> ServiceResult;
    async fn delete_backup(&self, params: Value) -> ServiceResult;
}

pub struct NoopVaultService;

#[async_trait]
impl VaultService for NoopVaultService {
    async fn get_status(&self) -> ServiceResult {
        Ok(serde_json::json!({ "running": false, "initialized": false }))
    }

    async fn get_config(&self) -> ServiceResult {
        Ok(serde_json::json!({}))
    }

    async fn get_settings(&self) -> ServiceResult {
        Ok(serde_json::json!({}))
    }

    async fn save_settings(&self, _params: Value) -> ServiceResult {
        Err("vault service not configured".into())
    }

    async fn test_connection(&self, _params: Value) -> ServiceResult {
        Err("vault service not configured".into())
    }

    async fn get_diagnostics(&self) -> ServiceResult {
        Ok(serde_json::json!([]))
    }

    async fn list_backups(&self) -> ServiceResult {
        Ok(serde_json::json!([]))
    }

    async fn create_backup(&self, _params: Value) -> ServiceResult {
        Err("vault service not configured".into())
    }

    async fn restore_backup(&self, _params: Value) -> ServiceResult {
        Err("vault service not configured".into())
    }

    async fn delete_backup(&self, _params: Value) -> ServiceResult {
        Err("vault service not configured".into())
    }
}

// ── Vercel ──────────────────────────────────────────────────────────────────

/// Deployment-provider operations, one method per `vercel:*` channel.
#[async_trait]
pub trait VercelService: Send + Sync {
    async fn save_token(&self, params: Value) -> ServiceResult;
    async fn list_projects(&self) -> ServiceResult;
    async fn is_project_available(&self, params: Value) -> ServiceResult;
    async fn create_project(&self, params: Value) -> ServiceResult;
    async fn connect_existing_project(&self, params: Value) -> ServiceResult;
    async fn get_deployments(&self) -> ServiceResult;
    async fn disconnect(&self) -> ServiceResult;
    async fn test_connection(&self) -> ServiceResult;
    async fn deploy(&self, params: Value) -> ServiceResult;
}

pub struct NoopVercelService;

#[async_trait]
impl VercelService for NoopVercelService {
    async fn save_token(&self, _params: Value) -> ServiceResult {
        Err("vercel service not configured".into())
    }

    async fn list_projects(&self) -> ServiceResult {
        Ok(serde_json::json!([]))
    }

    async fn is_project_available(&self, _params: Value) -> ServiceResult {
        Ok(serde_json::json!({ "available": false }))
    }

    async fn create_project(&self, _params: Value) -> ServiceResult {
        Err("vercel service not configured".into())
    }

    async fn connect_existing_project(&self, _params: Value) -> ServiceResult {
        Err("vercel service not configured".into())
    }

    async fn get_deployments(&self) -> ServiceResult {
        Ok(serde_json::json!([]))
    }

    async fn disconnect(&self) -> ServiceResult {
        Ok(serde_json::json!({ "ok": true }))
    }

    async fn test_connection(&self) -> ServiceResult {
        Err("vercel service not configured".into())
    }

    async fn deploy(&self, _params: Value) -> ServiceResult {
        Err("vercel service not configured".into())
    }
}
