//! Handler registration: maps each allowed channel to its service method.
//!
//! Handlers receive the caller's argument list untouched; the first argument
//! is the operation's parameter object where one is expected.

use std::sync::Arc;

use vaultdesk_protocol::ErrorShape;

use crate::gateway::BridgeGateway;

fn first_arg(args: &[serde_json::Value]) -> serde_json::Value {
    args.first().cloned().unwrap_or(serde_json::Value::Null)
}

pub(crate) fn register_vault(gateway: &mut BridgeGateway) {
    gateway.register(
        "vault:get-status",
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.services
                    .vault
                    .get_status()
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vault:get-config",
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.services
                    .vault
                    .get_config()
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vault:get-settings",
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.services
                    .vault
                    .get_settings()
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vault:save-settings",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vault
                    .save_settings(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vault:test-connection",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vault
                    .test_connection(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vault:get-diagnostics",
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.services
                    .vault
                    .get_diagnostics()
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vault:list-backups",
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.services
                    .vault
                    .list_backups()
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vault:create-backup",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vault
                    .create_backup(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vault:restore-backup",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vault
                    .restore_backup(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vault:delete-backup",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vault
                    .delete_backup(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
}

pub(crate) fn register_vercel(gateway: &mut BridgeGateway) {
    gateway.register(
        "vercel:save-token",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vercel
                    .save_token(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vercel:list-projects",
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.services
                    .vercel
                    .list_projects()
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vercel:is-project-available",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vercel
                    .is_project_available(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vercel:create-project",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vercel
                    .create_project(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vercel:connect-existing-project",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vercel
                    .connect_existing_project(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vercel:get-deployments",
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.services
                    .vercel
                    .get_deployments()
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vercel:disconnect",
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.services
                    .vercel
                    .disconnect()
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vercel:test-connection",
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.services
                    .vercel
                    .test_connection()
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
    gateway.register(
        "vercel:deploy",
        Arc::new(|ctx| {
            Box::pin(async move {
                let params = first_arg(&ctx.args);
                ctx.services
                    .vercel
                    .deploy(params)
                    .await
                    .map_err(ErrorShape::from)
            })
        }),
    );
}
