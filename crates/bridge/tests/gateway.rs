//! End-to-end gateway behavior against counting stub services.
//!
//! The stubs stand in for the host dispatcher: every test that rejects a
//! channel also asserts the stubs observed zero calls, since rejection must
//! happen before any privileged operation is reached.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use {
    async_trait::async_trait,
    serde_json::{Value, json},
};

use {
    vaultdesk_bridge::{BridgeGateway, BridgeServices},
    vaultdesk_protocol::{RequestFrame, error_codes},
    vaultdesk_service_traits::{ServiceResult, VaultService, VercelService},
};

#[derive(Default)]
struct CountingVault {
    calls: AtomicUsize,
    fail_create_backup: bool,
}

impl CountingVault {
    fn failing() -> Self {
        Self {
            fail_create_backup: true,
            ..Self::default()
        }
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VaultService for CountingVault {
    async fn get_status(&self) -> ServiceResult {
        self.hit();
        Ok(json!({ "running": true }))
    }

    async fn get_config(&self) -> ServiceResult {
        self.hit();
        Ok(json!({}))
    }

    async fn get_settings(&self) -> ServiceResult {
        self.hit();
        Ok(json!({}))
    }

    async fn save_settings(&self, params: Value) -> ServiceResult {
        self.hit();
        Ok(params)
    }

    async fn test_connection(&self, _params: Value) -> ServiceResult {
        self.hit();
        Ok(json!({ "ok": true }))
    }

    async fn get_diagnostics(&self) -> ServiceResult {
        self.hit();
        Ok(json!([]))
    }

    async fn list_backups(&self) -> ServiceResult {
        self.hit();
        Ok(json!([]))
    }

    async fn create_backup(&self, _params: Value) -> ServiceResult {
        self.hit();
        if self.fail_create_backup {
            return Err("disk full".into());
        }
        Ok(json!({ "ok": true }))
    }

    async fn restore_backup(&self, _params: Value) -> ServiceResult {
        self.hit();
        Ok(json!({ "ok": true }))
    }

    async fn delete_backup(&self, _params: Value) -> ServiceResult {
        self.hit();
        Ok(json!({ "ok": true }))
    }
}

#[derive(Default)]
struct CountingVercel {
    calls: AtomicUsize,
    last_deploy_params: Mutex<Option<Value>>,
}

impl CountingVercel {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VercelService for CountingVercel {
    async fn save_token(&self, _params: Value) -> ServiceResult {
        self.hit();
        Ok(json!({ "ok": true }))
    }

    async fn list_projects(&self) -> ServiceResult {
        self.hit();
        Ok(json!([]))
    }

    async fn is_project_available(&self, _params: Value) -> ServiceResult {
        self.hit();
        Ok(json!({ "available": true }))
    }

    async fn create_project(&self, _params: Value) -> ServiceResult {
        self.hit();
        Ok(json!({ "ok": true }))
    }

    async fn connect_existing_project(&self, _params: Value) -> ServiceResult {
        self.hit();
        Ok(json!({ "ok": true }))
    }

    async fn get_deployments(&self) -> ServiceResult {
        self.hit();
        Ok(json!([]))
    }

    async fn disconnect(&self) -> ServiceResult {
        self.hit();
        Ok(json!({ "ok": true }))
    }

    async fn test_connection(&self) -> ServiceResult {
        self.hit();
        Ok(json!({ "ok": true }))
    }

    async fn deploy(&self, params: Value) -> ServiceResult {
        self.hit();
        *self.last_deploy_params.lock().unwrap() = Some(params);
        Ok(json!({ "deployed": true }))
    }
}

fn gateway_with(vault: Arc<CountingVault>, vercel: Arc<CountingVercel>) -> BridgeGateway {
    BridgeGateway::new(
        BridgeServices::default()
            .with_vault(vault)
            .with_vercel(vercel),
    )
}

#[tokio::test]
async fn allowed_channel_returns_dispatcher_result_unchanged() {
    let vault = Arc::new(CountingVault::default());
    let vercel = Arc::new(CountingVercel::default());
    let gateway = gateway_with(vault.clone(), vercel);

    let result = gateway.invoke("vault:get-status", vec![]).await.unwrap();
    assert_eq!(result, json!({ "running": true }));
    assert_eq!(vault.count(), 1);
}

#[tokio::test]
async fn dispatcher_failure_propagates_unchanged() {
    let vault = Arc::new(CountingVault::failing());
    let vercel = Arc::new(CountingVercel::default());
    let gateway = gateway_with(vault.clone(), vercel);

    let err = gateway
        .invoke("vault:create-backup", vec![])
        .await
        .unwrap_err();
    assert_eq!(err.message, "disk full");
    assert_eq!(err.code, error_codes::UNAVAILABLE);
    assert!(!err.is_validation());
    assert_eq!(vault.count(), 1);
}

#[tokio::test]
async fn unknown_channel_never_reaches_dispatcher() {
    let vault = Arc::new(CountingVault::default());
    let vercel = Arc::new(CountingVercel::default());
    let gateway = gateway_with(vault.clone(), vercel.clone());

    let err = gateway.invoke("not:a:channel", vec![]).await.unwrap_err();
    assert_eq!(err.code, error_codes::INVALID_CHANNEL);
    assert!(err.message.contains("Invalid channel: not:a:channel"));
    assert_eq!(vault.count(), 0);
    assert_eq!(vercel.count(), 0);
}

#[tokio::test]
async fn near_miss_channel_is_rejected() {
    let vault = Arc::new(CountingVault::default());
    let vercel = Arc::new(CountingVercel::default());
    let gateway = gateway_with(vault.clone(), vercel.clone());

    for channel in ["vault:get-statuses", "vault:delete-everything", "vercel:dep"] {
        let err = gateway.invoke(channel, vec![]).await.unwrap_err();
        assert!(
            err.message.contains(&format!("Invalid channel: {channel}")),
            "unexpected message: {}",
            err.message
        );
    }
    assert_eq!(vault.count(), 0);
    assert_eq!(vercel.count(), 0);
}

#[tokio::test]
async fn deploy_forwards_params_verbatim() {
    let vault = Arc::new(CountingVault::default());
    let vercel = Arc::new(CountingVercel::default());
    let gateway = gateway_with(vault, vercel.clone());

    let params = json!({ "projectId": "abc" });
    let result = gateway
        .invoke("vercel:deploy", vec![params.clone()])
        .await
        .unwrap();
    assert_eq!(result, json!({ "deployed": true }));
    assert_eq!(*vercel.last_deploy_params.lock().unwrap(), Some(params));
}

#[tokio::test]
async fn args_pass_through_unmodified() {
    let vault = Arc::new(CountingVault::default());
    let vercel = Arc::new(CountingVercel::default());
    let gateway = gateway_with(vault, vercel);

    let settings = json!({ "backupInterval": 3600, "nested": { "deep": [1, 2, 3] } });
    let echoed = gateway
        .invoke("vault:save-settings", vec![settings.clone()])
        .await
        .unwrap();
    assert_eq!(echoed, settings);
}

#[tokio::test]
async fn concurrent_calls_resolve_independently() {
    let vault = Arc::new(CountingVault::default());
    let vercel = Arc::new(CountingVercel::default());
    let gateway = gateway_with(vault.clone(), vercel);

    let (allowed, rejected) = tokio::join!(
        gateway.invoke("vault:get-status", vec![]),
        gateway.invoke("vault:delete-everything", vec![]),
    );

    assert_eq!(allowed.unwrap(), json!({ "running": true }));
    let err = rejected.unwrap_err();
    assert_eq!(err.code, error_codes::INVALID_CHANNEL);
    assert_eq!(vault.count(), 1);
}

#[tokio::test]
async fn send_dispatches_after_validation() {
    let vault = Arc::new(CountingVault::default());
    let vercel = Arc::new(CountingVercel::default());
    let gateway = gateway_with(vault.clone(), vercel.clone());

    gateway.send("vault:create-backup", vec![]).unwrap();
    tokio::time::timeout(Duration::from_secs(2), async {
        while vault.count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    let err = gateway.send("arbitrary:channel", vec![]).unwrap_err();
    assert_eq!(err.code, error_codes::INVALID_CHANNEL);
    assert_eq!(vercel.count(), 0);
}

#[tokio::test]
async fn subscription_delivers_until_unsubscribed() {
    let gateway = BridgeGateway::default();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    let sub = gateway
        .on(
            "vault:get-status",
            Arc::new(move |payload| sink.lock().unwrap().push(payload)),
        )
        .await
        .unwrap();
    assert_eq!(sub.channel(), "vault:get-status");

    assert_eq!(gateway.emit("vault:get-status", json!({ "running": true })).await, 1);
    assert_eq!(gateway.emit("vault:get-status", json!({ "running": false })).await, 1);
    assert_eq!(seen.lock().unwrap().len(), 2);

    sub.unsubscribe().await;
    assert_eq!(gateway.emit("vault:get-status", json!({})).await, 0);
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn handle_frame_echoes_request_id() {
    let vault = Arc::new(CountingVault::default());
    let vercel = Arc::new(CountingVercel::default());
    let gateway = gateway_with(vault, vercel);

    let ok = gateway
        .handle_frame(RequestFrame::new("req-1", "vault:get-status", vec![]))
        .await;
    assert_eq!(ok.id, "req-1");
    assert!(ok.ok);
    assert_eq!(ok.payload, Some(json!({ "running": true })));

    let err = gateway
        .handle_frame(RequestFrame::new("req-2", "not:a:channel", vec![]))
        .await;
    assert_eq!(err.id, "req-2");
    assert!(!err.ok);
    let shape = err.error.unwrap();
    assert_eq!(shape.code, error_codes::INVALID_CHANNEL);
    assert!(shape.message.contains("Invalid channel: not:a:channel"));
}
