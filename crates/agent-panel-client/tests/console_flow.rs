#[allow(dead_code)]
mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use tokio::task::LocalSet;

use agent_panel_core::notification::NotificationLevel;
use agent_panel_core::test_helpers::make_timestamp;

use common::{Harness, Reply, TestServer, wait_for};

#[tokio::test]
async fn boot_polls_and_subscribes() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            server.set_status(Reply::Json(json!({
                "agent_running": true,
                "last_update": "2026-01-01T00:00:05",
            })));
            let h = Harness::new(&server.config());

            h.console.boot();
            assert!(wait_for(|| h.console.sync().state().running).await);
            assert_eq!(
                h.console.sync().state().last_update,
                Some(make_timestamp(5))
            );
            assert!(wait_for(|| server.subscribers() == 1).await);
            assert_eq!(server.received_on("/api/status").len(), 1);

            let view = h.status.last().unwrap();
            assert_eq!(view.navbar.label, "Agent Running");
            assert!(view.navbar.stop_visible);
            assert!(view.navbar.last_update_text.unwrap().starts_with("Last update: "));
        })
        .await;
}

#[tokio::test]
async fn poll_reporting_stopped_shows_start_button() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            let h = Harness::new(&server.config());

            let state = h.console.check_status().await;
            assert!(!state.running);
            assert_eq!(state.last_update, None);
            let view = h.status.last().unwrap();
            assert_eq!(view.navbar.label, "Agent Stopped");
            assert!(view.navbar.start_visible);
            assert!(!view.navbar.stop_visible);
            assert_eq!(view.navbar.last_update_text, None);
        })
        .await;
}

#[tokio::test]
async fn poll_failure_shows_stopped() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            let h = Harness::new(&server.config());
            h.console.dispatcher().start_agent(None).await;
            assert!(h.console.sync().state().running);

            server.set_status(Reply::Status(StatusCode::BAD_GATEWAY));
            let state = h.console.check_status().await;
            assert!(!state.running);
            assert_eq!(h.status.last().unwrap().navbar.label, "Agent Stopped");
            assert_eq!(h.notes.shown().len(), 1, "poll failures are not notified");
        })
        .await;
}

#[tokio::test]
async fn start_success_runs_and_notification_expires() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            let mut config = server.config();
            config.notifications.ttl_ms = 200;
            let h = Harness::new(&config);

            let result = h.console.dispatcher().start_agent(Some(30)).await;
            assert!(result.is_success());
            assert_eq!(
                server.received_on("/api/start")[0].body,
                Some(json!({ "interval": 30 }))
            );
            assert_eq!(h.status.last().unwrap().navbar.label, "Agent Running");

            let shown = h.notes.shown();
            assert_eq!(shown.len(), 1);
            assert_eq!(shown[0].level, NotificationLevel::Success);
            assert_eq!(shown[0].text, "Agent started successfully");
            assert_eq!(h.notes.containers_ensured(), 1);

            assert!(wait_for(|| h.notes.shown().is_empty()).await);
            assert!(h.console.notifier().live().is_empty());
        })
        .await;
}

#[tokio::test]
async fn configured_interval_is_the_default() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            let mut config = server.config();
            config.commands.default_interval_minutes = 5;
            let h = Harness::new(&config);

            h.console.dispatcher().start_agent(None).await;
            assert_eq!(
                server.received_on("/api/start")[0].body,
                Some(json!({ "interval": 5 }))
            );
        })
        .await;
}

#[tokio::test]
async fn stop_rejected_keeps_running() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            let h = Harness::new(&server.config());
            h.console.dispatcher().start_agent(None).await;

            server.set_stop(Reply::Json(json!({ "status": "error", "message": "busy" })));
            let result = h.console.dispatcher().stop_agent().await;
            assert!(!result.is_success());
            assert!(h.console.sync().state().running);
            assert_eq!(h.status.last().unwrap().navbar.label, "Agent Running");

            let shown = h.notes.shown();
            let last = shown.last().unwrap();
            assert_eq!(last.level, NotificationLevel::Danger);
            assert_eq!(last.text, "Error stopping agent: busy");
        })
        .await;
}

#[tokio::test]
async fn stop_transport_failure_uses_generic_text() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            server.set_stop(Reply::Status(StatusCode::INTERNAL_SERVER_ERROR));
            let h = Harness::new(&server.config());

            h.console.dispatcher().stop_agent().await;
            assert_eq!(h.notes.texts(), vec!["Error stopping agent"]);
            assert!(!h.console.sync().state().running);
        })
        .await;
}

#[tokio::test]
async fn push_after_poll_wins() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            let h = Harness::new(&server.config());
            h.console.boot();
            assert!(wait_for(|| server.subscribers() == 1).await);
            assert!(wait_for(|| h.status.render_count() == 1).await);
            assert!(!h.console.sync().state().running);

            server.push_agent_update(json!({ "agent_running": true }));
            assert!(wait_for(|| h.console.sync().state().running).await);
            assert_eq!(h.status.last().unwrap().navbar.label, "Agent Running");
        })
        .await;
}

#[tokio::test]
async fn duplicate_starts_each_notify() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            let h = Harness::new(&server.config());

            h.console.dispatcher().spawn_start(None);
            h.console.dispatcher().spawn_start(None);
            assert!(wait_for(|| h.notes.shown().len() == 2).await);
            assert_eq!(server.received_on("/api/start").len(), 2);
            assert!(h.console.sync().state().running);
        })
        .await;
}

#[tokio::test]
async fn manual_dismiss_before_expiry() {
    LocalSet::new()
        .run_until(async {
            let server = TestServer::new().await;
            let mut config = server.config();
            config.notifications.ttl_ms = 150;
            let h = Harness::new(&config);

            h.console.dispatcher().stop_agent().await;
            let id = h.notes.shown()[0].id;
            assert!(h.console.notifier().dismiss(id));
            assert!(h.notes.shown().is_empty());

            tokio::time::sleep(Duration::from_millis(300)).await;
            assert!(!h.console.notifier().dismiss(id));
        })
        .await;
}
