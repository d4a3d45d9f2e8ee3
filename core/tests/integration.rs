//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `AdminClient` over
//! real HTTP through `ReqwestTransport`. The mock's redirect modes reproduce
//! the login, missing-page, unreachable-host and loop cases the classifier
//! has to tell apart.

use mock_server::{Db, RedirectMode, LOGIN_PATH};
use serde_json::json;
use siteadmin_core::{AdminClient, ApiError, ClientConfig, ErrorKind, StatsRange};

async fn start() -> (AdminClient, Db, String) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let db = mock_server::new_db();
    tokio::spawn(mock_server::serve(listener, db.clone()));

    let root = format!("http://{addr}");
    let client = AdminClient::with_reqwest(ClientConfig::new(format!("{root}/"))).unwrap();
    (client, db, root)
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_lifecycle() {
    let (client, db, _) = start().await;

    // Step 1: connection status.
    let status = client.fetch_site_connection_status().await.unwrap();
    assert_eq!(status["isActive"], true);

    // Step 2: modules.
    let modules = client.fetch_modules().await.unwrap();
    assert_eq!(modules["monitor"]["activated"], false);

    client.activate_module("monitor").await.unwrap();
    let monitor = client.fetch_module("monitor").await.unwrap();
    assert_eq!(monitor["activated"], true);

    client.deactivate_module("monitor").await.unwrap();
    assert!(!db.read().await.modules["monitor"].activated);

    // Step 3: module options.
    let updated = client
        .update_module_options("stats", &json!({"admin_bar": true}))
        .await
        .unwrap();
    assert_eq!(updated["options"]["admin_bar"], true);

    // Step 4: settings.
    client.update_settings(&json!({"comment_likes": true})).await.unwrap();
    let settings = client.fetch_settings().await.unwrap();
    assert_eq!(settings["comment_likes"], true);

    // Step 5: double-encoded payloads.
    let site = client.fetch_site_data().await.unwrap();
    assert_eq!(site["plan"]["product_slug"], "jetpack_free");
    let backups = client.get_vault_press_data().await.unwrap();
    assert!(backups["backups"]["last_backup"].is_string());

    // Step 6: stats, healthy then errored.
    let stats = client.fetch_stats_data(StatsRange::Week).await.unwrap();
    assert!(stats.get("week").is_some());
    db.write().await.stats_error = true;
    let stats = client.fetch_stats_data(StatsRange::Week).await.unwrap();
    assert_eq!(stats, json!({}));

    // Step 7: notices, unlink, disconnect.
    client.dismiss_notice("feedback_dash_request").await.unwrap();
    client.unlink_user().await.unwrap();
    client.disconnect_site().await.unwrap();
    let site = db.read().await;
    assert!(!site.connected);
    assert!(!site.user_linked);
    assert_eq!(site.dismissed_notices, vec!["feedback_dash_request".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn direct_failures() {
    let (client, _, _) = start().await;

    let err = client.fetch_module("nope").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Not served by the mock at all.
    let err = client.get_plugin_updates().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = client.update_settings(&json!({"no_such_option": 1})).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid parameter(s): no_such_option (Status 400)");
    assert_eq!(err.payload().unwrap()["code"], "rest_invalid_param");
}

#[tokio::test(flavor = "multi_thread")]
async fn login_redirect_is_json_parse_after_redirect() {
    let (client, db, root) = start().await;
    db.write().await.redirect = RedirectMode::Login;

    let err = client.fetch_site_connection_status().await.unwrap_err();
    match err {
        ApiError::JsonParseAfterRedirect { url } => assert_eq!(url, format!("{root}{LOGIN_PATH}")),
        other => panic!("unexpected error: {other:?}"),
    }

    // 303 turns the POST into a GET of the login page.
    let err = client.activate_module("stats").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::JsonParseAfterRedirect);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_redirect_target_is_not_found_after_redirect() {
    let (client, db, root) = start().await;
    db.write().await.redirect = RedirectMode::Missing;

    let err = client.fetch_module("stats").await.unwrap_err();
    match err {
        ApiError::NotFoundAfterRedirect { url } => assert_eq!(url, format!("{root}/gone")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_redirect_on_post_is_network() {
    let (client, db, _) = start().await;
    db.write().await.redirect = RedirectMode::Unreachable;

    let err = client.unlink_user().await.unwrap_err();
    assert!(matches!(err, ApiError::Network));
    assert!(err.url().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn redirect_loop_is_network_for_post_and_transport_for_get() {
    let (client, db, _) = start().await;
    db.write().await.redirect = RedirectMode::Loop;

    let err = client.update_settings(&json!({"comment_likes": false})).await.unwrap_err();
    assert!(matches!(err, ApiError::Network));

    let err = client.fetch_settings().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
