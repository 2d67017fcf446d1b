// 設定ファイル → 認証 → 取得 → デコード → ナビゲーション の一連の流れを
// モックサーバーに対して確認する

use std::fs;

use gh_content::config::{self, Config};
use gh_content::{
    AuthMethod, ContentContext, ContentError, ContentKind, CredentialEnv, DecodedContent,
    FetchError, NavigationStore,
};
use serde_json::json;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path, base_url: &str, auth: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(config::DEFAULT_CONFIG_FILE);
    let body = json!({
        "githubapi": {
            "auth": auth,
            "apiOptions": { "baseUrl": base_url, "timeoutMs": 2000 },
            "contentOptions": { "owner": "site", "repo": "content", "ref": "main" }
        }
    });
    fs::write(&path, body.to_string()).unwrap();
    path
}

#[tokio::test]
async fn test_navigation_with_token_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/site/content/contents/main.json")
        .match_query(mockito::Matcher::UrlEncoded("ref".into(), "main".into()))
        .match_header("authorization", "token abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "type": "file", "encoding": "base64", "content": "eyJuYXYiOlsi\nYSIsImIiXX0=\n" }"#)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        &server.url(),
        json!({ "type": "oauth", "token": "abc123" }),
    );

    let config = config::resolve_from_file(Config::default(), &path);
    assert_eq!(config.content_options.owner, "site");
    assert_eq!(config.api_options.timeout_ms, 2000);

    let ctx = ContentContext::github(config).unwrap();
    let method = ctx.authorise(&CredentialEnv::default()).await.unwrap();
    assert_eq!(method, AuthMethod::OAuthToken);

    let store = NavigationStore::default();
    let nav = ctx.get_nav(&store).await.unwrap();

    assert_eq!(nav, json!({ "nav": ["a", "b"] }));
    assert_eq!(store.get(), Some(json!({ "nav": ["a", "b"] })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_oauth_exchange_then_fetch_image() {
    let mut server = mockito::Server::new_async().await;
    let exchange = server
        .mock("POST", "/authorizations")
        .match_header("authorization", "Basic dTpw")
        .with_status(201)
        .with_body(r#"{ "id": 7, "token": "issued" }"#)
        .create_async()
        .await;
    let image = server
        .mock("GET", "/repos/site/content/contents/assets/img/dot.gif")
        .match_query(mockito::Matcher::Any)
        .match_header("authorization", "token issued")
        .with_status(200)
        .with_body(r#"{ "encoding": "base64", "content": "R0lGODlhAQABAAAAACw=" }"#)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        &server.url(),
        json!({ "type": "oauth", "username": "u", "password": "p", "scope": "repo" }),
    );
    let ctx = ContentContext::github(config::resolve_from_file(Config::default(), &path)).unwrap();

    let env = CredentialEnv {
        client_id: Some("id".to_string()),
        client_secret: Some("secret".to_string()),
        ..CredentialEnv::default()
    };
    assert_eq!(ctx.authorise(&env).await.unwrap(), AuthMethod::OAuthExchange);
    assert!(ctx.api().is_authenticated());

    let content = ctx.get_content("assets/img/dot.gif").await.unwrap();
    assert_eq!(content.kind(), ContentKind::Binary);
    assert!(content.as_bytes().starts_with(b"GIF89a"));

    exchange.assert_async().await;
    image.assert_async().await;
}

#[tokio::test]
async fn test_unauthenticated_fetch_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/site/content/contents/missing.md")
        .match_query(mockito::Matcher::Any)
        .with_status(404)
        .with_body(r#"{ "message": "Not Found" }"#)
        .create_async()
        .await;
    server
        .mock("GET", "/repos/site/content/contents/README.md")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{ "encoding": "base64", "content": "IyBoZWxsbw==" }"#)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), &server.url(), json!({}));
    let ctx = ContentContext::github(config::resolve_from_file(Config::default(), &path)).unwrap();

    // 認証タイプ未設定なら未認証のまま使える
    assert!(ctx.authorise(&CredentialEnv::default()).await.is_err());
    assert!(!ctx.api().is_authenticated());

    let readme = ctx.get_content("README.md").await.unwrap();
    assert_eq!(readme, DecodedContent::Text("# hello".to_string()));

    match ctx.get_content("missing.md").await {
        Err(ContentError::Fetch(e)) => assert!(matches!(e, FetchError::NotFound(_))),
        other => panic!("unexpected result: {:?}", other),
    }
}
