// ナビゲーションの読み込み
//
// リポジトリ直下の main.json を取得・解析し、ホスト側のストアに渡す。

use std::sync::{Arc, RwLock};

use log::{error, info};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::context::ContentContext;
use crate::error::{ContentError, DecodeError};
use crate::github::HostingApi;

/// ナビゲーション定義のファイル名
pub const NAV_FILE: &str = "main.json";

/// 解析済みナビゲーションの受け取り先
pub trait NavigationSink: Send + Sync {
    fn publish(&self, nav: Value);
}

/// スレッドセーフなインメモリのナビゲーションストア
#[derive(Clone, Debug, Default)]
pub struct NavigationStore {
    inner: Arc<RwLock<Option<Value>>>,
}

impl NavigationStore {
    pub fn get(&self) -> Option<Value> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl NavigationSink for NavigationStore {
    fn publish(&self, nav: Value) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(nav);
    }
}

/// main.json を取得して解析し、sink に渡す
pub async fn load_navigation<A>(
    ctx: &ContentContext<A>,
    sink: &dyn NavigationSink,
) -> Result<Value, ContentError>
where
    A: HostingApi,
{
    let content = ctx.get_content(NAV_FILE).await.inspect_err(|e| {
        error!("❌ ナビゲーションを取得できません: {}", e);
    })?;

    let text = content.into_text(NAV_FILE)?;
    let nav: Value = serde_json::from_str(&text)
        .map_err(DecodeError::from)
        .inspect_err(|e| {
            error!("❌ ナビゲーションの解析に失敗しました: {}", e);
        })?;

    info!("🧭 ナビゲーションを読み込みました");
    sink.publish(nav.clone());
    Ok(nav)
}

/// 結果を待たずにナビゲーションを読み込む（失敗はログに出すだけ）
pub fn spawn_navigation_load<A>(
    ctx: Arc<ContentContext<A>>,
    sink: Arc<dyn NavigationSink>,
) -> JoinHandle<()>
where
    A: HostingApi + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = load_navigation(&ctx, sink.as_ref()).await {
            error!("❌ ナビゲーションの読み込みに失敗しました: {}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::FetchError;
    use crate::testing::FakeApi;
    use serde_json::json;

    // {"nav":["a","b"]}
    const NAV_BASE64: &str = "eyJuYXYiOlsiYSIsImIiXX0=";

    #[tokio::test]
    async fn test_load_navigation_publishes_parsed_object() {
        let ctx = ContentContext::new(
            Config::default(),
            FakeApi::default().with_file(NAV_FILE, NAV_BASE64),
        );
        let store = NavigationStore::default();

        let nav = ctx.get_nav(&store).await.unwrap();

        assert_eq!(nav, json!({ "nav": ["a", "b"] }));
        assert_eq!(store.get(), Some(json!({ "nav": ["a", "b"] })));
        assert_eq!(ctx.api().fetched()[0].path, NAV_FILE);
    }

    #[tokio::test]
    async fn test_load_navigation_with_empty_binary_pattern() {
        let mut config = Config::default();
        config.content_options.binary_pattern = String::new();
        let ctx = ContentContext::new(config, FakeApi::default().with_file(NAV_FILE, NAV_BASE64));

        let nav = ctx.get_nav(&NavigationStore::default()).await.unwrap();
        assert_eq!(nav, json!({ "nav": ["a", "b"] }));
    }

    #[tokio::test]
    async fn test_load_navigation_fetch_failure_publishes_nothing() {
        let ctx = ContentContext::new(Config::default(), FakeApi::default());
        let store = NavigationStore::default();

        let result = load_navigation(&ctx, &store).await;

        assert!(matches!(
            result,
            Err(ContentError::Fetch(FetchError::NotFound(_)))
        ));
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_load_navigation_parse_failure() {
        // "{nav:" (不正なJSON)
        let ctx = ContentContext::new(
            Config::default(),
            FakeApi::default().with_file(NAV_FILE, "e25hdjo="),
        );
        let store = NavigationStore::default();

        let result = load_navigation(&ctx, &store).await;

        assert!(matches!(
            result,
            Err(ContentError::Decode(DecodeError::Json(_)))
        ));
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_spawn_navigation_load() {
        let ctx = Arc::new(ContentContext::new(
            Config::default(),
            FakeApi::default().with_file(NAV_FILE, NAV_BASE64),
        ));
        let store = NavigationStore::default();

        spawn_navigation_load(ctx, Arc::new(store.clone()))
            .await
            .unwrap();

        assert_eq!(store.get(), Some(json!({ "nav": ["a", "b"] })));
    }

    #[tokio::test]
    async fn test_spawn_navigation_load_failure_does_not_panic() {
        let ctx = Arc::new(ContentContext::new(
            Config::default(),
            FakeApi {
                offline: true,
                ..FakeApi::default()
            },
        ));
        let store = NavigationStore::default();

        assert!(spawn_navigation_load(ctx, Arc::new(store.clone())).await.is_ok());
        assert_eq!(store.get(), None);
    }
}
