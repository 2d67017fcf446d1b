// 起動時に一度だけ作るコンテキスト
//
// 実効設定・APIハンドル・デコーダーをまとめて持ち、各処理に参照で渡す。

use serde_json::Value;

use crate::config::Config;
use crate::credentials::{self, AuthMethod, CredentialEnv};
use crate::decoder::{ContentDecoder, DecodedContent};
use crate::error::{AuthError, ContentError, FetchError};
use crate::fetcher;
use crate::github::{GitHubClient, HostingApi};
use crate::nav::{self, NavigationSink};

pub struct ContentContext<A> {
    config: Config,
    api: A,
    decoder: ContentDecoder,
}

impl ContentContext<GitHubClient> {
    /// 設定の apiOptions でGitHubクライアントを作る
    pub fn github(config: Config) -> Result<Self, FetchError> {
        let api = GitHubClient::new(&config.api_options)?;
        Ok(ContentContext::new(config, api))
    }
}

impl<A: HostingApi> ContentContext<A> {
    pub fn new(config: Config, api: A) -> Self {
        let decoder = ContentDecoder::from_options(&config.content_options);
        ContentContext {
            config,
            api,
            decoder,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 並行取得を始める前に一度だけ呼ぶ
    pub async fn authorise(&self, env: &CredentialEnv) -> Result<AuthMethod, AuthError> {
        credentials::authorise(&self.config.auth, env, &self.api).await
    }

    pub async fn get_content(&self, path: &str) -> Result<DecodedContent, ContentError> {
        fetcher::get_content(&self.api, &self.config.content_options, &self.decoder, path).await
    }

    pub async fn get_nav(&self, sink: &dyn NavigationSink) -> Result<Value, ContentError> {
        nav::load_navigation(self, sink).await
    }
}
