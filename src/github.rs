// GitHub API モジュール - ホスティングAPIの抽象化と実装をまとめたモジュール

pub mod client;
pub mod schemas;

pub use client::GitHubClient;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::ContentOptions;
use crate::credentials::Credentials;
use crate::error::{AuthError, FetchError};

/// 取得対象のファイル位置（リクエストごとに作り、共有設定は書き換えない）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentLocator {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub git_ref: Option<String>,
}

impl ContentLocator {
    pub fn new(options: &ContentOptions, path: &str) -> Self {
        ContentLocator {
            owner: options.owner.clone(),
            repo: options.repo.clone(),
            path: path.to_string(),
            git_ref: options.git_ref.clone(),
        }
    }
}

/// デコード前のファイル内容
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawContent {
    /// 通常はBase64（改行入り）
    pub content: String,
    pub encoding: String,
}

impl RawContent {
    pub fn base64(content: impl Into<String>) -> Self {
        RawContent {
            content: content.into(),
            encoding: "base64".to_string(),
        }
    }
}

/// OAuthトークン発行リクエスト
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationRequest {
    pub client_id: String,
    pub client_secret: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    pub note: String,
}

impl std::fmt::Debug for AuthorizationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationRequest")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("scopes", &self.scopes)
            .field("note", &self.note)
            .finish()
    }
}

/// ホスティングAPIに求める機能
///
/// `authenticate` はハンドル内部の認証状態を書き換え、以降の全リクエストに適用される。
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// 1ファイル分の内容を取得する
    async fn fetch_content(&self, locator: &ContentLocator) -> Result<RawContent, FetchError>;

    fn authenticate(&self, credentials: Credentials);

    /// 現在の（Basic）認証でOAuthトークンを発行し、トークン文字列を返す
    async fn create_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<String, AuthError>;
}
