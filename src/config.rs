// 設定の解決
//
// 組み込みのデフォルト設定に、任意のカスタム設定ファイル（JSON）の githubapi
// セクションを重ねて実効設定を作る。カスタム設定が読めない場合はデフォルトのまま使う。

use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::error::ConfigError;

/// カスタム設定ファイルのデフォルトパス（作業ディレクトリからの相対パス）
pub const DEFAULT_CONFIG_FILE: &str = "gh-content.json";

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_API_VERSION: &str = "3.0.0";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_OWNER: &str = "mattstyles";
pub const DEFAULT_REPO: &str = "vpf-def";
pub const DEFAULT_BINARY_PATTERN: &str = "img";

/// OAuthスコープ。カンマ区切り文字列と配列のどちらでも書ける
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scope {
    Joined(String),
    List(Vec<String>),
}

impl Scope {
    /// スコープ識別子の一覧（前後の空白を除き、空要素は捨てる）
    pub fn to_list(&self) -> Vec<String> {
        let items: Vec<&str> = match self {
            Scope::Joined(s) => s.split(',').collect(),
            Scope::List(v) => v.iter().map(String::as_str).collect(),
        };
        items
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// 認証設定。すべて任意で、None は「未指定」を意味する
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOptions {
    /// "basic" または "oauth"
    #[serde(rename = "type")]
    pub auth_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub scope: Option<Scope>,
    /// 発行済みのOAuthトークン（あればトークン発行を省略する）
    pub token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl AuthOptions {
    fn overlay(self, custom: AuthOptions) -> Self {
        AuthOptions {
            auth_type: custom.auth_type.or(self.auth_type),
            username: custom.username.or(self.username),
            password: custom.password.or(self.password),
            scope: custom.scope.or(self.scope),
            token: custom.token.or(self.token),
            client_id: custom.client_id.or(self.client_id),
            client_secret: custom.client_secret.or(self.client_secret),
        }
    }
}

/// APIクライアントに渡すオプション
#[derive(Clone, Debug, PartialEq)]
pub struct ApiOptions {
    pub api_version: String,
    pub timeout_ms: u64,
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ApiOptions {
    fn default() -> Self {
        ApiOptions {
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("gh-content/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// 取得対象のリポジトリ
#[derive(Clone, Debug, PartialEq)]
pub struct ContentOptions {
    pub owner: String,
    pub repo: String,
    /// 既定の取得パス。取得ごとのパスは引数で渡すので、ここは書き換えない
    pub path: Option<String>,
    /// ブランチ・タグ・コミット（未指定ならリポジトリのデフォルトブランチ）
    pub git_ref: Option<String>,
    /// パスがこの正規表現にマッチしたらバイナリとしてデコードする（空ならデフォルト）
    pub binary_pattern: String,
}

impl Default for ContentOptions {
    fn default() -> Self {
        ContentOptions {
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            path: None,
            git_ref: None,
            binary_pattern: DEFAULT_BINARY_PATTERN.to_string(),
        }
    }
}

/// 実効設定
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub auth: AuthOptions,
    pub api_options: ApiOptions,
    pub content_options: ContentOptions,
}

// カスタム設定ファイル側の型（全フィールド任意）

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomApiOptions {
    pub api_version: Option<String>,
    pub timeout_ms: Option<u64>,
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomContentOptions {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub binary_pattern: Option<String>,
}

/// カスタム設定ファイルの githubapi セクション
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomConfig {
    #[serde(default)]
    pub auth: AuthOptions,
    #[serde(default)]
    pub api_options: CustomApiOptions,
    #[serde(default)]
    pub content_options: CustomContentOptions,
}

#[derive(Debug, Deserialize)]
struct CustomConfigFile {
    githubapi: Option<CustomConfig>,
}

impl Config {
    /// カスタム設定を重ねる。セクションごとに、指定のあるフィールドだけ上書きする
    pub fn overlay(self, custom: CustomConfig) -> Config {
        let api = custom.api_options;
        let content = custom.content_options;

        Config {
            auth: self.auth.overlay(custom.auth),
            api_options: ApiOptions {
                api_version: api.api_version.unwrap_or(self.api_options.api_version),
                timeout_ms: api.timeout_ms.unwrap_or(self.api_options.timeout_ms),
                base_url: api.base_url.unwrap_or(self.api_options.base_url),
                user_agent: api.user_agent.unwrap_or(self.api_options.user_agent),
            },
            content_options: ContentOptions {
                owner: content.owner.unwrap_or(self.content_options.owner),
                repo: content.repo.unwrap_or(self.content_options.repo),
                path: content.path.or(self.content_options.path),
                git_ref: content.git_ref.or(self.content_options.git_ref),
                binary_pattern: content
                    .binary_pattern
                    .unwrap_or(self.content_options.binary_pattern),
            },
        }
    }
}

/// カスタム設定ファイルを読み込み、githubapi セクションを返す
pub fn load_custom_config(path: impl AsRef<Path>) -> Result<CustomConfig, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    let file: CustomConfigFile =
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display.clone(),
            source,
        })?;

    file.githubapi.ok_or(ConfigError::MissingSection(display))
}

/// 実効設定を作る。ローダーが失敗した場合はデフォルト設定をそのまま返す
pub fn resolve<F>(defaults: Config, loader: F) -> Config
where
    F: FnOnce() -> Result<CustomConfig, ConfigError>,
{
    match loader() {
        Ok(custom) => {
            info!("⚙️ カスタム設定を使用します");
            defaults.overlay(custom)
        }
        Err(e) => {
            warn!("⚠️ カスタム設定を読み込めないため、デフォルト設定を使用します: {}", e);
            defaults
        }
    }
}

/// ファイルから読み込むローダーで `resolve` する
pub fn resolve_from_file(defaults: Config, path: impl AsRef<Path>) -> Config {
    let path = path.as_ref();
    resolve(defaults, || load_custom_config(path))
}
