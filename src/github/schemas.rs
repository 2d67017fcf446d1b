// GitHub API 応答に関するスキーマ

use serde::Deserialize;

/// コンテンツAPI応答（ファイル）
#[derive(Clone, Debug, Deserialize)]
pub struct GitHubContent {
    /// 1MBを超えるファイルでは空になり、encoding は "none" になる
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

/// コンテンツAPIはパスがディレクトリだと配列を返す
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ContentsResponse {
    Directory(Vec<serde_json::Value>),
    File(GitHubContent),
}

/// トークン発行API応答
#[derive(Clone, Debug, Deserialize)]
pub struct AuthorizationResponse {
    pub token: String,
}
