// エラー型定義
//
// 設定読み込み・認証・取得・デコードの各段階ごとにエラー型を分けている。
// どのエラーもプロセスを終了させず、呼び出し元へ返すだけ。

use chrono::{DateTime, Utc};
use thiserror::Error;

/// カスタム設定ファイルの読み込みエラー（呼び出し側でデフォルト設定にフォールバックする）
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("設定ファイルを読み込めません: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("設定ファイルの解析に失敗しました: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("設定ファイルに githubapi セクションがありません: {0}")]
    MissingSection(String),

    #[error("バイナリ判定パターンが不正です: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// 空のパターンは全てのパスにマッチしてしまう
    #[error("バイナリ判定パターンが空です")]
    EmptyPattern,
}

/// 認証エラー
#[derive(Debug, Error)]
pub enum AuthError {
    /// ユーザー名・パスワード、またはクライアントID・シークレットが揃っていない
    #[error("認証情報が不足しています: {0}")]
    MissingCredentials(&'static str),

    /// auth.type が basic / oauth 以外、または未設定
    #[error("未対応の認証タイプです: {0:?}")]
    UnsupportedType(Option<String>),

    /// トークン発行リクエストの失敗
    #[error("OAuthトークンの発行に失敗しました: {0}")]
    Exchange(String),
}

/// コンテンツ取得エラー
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("取得パスが空です")]
    EmptyPath,

    #[error("見つかりません: {0}")]
    NotFound(String),

    #[error("認証に失敗しました (HTTP 401)")]
    Unauthorized,

    #[error("アクセスが拒否されました: {0}")]
    Forbidden(String),

    /// 未認証時は特に早く到達する
    #[error("APIレート制限に達しました (リセット: {reset_at:?})")]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("ファイルではありません: {0}")]
    NotAFile(String),

    #[error("HTTPエラー: ステータス {status}, レスポンス: {body}")]
    Http { status: u16, body: String },

    #[error("ネットワークエラー: {0}")]
    Network(String),
}

impl FetchError {
    /// 時間をおいて再試行すれば成功しうるエラーかどうか
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::RateLimited { .. } => true,
            FetchError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(e.to_string())
    }
}

/// デコードエラー（壊れたデータを黙って渡さないためのもの）
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("未対応のエンコーディングです: {0}")]
    UnsupportedEncoding(String),

    #[error("Base64のデコードに失敗しました: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("UTF-8として解釈できません: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("テキストではなくバイナリとしてデコードされました: {0}")]
    NotText(String),

    #[error("JSONの解析に失敗しました: {0}")]
    Json(#[from] serde_json::Error),
}

/// コンテンツ取得の呼び出し元に返すエラー
#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ContentError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ContentError::Fetch(e) if e.is_retryable())
    }
}
