// gh-content - GitHubリポジトリからコンテンツを配信するアダプタ
//
// 設定されたリポジトリから1ファイルずつ取得し、テキストまたはバイナリにデコードする。
// 必要に応じて環境変数・設定ファイルの認証情報でGitHub APIに認証する。

pub mod config;
pub mod context;
pub mod credentials;
pub mod decoder;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod nav;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use context::ContentContext;
pub use credentials::{AuthMethod, CredentialEnv, Credentials};
pub use decoder::{ContentDecoder, ContentKind, DecodedContent};
pub use error::{AuthError, ConfigError, ContentError, DecodeError, FetchError};
pub use github::{GitHubClient, HostingApi};
pub use nav::{NavigationSink, NavigationStore};
