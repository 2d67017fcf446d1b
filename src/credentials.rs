// 認証方式の選択と認証情報の組み立て
//
// 値の優先順位はどのフィールドでも 環境変数 > 設定ファイル > デフォルト。
// oauth でトークン未設定の場合は、Basic認証でトークンを発行してから認証し直す。

use log::{error, info, warn};

use crate::config::AuthOptions;
use crate::error::AuthError;
use crate::github::{AuthorizationRequest, HostingApi};

pub const ENV_USERNAME: &str = "GH_USERNAME";
pub const ENV_PASSWORD: &str = "GH_PASSWORD";
pub const ENV_CLIENT_ID: &str = "GH_OAUTH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GH_OAUTH_CLIENT_SECRET";

/// トークン発行時に付けるメモ
pub const AUTHORIZATION_NOTE: &str = "gh-content";

/// APIハンドルに渡す認証情報（保存はしない）
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    OAuth { token: String },
}

// パスワード・トークンをログに出さない
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::OAuth { .. } => f.debug_struct("OAuth").field("token", &"***").finish(),
        }
    }
}

/// 環境変数から取った認証情報
#[derive(Clone, Debug, Default)]
pub struct CredentialEnv {
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl CredentialEnv {
    pub fn from_process() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        CredentialEnv {
            username: var(ENV_USERNAME),
            password: var(ENV_PASSWORD),
            client_id: var(ENV_CLIENT_ID),
            client_secret: var(ENV_CLIENT_SECRET),
        }
    }
}

/// 最初に見つかった値を返す。空文字列は未指定として扱う
pub fn resolve_value(
    env: Option<&str>,
    config: Option<&str>,
    default: Option<&str>,
) -> Option<String> {
    [env, config, default]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthType {
    Basic,
    OAuth,
}

impl AuthType {
    pub fn parse(s: &str) -> Option<AuthType> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(AuthType::Basic),
            "oauth" => Some(AuthType::OAuth),
            _ => None,
        }
    }
}

/// 認証に成功した方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    Basic,
    /// 設定済みトークンをそのまま使用
    OAuthToken,
    /// Basic認証でトークンを発行して使用
    OAuthExchange,
}

/// Basic認証の認証情報を組み立てる
pub fn basic_credentials(
    auth: &AuthOptions,
    env: &CredentialEnv,
) -> Result<Credentials, AuthError> {
    let username = resolve_value(env.username.as_deref(), auth.username.as_deref(), None)
        .ok_or(AuthError::MissingCredentials("username"))?;
    let password = resolve_value(env.password.as_deref(), auth.password.as_deref(), None)
        .ok_or(AuthError::MissingCredentials("password"))?;

    Ok(Credentials::Basic { username, password })
}

/// OAuthトークン発行リクエストを組み立てる
pub fn authorization_request(
    auth: &AuthOptions,
    env: &CredentialEnv,
) -> Result<AuthorizationRequest, AuthError> {
    let client_id = resolve_value(env.client_id.as_deref(), auth.client_id.as_deref(), None)
        .ok_or(AuthError::MissingCredentials("client id"))?;
    let client_secret =
        resolve_value(env.client_secret.as_deref(), auth.client_secret.as_deref(), None)
            .ok_or(AuthError::MissingCredentials("client secret"))?;

    Ok(AuthorizationRequest {
        client_id,
        client_secret,
        scopes: auth.scope.as_ref().map(|s| s.to_list()).unwrap_or_default(),
        note: AUTHORIZATION_NOTE.to_string(),
    })
}

/// 設定された方式でAPIハンドルを認証する
///
/// 失敗してもハンドルは未認証のまま使える（レート制限は厳しくなる）。
pub async fn authorise<A>(
    auth: &AuthOptions,
    env: &CredentialEnv,
    api: &A,
) -> Result<AuthMethod, AuthError>
where
    A: HostingApi + ?Sized,
{
    match auth.auth_type.as_deref().and_then(AuthType::parse) {
        Some(AuthType::Basic) => {
            info!("🔐 Basic認証を使用します");
            let credentials = basic_credentials(auth, env).inspect_err(|e| {
                warn!("⚠️ Basic認証に失敗しました: {}", e);
            })?;
            api.authenticate(credentials);
            Ok(AuthMethod::Basic)
        }
        Some(AuthType::OAuth) => {
            info!("🔐 OAuth認証を使用します");
            authorise_oauth(auth, env, api).await
        }
        None => {
            warn!(
                "⚠️ 認証タイプが正しくありません ({:?})。未認証でアクセスします",
                auth.auth_type
            );
            Err(AuthError::UnsupportedType(auth.auth_type.clone()))
        }
    }
}

async fn authorise_oauth<A>(
    auth: &AuthOptions,
    env: &CredentialEnv,
    api: &A,
) -> Result<AuthMethod, AuthError>
where
    A: HostingApi + ?Sized,
{
    if let Some(token) = resolve_value(None, auth.token.as_deref(), None) {
        api.authenticate(Credentials::OAuth { token });
        return Ok(AuthMethod::OAuthToken);
    }

    // トークン発行にはBasic認証が必要
    let basic = basic_credentials(auth, env).inspect_err(|e| {
        warn!("⚠️ OAuthにはBasic認証が必要ですが、失敗しました: {}", e);
    })?;
    let request = authorization_request(auth, env).inspect_err(|e| {
        warn!("⚠️ OAuthアプリの認証情報がありません: {}", e);
    })?;
    api.authenticate(basic);

    let token = api.create_authorization(&request).await.inspect_err(|e| {
        error!("❌ OAuth認証エラー: {} (リクエスト: {:?})", e, request);
    })?;

    info!("✅ OAuthでの認証に成功しました");
    api.authenticate(Credentials::OAuth { token });
    Ok(AuthMethod::OAuthExchange)
}
