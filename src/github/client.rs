// GitHubクライアント（reqwest実装）

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, info};
use reqwest::{RequestBuilder, Response, header};

use super::schemas::{AuthorizationResponse, ContentsResponse};
use super::{AuthorizationRequest, ContentLocator, HostingApi, RawContent};
use crate::config::ApiOptions;
use crate::credentials::Credentials;
use crate::error::{AuthError, FetchError};

// ハンドルが保持する認証状態
enum ApiAuth {
    Anonymous,
    Basic { username: String, password: String },
    Token(String),
}

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    accept: String,
    auth: RwLock<ApiAuth>,
}

impl GitHubClient {
    pub fn new(options: &ApiOptions) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(options.user_agent.as_str());
        if let Some(timeout) = request_timeout(options.timeout_ms) {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(GitHubClient {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            accept: media_type(&options.api_version),
            auth: RwLock::new(ApiAuth::Anonymous),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        let auth = self.auth.read().unwrap_or_else(|e| e.into_inner());
        !matches!(*auth, ApiAuth::Anonymous)
    }

    // 現在の認証状態をリクエストに付与する
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(header::ACCEPT, &self.accept);
        let auth = self.auth.read().unwrap_or_else(|e| e.into_inner());
        match &*auth {
            ApiAuth::Anonymous => request,
            ApiAuth::Basic { username, password } => request.basic_auth(username, Some(password)),
            ApiAuth::Token(token) => {
                request.header(header::AUTHORIZATION, format!("token {}", token))
            }
        }
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn fetch_content(&self, locator: &ContentLocator) -> Result<RawContent, FetchError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            urlencoding::encode(&locator.owner),
            urlencoding::encode(&locator.repo),
            encode_path(&locator.path)
        );
        debug!("⬇️ コンテンツ取得: {}", url);

        let mut request = self.client.get(&url);
        if let Some(git_ref) = &locator.git_ref {
            request = request.query(&[("ref", git_ref)]);
        }

        let response = self.authorized(request).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response, &locator.path).await);
        }

        match response.json::<ContentsResponse>().await? {
            ContentsResponse::File(file) => Ok(RawContent {
                content: file.content,
                encoding: file.encoding,
            }),
            ContentsResponse::Directory(_) => Err(FetchError::NotAFile(locator.path.clone())),
        }
    }

    fn authenticate(&self, credentials: Credentials) {
        let next = match credentials {
            Credentials::Basic { username, password } => ApiAuth::Basic { username, password },
            Credentials::OAuth { token } => ApiAuth::Token(token),
        };
        *self.auth.write().unwrap_or_else(|e| e.into_inner()) = next;
    }

    async fn create_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<String, AuthError> {
        let url = format!("{}/authorizations", self.base_url);
        info!("🔑 OAuthトークンを発行します (client_id: {})", request.client_id);

        let response = self
            .authorized(self.client.post(&url))
            .json(request)
            .send()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        if !response.status().is_success() {
            let err = status_error(response, "authorizations").await;
            return Err(AuthError::Exchange(err.to_string()));
        }

        let body: AuthorizationResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;
        Ok(body.token)
    }
}

// timeoutMs が 0 ならタイムアウトなし
fn request_timeout(timeout_ms: u64) -> Option<Duration> {
    (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms))
}

// '/' 区切りの各要素をエンコードする（'#' や '?' をURLの一部として解釈させない）
fn encode_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

// "3.0.0" -> "application/vnd.github.v3+json"
fn media_type(api_version: &str) -> String {
    let major = api_version
        .trim_start_matches('v')
        .split('.')
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(3);
    format!("application/vnd.github.v{}+json", major)
}

fn header_number(response: &Response, name: &str) -> Option<i64> {
    response.headers().get(name)?.to_str().ok()?.parse().ok()
}

fn rate_limit_reset(response: &Response) -> Option<DateTime<Utc>> {
    let secs = header_number(response, "x-ratelimit-reset")?;
    Utc.timestamp_opt(secs, 0).single()
}

// 失敗したレスポンスを取得エラーに変換する
async fn status_error(response: Response, resource: &str) -> FetchError {
    let status = response.status().as_u16();
    let rate_limited = header_number(&response, "x-ratelimit-remaining") == Some(0);
    let reset_at = rate_limit_reset(&response);
    let body = response.text().await.unwrap_or_default();

    match status {
        401 => FetchError::Unauthorized,
        403 | 429 if rate_limited || status == 429 => FetchError::RateLimited { reset_at },
        403 => FetchError::Forbidden(resource.to_string()),
        404 => FetchError::NotFound(resource.to_string()),
        _ => FetchError::Http { status, body },
    }
}
