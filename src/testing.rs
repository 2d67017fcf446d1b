// テスト用のホスティングAPI（呼び出しを記録する）

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::error::{AuthError, FetchError};
use crate::github::{AuthorizationRequest, ContentLocator, HostingApi, RawContent};

#[derive(Default)]
pub(crate) struct FakeApi {
    pub files: HashMap<String, RawContent>,
    /// 全ての取得をネットワークエラーにする
    pub offline: bool,
    /// トークン発行の結果。None なら発行失敗
    pub issued_token: Option<String>,
    pub authenticated: Mutex<Vec<Credentials>>,
    pub exchanges: Mutex<Vec<AuthorizationRequest>>,
    pub fetched: Mutex<Vec<ContentLocator>>,
}

impl FakeApi {
    pub fn with_file(self, path: &str, base64: &str) -> Self {
        self.with_raw(path, RawContent::base64(base64))
    }

    pub fn with_raw(mut self, path: &str, raw: RawContent) -> Self {
        self.files.insert(path.to_string(), raw);
        self
    }

    pub fn authenticated(&self) -> Vec<Credentials> {
        self.authenticated.lock().unwrap().clone()
    }

    pub fn exchanges(&self) -> Vec<AuthorizationRequest> {
        self.exchanges.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<ContentLocator> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostingApi for FakeApi {
    async fn fetch_content(&self, locator: &ContentLocator) -> Result<RawContent, FetchError> {
        self.fetched.lock().unwrap().push(locator.clone());
        if self.offline {
            return Err(FetchError::Network("connection refused".to_string()));
        }
        self.files
            .get(&locator.path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(locator.path.clone()))
    }

    fn authenticate(&self, credentials: Credentials) {
        self.authenticated.lock().unwrap().push(credentials);
    }

    async fn create_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<String, AuthError> {
        self.exchanges.lock().unwrap().push(request.clone());
        self.issued_token
            .clone()
            .ok_or_else(|| AuthError::Exchange("Bad credentials".to_string()))
    }
}
