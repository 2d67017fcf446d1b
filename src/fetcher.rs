// コンテンツ取得
//
// 取得パスは呼び出しごとに引数で渡す。共有設定の path は書き換えないので、
// 並行して呼び出しても互いの取得先が入れ替わることはない。

use log::{error, info};

use crate::config::ContentOptions;
use crate::decoder::{ContentDecoder, DecodedContent};
use crate::error::{ContentError, FetchError};
use crate::github::{ContentLocator, HostingApi};

/// 1ファイルを取得してデコードする（リトライはしない）
pub async fn get_content<A>(
    api: &A,
    options: &ContentOptions,
    decoder: &ContentDecoder,
    path: &str,
) -> Result<DecodedContent, ContentError>
where
    A: HostingApi + ?Sized,
{
    if path.trim().is_empty() {
        return Err(FetchError::EmptyPath.into());
    }

    let locator = ContentLocator::new(options, path);
    let raw = api.fetch_content(&locator).await.inspect_err(|e| {
        error!(
            "❌ コンテンツ取得エラー: {}/{}/{} - {}",
            locator.owner, locator.repo, locator.path, e
        );
    })?;

    let decoded = decoder.decode(&raw, path).inspect_err(|e| {
        error!("⚠️ ファイルデコードエラー: {} - {}", path, e);
    })?;

    info!("✅ ファイル取得成功: {} ({} bytes)", path, decoded.as_bytes().len());
    Ok(decoded)
}
