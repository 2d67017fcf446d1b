// 取得したコンテンツのデコード
//
// パスに画像を示すパターン（デフォルトは "img"）が含まれていればバイナリ、
// それ以外はUTF-8テキストとしてBase64をデコードする。

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use log::warn;
use regex::Regex;

use crate::config::{ContentOptions, DEFAULT_BINARY_PATTERN};
use crate::error::{ConfigError, DecodeError};
use crate::github::RawContent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

impl ContentKind {
    /// デフォルトのパターンでの判定（大文字小文字は区別する）
    pub fn for_path(path: &str) -> ContentKind {
        if path.contains(DEFAULT_BINARY_PATTERN) {
            ContentKind::Binary
        } else {
            ContentKind::Text
        }
    }
}

/// デコード済みのコンテンツ
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodedContent {
    Text(String),
    Binary(Vec<u8>),
}

impl DecodedContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            DecodedContent::Text(_) => ContentKind::Text,
            DecodedContent::Binary(_) => ContentKind::Binary,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            DecodedContent::Text(s) => s.as_bytes(),
            DecodedContent::Binary(b) => b,
        }
    }

    /// テキストとして取り出す。バイナリなら NotText
    pub fn into_text(self, path: &str) -> Result<String, DecodeError> {
        match self {
            DecodedContent::Text(s) => Ok(s),
            DecodedContent::Binary(_) => Err(DecodeError::NotText(path.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContentDecoder {
    // None ならデフォルトの部分文字列判定
    binary_pattern: Option<Regex>,
}

impl ContentDecoder {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        if pattern.trim().is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        Ok(ContentDecoder {
            binary_pattern: Some(Regex::new(pattern)?),
        })
    }

    /// 設定のパターンが空・不正な場合はデフォルトを使う
    pub fn from_options(options: &ContentOptions) -> Self {
        ContentDecoder::new(&options.binary_pattern).unwrap_or_else(|e| {
            warn!("⚠️ {}。デフォルトの判定を使用します", e);
            ContentDecoder::default()
        })
    }

    pub fn classify(&self, path: &str) -> ContentKind {
        match &self.binary_pattern {
            Some(re) if re.is_match(path) => ContentKind::Binary,
            Some(_) => ContentKind::Text,
            None => ContentKind::for_path(path),
        }
    }

    /// APIから受け取った内容をデコードする
    pub fn decode(&self, raw: &RawContent, path: &str) -> Result<DecodedContent, DecodeError> {
        if !raw.encoding.eq_ignore_ascii_case("base64") {
            return Err(DecodeError::UnsupportedEncoding(raw.encoding.clone()));
        }
        self.decode_base64(&raw.content, path)
    }

    pub fn decode_base64(&self, data: &str, path: &str) -> Result<DecodedContent, DecodeError> {
        // GitHubは60文字ごとに改行を入れて返す
        let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = BASE64.decode(compact)?;

        match self.classify(path) {
            ContentKind::Binary => Ok(DecodedContent::Binary(bytes)),
            ContentKind::Text => Ok(DecodedContent::Text(String::from_utf8(bytes)?)),
        }
    }
}

/// デフォルトの判定でBase64をデコードする
pub fn decode(raw_base64: &str, path: &str) -> Result<DecodedContent, DecodeError> {
    ContentDecoder::default().decode_base64(raw_base64, path)
}
