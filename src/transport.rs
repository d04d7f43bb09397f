use std::future::Future;
use std::pin::Pin;

use reqwest::header::LAST_MODIFIED;
use reqwest::{StatusCode, Url};
use thiserror::Error;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 传输层返回的原始响应：状态码、`Last-Modified` 头与未解析的响应体
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub last_modified: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// 快照获取抽象（默认由 reqwest 实现，测试中可替换为内存实现）
pub trait SnapshotTransport: Send + Sync {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RawResponse, TransportError>>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl SnapshotTransport for HttpTransport {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RawResponse, TransportError>> {
        Box::pin(async move {
            let resp = self.client.get(url.clone()).send().await?;
            let status = resp.status();
            let last_modified = resp
                .headers()
                .get(LAST_MODIFIED)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = resp.bytes().await?.to_vec();
            Ok(RawResponse {
                status,
                last_modified,
                body,
            })
        })
    }
}
