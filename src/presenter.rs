use chrono::{FixedOffset, Utc};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

use crate::cache_bust::CacheBuster;
use crate::format::row_cells;
use crate::model::{FailureReason, PriceRecord, Snapshot, ViewState};
use crate::time::{parse_last_modified, to_display_string};
use crate::transport::{SnapshotTransport, TransportError};
use crate::view::{EMPTY_MESSAGE, FAILED_MESSAGE, FRESHNESS_FAILED, PriceTableView};

pub const DEFAULT_CACHE_BUST_PARAM: &str = "v";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("malformed price snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SyncError {
    pub fn reason(&self) -> FailureReason {
        match self {
            SyncError::Transport(_) | SyncError::Status(_) => FailureReason::Transport,
            SyncError::Parse(_) => FailureReason::Parse,
        }
    }
}

/// 解析响应体：
/// - `null` 视为没有可用数据，返回空列表
/// - 数组逐条校验，任一记录缺少必填字段即整体失败
/// - 其它 JSON 值（对象、数字等）一律视为格式错误
fn parse_records(body: &[u8]) -> Result<Vec<PriceRecord>, serde_json::Error> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Null => Ok(Vec::new()),
        value => serde_json::from_value(value),
    }
}

/// 价格快照同步器
///
/// 每次调用 [`synchronize`](Self::synchronize) 恰好发起一次请求，
/// 根据结果把视图驱动到 `Populated`、`Empty` 或 `Failed` 之一。
/// 结果确定之前不会改动视图。调用方需自行串行化调用。
pub struct DataSyncPresenter<T> {
    transport: T,
    resource: Url,
    cache_bust_param: String,
    display_offset: FixedOffset,
    buster: CacheBuster,
}

impl<T: SnapshotTransport> DataSyncPresenter<T> {
    pub fn new(transport: T, resource: Url, display_offset: FixedOffset) -> Self {
        Self {
            transport,
            resource,
            cache_bust_param: DEFAULT_CACHE_BUST_PARAM.to_string(),
            display_offset,
            buster: CacheBuster::new(),
        }
    }

    pub fn with_cache_bust_param(mut self, param: impl Into<String>) -> Self {
        self.cache_bust_param = param.into();
        self
    }

    pub fn resource(&self) -> &Url {
        &self.resource
    }

    /// 拉取最新快照并更新视图，返回最终到达的视图状态
    ///
    /// 所有失败（网络错误、非 2xx 状态、JSON 格式错误）都会记录日志并转为
    /// `ViewState::Failed`，不会向调用方传播；空数组得到 `ViewState::Empty`。
    pub async fn synchronize<V>(&self, view: &mut V) -> ViewState
    where
        V: PriceTableView + ?Sized,
    {
        let url = self.buster.bust(&self.resource, &self.cache_bust_param);
        tracing::debug!("Fetching price snapshot from {}", url);

        match self.fetch(&url).await {
            Ok(snapshot) if snapshot.is_empty() => {
                tracing::warn!("Price snapshot at {} contains no records", self.resource);
                view.show_message(EMPTY_MESSAGE);
                view.reset_freshness();
                ViewState::Empty
            }
            Ok(snapshot) => {
                view.clear();
                for record in &snapshot.records {
                    view.add_row(row_cells(record));
                }
                view.draw();
                view.set_freshness(&to_display_string(&snapshot.fetched_at, self.display_offset));
                tracing::info!("Loaded {} price records", snapshot.len());
                ViewState::Populated(snapshot)
            }
            Err(e) => {
                tracing::error!("Failed to load price snapshot from {}: {}", url, e);
                view.show_message(FAILED_MESSAGE);
                view.set_freshness(FRESHNESS_FAILED);
                ViewState::Failed(e.reason())
            }
        }
    }

    async fn fetch(&self, url: &Url) -> Result<Snapshot, SyncError> {
        let resp = self.transport.get(url).await?;
        if !resp.status.is_success() {
            return Err(SyncError::Status(resp.status));
        }

        let fetched_at = match resp.last_modified.as_deref() {
            Some(raw) => parse_last_modified(raw).unwrap_or_else(|| {
                tracing::warn!("Unparseable Last-Modified header: {}", raw);
                Utc::now()
            }),
            None => Utc::now(),
        };

        let records = parse_records(&resp.body)?;
        Ok(Snapshot {
            records,
            fetched_at,
        })
    }
}
