use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use reqwest::Url;

/// 生成 cache-busting 参数值
///
/// 取当前毫秒时间戳；若时钟未前进（同一毫秒内多次调用或时钟回拨），
/// 则在上一次的值上加一，保证同一实例产生的值严格递增
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: AtomicI64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_stamp(&self) -> i64 {
        self.next_stamp_at(Utc::now().timestamp_millis())
    }

    fn next_stamp_at(&self, now_ms: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now_ms.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    /// 在资源地址上追加 `param=<stamp>`，保留原有查询参数
    pub fn bust(&self, base: &Url, param: &str) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair(param, &self.next_stamp().to_string());
        url
    }
}
