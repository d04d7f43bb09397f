use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 单个国家/套餐在快照时刻的价格记录
///
/// 由上游定时任务生成，客户端只读；`price_cny` 在汇率缺失时为 `null` 或直接缺省
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceRecord {
    pub country_code: String,
    pub plan_name: String,
    pub local_price: f64,
    pub local_currency: String,
    #[serde(default)]
    pub price_cny: Option<f64>,
}

/// 一次拉取得到的全部价格记录，以及对应的新鲜度时间
///
/// 新鲜度来自传输层元数据（`Last-Modified`），不在数据本体中
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub records: Vec<PriceRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 失败原因（对用户展示时不区分两者）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Transport,
    Parse,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Transport => write!(f, "transport or not-found"),
            FailureReason::Parse => write!(f, "parse error"),
        }
    }
}

/// 视图状态：决定表格主体与“最后更新”指示器的显示内容
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Populated(Snapshot),
    Empty,
    Failed(FailureReason),
}

impl ViewState {
    pub fn is_failed(&self) -> bool {
        matches!(self, ViewState::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_cny_accepts_null_and_missing() {
        let with_null: PriceRecord = serde_json::from_str(
            r#"{"country_code":"IN","plan_name":"Mini","local_price":59,"local_currency":"INR","price_cny":null}"#,
        )
        .unwrap();
        assert_eq!(with_null.price_cny, None);
        assert_eq!(with_null.local_price, 59.0);

        let missing: PriceRecord = serde_json::from_str(
            r#"{"country_code":"IN","plan_name":"Mini","local_price":59,"local_currency":"INR"}"#,
        )
        .unwrap();
        assert_eq!(missing.price_cny, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let rec: PriceRecord = serde_json::from_str(
            r#"{"country_code":"US","plan_name":"Duo","local_price":14.99,"local_currency":"USD","price_cny":107.3,"source":"web"}"#,
        )
        .unwrap();
        assert_eq!(rec.price_cny, Some(107.3));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let res = serde_json::from_str::<PriceRecord>(
            r#"{"country_code":"US","local_price":9.99,"local_currency":"USD"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn failure_reason_display() {
        assert_eq!(FailureReason::Transport.to_string(), "transport or not-found");
        assert_eq!(FailureReason::Parse.to_string(), "parse error");
    }
}
