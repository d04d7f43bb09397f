use crate::model::PriceRecord;

/// 人民币价格缺失时的占位文本
pub const CNY_PLACEHOLDER: &str = "N/A";

/// 表格列数（国家、套餐、本地价格、人民币价格）
pub const COLUMN_COUNT: usize = 4;

pub fn format_local_price(price: f64, currency: &str) -> String {
    format!("{:.2} {}", price, currency)
}

pub fn format_cny(price_cny: Option<f64>) -> String {
    match price_cny {
        Some(v) => format!("¥{:.2}", v),
        None => CNY_PLACEHOLDER.to_string(),
    }
}

/// 将一条价格记录转换为表格的一行单元格
///
/// 国家代码与套餐名原样输出，本地价格固定两位小数并附币种，
/// 人民币价格为 `¥` 加两位小数或占位文本
pub fn row_cells(record: &PriceRecord) -> [String; COLUMN_COUNT] {
    [
        record.country_code.clone(),
        record.plan_name.clone(),
        format_local_price(record.local_price, &record.local_currency),
        format_cny(record.price_cny),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(local_price: f64, price_cny: Option<f64>) -> PriceRecord {
        PriceRecord {
            country_code: "US".into(),
            plan_name: "Premium".into(),
            local_price,
            local_currency: "USD".into(),
            price_cny,
        }
    }

    #[test]
    fn local_price_always_has_two_decimals() {
        assert_eq!(format_local_price(9.5, "USD"), "9.50 USD");
        assert_eq!(format_local_price(59.0, "INR"), "59.00 INR");
        assert_eq!(format_local_price(1234.567, "KRW"), "1234.57 KRW");
    }

    #[test]
    fn cny_uses_placeholder_only_when_absent() {
        assert_eq!(format_cny(None), "N/A");
        assert_eq!(format_cny(Some(72.5)), "¥72.50");
        assert_eq!(format_cny(Some(0.0)), "¥0.00");
    }

    #[test]
    fn row_cells_keep_codes_verbatim() {
        let cells = row_cells(&record(9.99, Some(72.50)));
        assert_eq!(cells, ["US", "Premium", "9.99 USD", "¥72.50"]);
    }
}
