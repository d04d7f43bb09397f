use crate::format::COLUMN_COUNT;

pub type RowCells = [String; COLUMN_COUNT];

/// 初始（加载中）提示
pub const LOADING_MESSAGE: &str = "数据加载中或定时任务尚未运行...";
/// 数据为空时的提示
pub const EMPTY_MESSAGE: &str = "未能加载价格数据。可能是每日抓取任务尚未运行或失败。";
/// 加载失败时的提示
pub const FAILED_MESSAGE: &str = "加载数据失败。请查看日志获取更多信息。";
/// 加载失败时“最后更新”指示器的文本
pub const FRESHNESS_FAILED: &str = "失败";

/// 渲染目标：表格组件 + “最后更新”指示器
pub trait PriceTableView {
    /// 清空所有行
    fn clear(&mut self);
    /// 追加一行
    fn add_row(&mut self, cells: RowCells);
    /// 提交挂起的行变更
    fn draw(&mut self);
    /// 用一条横跨所有列的提示替换表格主体
    fn show_message(&mut self, message: &str);
    fn set_freshness(&mut self, text: &str);
    /// 将“最后更新”指示器恢复为未设置状态
    fn reset_freshness(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<RowCells>),
    Message(String),
}

/// 内存中的表格模型，终端界面与 `--print` 模式都从这里读取
#[derive(Debug, Clone)]
pub struct TableModel {
    body: TableBody,
    pending: Vec<RowCells>,
    freshness: Option<String>,
    draws: usize,
}

impl Default for TableModel {
    fn default() -> Self {
        Self {
            body: TableBody::Message(LOADING_MESSAGE.to_string()),
            pending: Vec::new(),
            freshness: None,
            draws: 0,
        }
    }
}

impl TableModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self) -> &TableBody {
        &self.body
    }

    pub fn rows(&self) -> &[RowCells] {
        match &self.body {
            TableBody::Rows(rows) => rows.as_slice(),
            TableBody::Message(_) => &[],
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.body {
            TableBody::Message(m) => Some(m.as_str()),
            TableBody::Rows(_) => None,
        }
    }

    pub fn freshness(&self) -> Option<&str> {
        self.freshness.as_deref()
    }

    pub fn draw_count(&self) -> usize {
        self.draws
    }

    /// 纯文本输出：每行 `国家 | 套餐 | 本地价格 | 人民币价格`，提示信息单独一行
    pub fn plain_lines(&self) -> Vec<String> {
        match &self.body {
            TableBody::Rows(rows) => rows.iter().map(|r| r.join(" | ")).collect(),
            TableBody::Message(m) => vec![m.clone()],
        }
    }
}

impl PriceTableView for TableModel {
    fn clear(&mut self) {
        self.pending.clear();
        self.body = TableBody::Rows(Vec::new());
    }

    fn add_row(&mut self, cells: RowCells) {
        self.pending.push(cells);
    }

    fn draw(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if let TableBody::Rows(rows) = &mut self.body {
            rows.extend(pending);
        } else {
            self.body = TableBody::Rows(pending);
        }
        self.draws += 1;
    }

    fn show_message(&mut self, message: &str) {
        self.pending.clear();
        self.body = TableBody::Message(message.to_string());
    }

    fn set_freshness(&mut self, text: &str) {
        self.freshness = Some(text.to_string());
    }

    fn reset_freshness(&mut self) {
        self.freshness = None;
    }
}
