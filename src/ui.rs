use ratatui::{prelude::*, widgets::*};

use crate::view::{FRESHNESS_FAILED, TableBody, TableModel};

const HEADERS: [&str; 4] = ["国家", "套餐", "本地价格", "人民币价格"];

/// 表格区域之外占用的行数：标题 2 行、表格边框与表头 3 行、状态 1 行、帮助 1 行
const CHROME_ROWS: u16 = 7;

/// 终端界面状态
pub struct BoardState {
    pub model: TableModel,
    pub resource: String,
    pub offset: usize,
    pub status: String,
}

impl BoardState {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            model: TableModel::new(),
            resource: resource.into(),
            offset: 0,
            status: String::new(),
        }
    }

    fn max_offset(&self) -> usize {
        self.model.rows().len().saturating_sub(1)
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    /// 刷新后回到顶部，避免偏移越界
    pub fn reset_scroll(&mut self) {
        self.offset = 0;
    }
}

/// 按终端高度计算一页可见的行数
pub fn page_size(terminal_height: u16) -> usize {
    usize::from(terminal_height.saturating_sub(CHROME_ROWS).max(1))
}

/// 主渲染函数
///
/// # Arguments
///
/// * `frame` - 终端渲染帧
/// * `state` - 界面状态
pub fn render(frame: &mut Frame, state: &BoardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // 标题 + 最后更新
            Constraint::Min(3),    // 表格
            Constraint::Length(1), // 状态
            Constraint::Length(1), // 帮助
        ])
        .split(frame.area());

    let freshness = state.model.freshness().unwrap_or("--");
    let header_style = if freshness == FRESHNESS_FAILED {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    let header = Paragraph::new(Line::from(format!(
        "数据源: {}    最后更新: {}",
        state.resource, freshness
    )))
    .style(header_style)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.model.body() {
        TableBody::Rows(rows) => {
            let body: Vec<Row> = rows
                .iter()
                .skip(state.offset)
                .map(|cells| Row::new(cells.iter().map(|c| Cell::from(c.as_str()))))
                .collect();
            let table = Table::new(
                body,
                [
                    Constraint::Length(6),
                    Constraint::Percentage(30),
                    Constraint::Percentage(35),
                    Constraint::Percentage(35),
                ],
            )
            .header(
                Row::new(HEADERS)
                    .style(Style::default().add_modifier(Modifier::BOLD))
                    .bottom_margin(1),
            )
            .block(
                Block::default()
                    .title(format!("价格 ({} 条)", rows.len()))
                    .borders(Borders::ALL),
            )
            .column_spacing(1);
            frame.render_widget(table, chunks[1]);
        }
        TableBody::Message(message) => {
            let para = Paragraph::new(message.as_str())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().title("价格").borders(Borders::ALL));
            frame.render_widget(para, chunks[1]);
        }
    }

    frame.render_widget(Paragraph::new(state.status.as_str()), chunks[2]);

    let help = Paragraph::new("[Q] 退出  [R] 刷新  [↑↓] 滚动  [PgUp/PgDn] 翻页")
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}
