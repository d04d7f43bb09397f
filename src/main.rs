use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use price_board::config::Settings;
use price_board::error::Result as BoardResult;
use price_board::http_client::client_for_url;
use price_board::time::{DisplayTimer, display_offset};
use price_board::ui::{self, BoardState};
use price_board::{DataSyncPresenter, HttpTransport, TableModel, ViewState};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

type TermResult<T> = Result<T, Box<dyn std::error::Error>>;
type Presenter = DataSyncPresenter<HttpTransport>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Interactive,
    Print,
}

fn parse_mode() -> TermResult<Mode> {
    let mut mode = Mode::Interactive;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--print" | "-p" => mode = Mode::Print,
            other => return Err(format!("unknown argument: {other} (usage: price-board [--print])").into()),
        }
    }
    Ok(mode)
}

/// 初始化日志
///
/// `--print` 模式输出到 stderr；交互模式写入日志文件，避免破坏终端界面
fn init_logging(settings: &Settings, mode: Mode) -> TermResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let timer = DisplayTimer::new(display_offset(settings.display.utc_offset_hours));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_timer(timer);
    match mode {
        Mode::Print => builder.with_writer(io::stderr).init(),
        Mode::Interactive => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&settings.logging.file)?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
    }
    Ok(())
}

fn build_presenter(settings: &Settings) -> BoardResult<Presenter> {
    let resource = settings.source.resource_url()?;
    let client = client_for_url(resource.as_str(), settings.source.timeout())?;
    let offset = display_offset(settings.display.utc_offset_hours);
    Ok(
        DataSyncPresenter::new(HttpTransport::new(client), resource, offset)
            .with_cache_bust_param(settings.source.cache_bust_param.clone()),
    )
}

/// 单次拉取并以纯文本输出；加载失败时返回错误（非零退出码）
async fn print_once(presenter: &Presenter) -> TermResult<()> {
    let mut model = TableModel::new();
    let outcome = presenter.synchronize(&mut model).await;
    println!("最后更新: {}", model.freshness().unwrap_or("--"));
    for line in model.plain_lines() {
        println!("{}", line);
    }
    match outcome {
        ViewState::Failed(reason) => Err(format!("加载失败: {}", reason).into()),
        _ => Ok(()),
    }
}

fn init_terminal() -> TermResult<ratatui::Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = ratatui::Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: ratatui::Terminal<CrosstermBackend<Stdout>>) -> TermResult<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// 重新同步一次；在完成之前不处理其它按键，保证调用串行
async fn refresh(
    terminal: &mut ratatui::Terminal<CrosstermBackend<Stdout>>,
    presenter: &Presenter,
    state: &mut BoardState,
) -> TermResult<()> {
    state.status = "正在加载...".into();
    terminal.draw(|f| ui::render(f, &*state))?;

    let outcome = presenter.synchronize(&mut state.model).await;
    state.reset_scroll();
    state.status = match outcome {
        ViewState::Populated(snapshot) => format!("已加载 {} 条记录", snapshot.len()),
        ViewState::Empty => "暂无数据".into(),
        ViewState::Failed(reason) => format!("加载失败（{}），详见日志", reason),
        ViewState::Loading => String::new(),
    };
    Ok(())
}

async fn run(
    terminal: &mut ratatui::Terminal<CrosstermBackend<Stdout>>,
    presenter: &Presenter,
) -> TermResult<()> {
    let mut state = BoardState::new(presenter.resource().as_str());
    refresh(terminal, presenter, &mut state).await?;

    loop {
        terminal.draw(|f| ui::render(f, &state))?;
        if !event::poll(EVENT_POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let page = ui::page_size(terminal.size()?.height);
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
            KeyCode::Char('r') | KeyCode::Char('R') => refresh(terminal, presenter, &mut state).await?,
            KeyCode::Down => state.scroll_down(1),
            KeyCode::Up => state.scroll_up(1),
            KeyCode::PageDown => state.scroll_down(page),
            KeyCode::PageUp => state.scroll_up(page),
            KeyCode::Home => state.reset_scroll(),
            _ => {}
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> TermResult<()> {
    let mode = parse_mode()?;
    let settings = Settings::load()?;
    init_logging(&settings, mode)?;

    let presenter = build_presenter(&settings)?;
    tracing::info!("Price board source: {}", presenter.resource());

    match mode {
        Mode::Print => print_once(&presenter).await,
        Mode::Interactive => {
            let mut terminal = init_terminal()?;
            let result = run(&mut terminal, &presenter).await;
            restore_terminal(terminal)?;
            result
        }
    }
}
