mod app_service;
mod app_state;
mod commands;
mod config;
mod export;
mod form;
mod page;
mod request_guard;
mod session;
mod ui;

use anyhow::Context;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use session::{SimSession, SimulationBackend};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::app_service::run_backend_loop;
use crate::app_state::{App, AppEvent};
use crate::commands::AppCommand;
use crate::config::AppConfig;
use crate::ui::draw;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let mut session_info = Vec::new();

    let current_dir = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    session_info.push(format!("当前工作目录: {}", current_dir.display()));

    // 加载 .env（不存在时只读取系统环境变量）
    match dotenv::dotenv() {
        Ok(path) => session_info.push(format!("✓ 找到 .env 文件: {}", path.display())),
        Err(_) => session_info.push("⚠ 未找到 .env 文件，尝试从系统环境变量读取".to_string()),
    }

    let config = AppConfig::from_env().context("读取配置失败")?;

    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    std::fs::create_dir_all(&config.log_dir)?;
    let log_path = config.log_dir.join(format!("app-{}.log", ts));
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("无法创建日志文件 {}", log_path.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Warn)
        .filter_module("decaysim", log::LevelFilter::Info)
        .filter_module("reqwest", log::LevelFilter::Error)
        .init();
    session_info.push(format!("日志文件: {}", log_path.display()));

    let session = SimSession::new(config.base_url.clone(), config.timeout)
        .context("创建 HTTP 客户端失败")?;
    log::info!("backend {} timeout={:?}", session, config.timeout);
    session_info.push(format!("✓ 后端地址: {}", session.base_url()));
    session_info.push(format!("下载目录: {}", config.download_dir.display()));
    session_info.push("按 / 进入命令模式，输入 help 查看命令".to_string());

    // 创建核心 Channel
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<AppCommand>();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel::<AppEvent>();

    // 单后台任务模型 (Actor)
    let backend: Arc<dyn SimulationBackend> = Arc::new(session);
    tokio::spawn(run_backend_loop(backend, cmd_rx, evt_tx));

    // TUI 初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        session_info,
        config.catalog,
        config.download_dir,
        cmd_tx,
        evt_rx,
    );

    let res = match app.evt_rx.take() {
        Some(rx) => run_app_loop(&mut terminal, &mut app, rx).await,
        None => Ok(()),
    };

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = res {
        log::error!("ui loop failed: {}", e);
    }
    res.map_err(Into::into)
}

async fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut evt_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        let now = Instant::now();
        while let Ok(event) = evt_rx.try_recv() {
            app.apply_event(event, now);
        }
        app.tick(now);

        terminal.draw(|f| draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key_event(key.code, Instant::now())
                {
                    return Ok(());
                }
            }
        }
    }
}
