use crate::app_state::AppEvent;
use crate::commands::AppCommand;
use crate::session::SimulationBackend;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

/// 执行一条命令并把结果作为事件送回界面
pub async fn dispatch(
    cmd: AppCommand,
    backend: &dyn SimulationBackend,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match cmd {
        AppCommand::Simulate { token, request } => {
            info!("simulate {} isotope={}", token, request.isotope);
            let outcome = backend.simulate(&request).await;
            if let Err(ref e) = outcome {
                warn!("simulate {} failed: {}", token, e);
            }
            let _ = tx.send(AppEvent::SimulationFinished { token, outcome });
        }
        AppCommand::Search { token, query } => {
            info!("search {} query={:?}", token, query.0);
            let outcome = backend.search(&query).await;
            if let Err(ref e) = outcome {
                warn!("search {} failed: {}", token, e);
            }
            let _ = tx.send(AppEvent::SearchFinished { token, outcome });
        }
        AppCommand::Quit => {}
    }
}

/// 后台任务主循环：每条请求单独 spawn，收到 Quit 或通道关闭时退出
pub async fn run_backend_loop(
    backend: Arc<dyn SimulationBackend>,
    mut cmd_rx: mpsc::UnboundedReceiver<AppCommand>,
    evt_tx: mpsc::UnboundedSender<AppEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        if cmd == AppCommand::Quit {
            let _ = evt_tx.send(AppEvent::Log("收到退出命令".to_string()));
            break;
        }
        if let Some(token) = cmd.token() {
            debug!("backend loop picked up {}", token);
        }
        let backend = backend.clone();
        let tx = evt_tx.clone();
        tokio::spawn(async move {
            dispatch(cmd, backend.as_ref(), &tx).await;
        });
    }
}
