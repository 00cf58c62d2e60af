use crate::request_guard::RequestToken;
use crate::session::dto::{SearchQuery, SimulationRequest};

/// 界面发给后台任务的命令；校验和守卫已在界面侧完成
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Simulate {
        token: RequestToken,
        request: SimulationRequest,
    },
    Search {
        token: RequestToken,
        query: SearchQuery,
    },
    Quit,
}

impl AppCommand {
    pub fn token(&self) -> Option<RequestToken> {
        match self {
            AppCommand::Simulate { token, .. } | AppCommand::Search { token, .. } => Some(*token),
            AppCommand::Quit => None,
        }
    }
}
