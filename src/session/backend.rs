use crate::session::dto::{SearchQuery, SearchResponse, SimulationRequest, SimulationResult};
use crate::session::RequestError;
use async_trait::async_trait;

/// 模拟后端：真实实现是 [`SimSession`](crate::session::SimSession)，测试中替换为假实现
#[async_trait]
pub trait SimulationBackend: Send + Sync {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, RequestError>;

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, RequestError>;
}
