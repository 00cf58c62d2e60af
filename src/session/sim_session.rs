use super::backend::SimulationBackend;
use super::dto::{SearchQuery, SearchResponse, SimulationRequest, SimulationResult};
use super::error::RequestError;
use super::urls::*;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// 衰变模拟服务的 HTTP 会话
///
/// 每次调用只发一次请求，没有重试；失败直接交给调用方处理。
pub struct SimSession {
    client: Client,
    base_url: String,
}

impl SimSession {
    /// 创建会话
    ///
    /// # 参数
    ///
    /// * `base_url` - 后端地址，例如 `http://127.0.0.1:5000`
    /// * `timeout` - 单个请求的超时时间
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("decaysim/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RequestError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST JSON 并解析 JSON 响应；非 2xx 一律视为失败
    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| RequestError::Http(e.to_string()))?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| RequestError::Http(e.to_string()))?;

        if !status.is_success() {
            warn!("{} POST [{}] -> {}", self, url, status);
            return Err(RequestError::from_status(status.as_u16(), &raw));
        }
        info!("{} POST [{}] -> {}", self, url, status);

        serde_json::from_str(&raw)
            .map_err(|e| RequestError::InvalidResponse(format!("json parse failed: {e}")))
    }
}

#[async_trait]
impl SimulationBackend for SimSession {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, RequestError> {
        let url = url_simulate(&self.base_url);
        self.post_json(&url, request).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, RequestError> {
        let url = url_search(&self.base_url);
        self.post_json(&url, query).await
    }
}

impl std::fmt::Display for SimSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<SimSession [{}]>", self.base_url)
    }
}

impl std::fmt::Debug for SimSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<SimSession [{}]>", self.base_url)
    }
}
