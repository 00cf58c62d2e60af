#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("http error: {0}")]
    Http(String),
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("backend unavailable")]
    Disconnected,
}

impl RequestError {
    /// 从错误响应体中提取后端给出的说明（{"error": "..."}），否则截断原文
    pub fn from_status(status: u16, raw: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| raw.chars().take(200).collect());
        RequestError::Status { status, message }
    }
}
