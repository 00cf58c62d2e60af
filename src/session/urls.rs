/// 默认后端地址（本地 Flask 服务）
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// 模拟接口
pub const PATH_SIMULATE: &str = "/simulate";

/// 数据集检索接口
pub const PATH_SEARCH: &str = "/search";

fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub fn url_simulate(base_url: &str) -> String {
    join(base_url, PATH_SIMULATE)
}

pub fn url_search(base_url: &str) -> String {
    join(base_url, PATH_SEARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_not_doubled() {
        assert_eq!(
            url_simulate("http://localhost:5000/"),
            "http://localhost:5000/simulate"
        );
        assert_eq!(url_search(DEFAULT_BASE_URL), "http://127.0.0.1:5000/search");
    }
}
