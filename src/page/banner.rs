use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// 错误横幅的存活时间，到期无条件移除
pub const BANNER_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub inserted_at: Instant,
}

/// 主内容区顶部的横幅，最新的在最前
#[derive(Debug, Clone, Default)]
pub struct BannerStack {
    banners: VecDeque<Banner>,
}

impl BannerStack {
    pub fn push(&mut self, message: impl Into<String>, now: Instant) {
        self.banners.push_front(Banner {
            message: message.into(),
            inserted_at: now,
        });
    }

    pub fn expire(&mut self, now: Instant) {
        self.banners
            .retain(|b| now.saturating_duration_since(b.inserted_at) < BANNER_TTL);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Banner> {
        self.banners.iter()
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}
