/// 一次提交的凭据，完成事件必须带回同一个 token 才会被处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Simulate,
    Search,
}

/// run 与 search 共用的在途请求守卫：同一时刻最多一个请求
#[derive(Debug, Default)]
pub struct RequestGuard {
    next: u64,
    pending: Option<(RequestToken, RequestKind)>,
}

impl RequestGuard {
    /// 已有在途请求时返回 None
    pub fn acquire(&mut self, kind: RequestKind) -> Option<RequestToken> {
        if self.pending.is_some() {
            return None;
        }
        self.next += 1;
        let token = RequestToken(self.next);
        self.pending = Some((token, kind));
        Some(token)
    }

    /// token 与在途请求不符时不做任何事
    pub fn release(&mut self, token: RequestToken) -> Option<RequestKind> {
        match self.pending {
            Some((pending, kind)) if pending == token => {
                self.pending = None;
                Some(kind)
            }
            _ => None,
        }
    }

    pub fn pending_kind(&self) -> Option<RequestKind> {
        self.pending.map(|(_, kind)| kind)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
