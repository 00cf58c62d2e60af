use std::time::{Duration, Instant};

pub const RUN_LABEL: &str = "Run Simulation";
pub const SEARCH_LABEL: &str = "Search";
pub const SAVE_IMAGE_LABEL: &str = "Save as Image";
pub const SAVE_JSON_LABEL: &str = "Save as JSON";
pub const RUNNING_LABEL: &str = "Running...";
pub const SAVING_LABEL: &str = "Saving...";

/// 保存按钮显示“Saving...”的时长
pub const SAVE_FEEDBACK: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Run,
    Search,
    SaveImage,
    SaveJson,
}

impl ControlId {
    pub fn idle_label(&self) -> &'static str {
        match self {
            ControlId::Run => RUN_LABEL,
            ControlId::Search => SEARCH_LABEL,
            ControlId::SaveImage => SAVE_IMAGE_LABEL,
            ControlId::SaveJson => SAVE_JSON_LABEL,
        }
    }

    pub fn busy_label(&self) -> &'static str {
        match self {
            ControlId::Run | ControlId::Search => RUNNING_LABEL,
            ControlId::SaveImage | ControlId::SaveJson => SAVING_LABEL,
        }
    }
}

/// 一个按钮的状态
///
/// `busy` 由请求/保存动作控制，`blocked` 由表单条件控制（例如没有勾选任何曲线）；
/// 两者任一成立时按钮不可用。
#[derive(Debug, Clone)]
pub struct Control {
    id: ControlId,
    busy: bool,
    blocked: bool,
    busy_until: Option<Instant>,
}

impl Control {
    pub fn new(id: ControlId) -> Self {
        Self {
            id,
            busy: false,
            blocked: false,
            busy_until: None,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.busy {
            self.id.busy_label()
        } else {
            self.id.idle_label()
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.busy && !self.blocked
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    /// 请求发出时调用，直到 [`finish`](Self::finish)
    pub fn begin(&mut self) {
        self.busy = true;
        self.busy_until = None;
    }

    /// 显示忙碌状态一小段时间，由 [`tick`](Self::tick) 恢复
    pub fn begin_for(&mut self, now: Instant, duration: Duration) {
        self.busy = true;
        self.busy_until = Some(now + duration);
    }

    pub fn finish(&mut self) {
        self.busy = false;
        self.busy_until = None;
    }

    pub fn tick(&mut self, now: Instant) {
        if matches!(self.busy_until, Some(until) if now >= until) {
            self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_run_shows_running_label() {
        let mut run = Control::new(ControlId::Run);
        assert_eq!(run.label(), "Run Simulation");
        run.begin();
        assert_eq!(run.label(), "Running...");
        assert!(!run.is_enabled());
        run.finish();
        assert_eq!(run.label(), "Run Simulation");
        assert!(run.is_enabled());
    }

    #[test]
    fn blocked_control_stays_disabled_after_finish() {
        let mut run = Control::new(ControlId::Run);
        run.set_blocked(true);
        run.begin();
        run.finish();
        assert!(!run.is_enabled());
        assert_eq!(run.label(), "Run Simulation");
    }

    #[test]
    fn timed_busy_restores_on_tick() {
        let t0 = Instant::now();
        let mut save = Control::new(ControlId::SaveImage);
        save.begin_for(t0, SAVE_FEEDBACK);
        save.tick(t0 + Duration::from_millis(399));
        assert_eq!(save.label(), "Saving...");
        save.tick(t0 + SAVE_FEEDBACK);
        assert_eq!(save.label(), "Save as Image");
        assert!(save.is_enabled());
    }
}
