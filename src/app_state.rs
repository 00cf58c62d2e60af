use crate::commands::form_command::{completion_hint, HELP_TEXT};
use crate::commands::{AppCommand, FormCommand};
use crate::export::{DownloadArtifact, ExportError};
use crate::form::dataset::dataset_options;
use crate::form::{
    build_search_query, build_simulation_request, validate_search_query,
    validate_simulation_request, FormState, HalfLifeUnit, IsotopeCatalog, TextField,
    ValidationError, CUSTOM_ISOTOPE,
};
use crate::page::controls::SAVE_FEEDBACK;
use crate::page::{ControlId, PageState};
use crate::request_guard::{RequestGuard, RequestKind, RequestToken};
use crate::session::dto::{SearchResponse, SimulationRequest, SimulationResult};
use crate::session::RequestError;
use crossterm::event::KeyCode;
use log::{info, warn};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;
use tokio::sync::mpsc;

pub const GENERIC_FAILURE: &str = "An error occurred while processing the request.";
pub const REQUEST_IN_PROGRESS: &str = "A request is already in progress.";

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum InputMode {
    Normal,
    /// 正在编辑某个文本字段
    Editing(TextField),
    Command,
}

/// 表单中可获得焦点的条目（按显示顺序）
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum FormItem {
    Isotope,
    Text(TextField),
    HalfLifeUnit,
    SettingsToggle,
    Checkbox(usize),
    Datasets,
    Button(ControlId),
    DataPointsToggle,
}

#[derive(Debug)]
pub enum AppEvent {
    Log(String),
    SimulationFinished {
        token: RequestToken,
        outcome: Result<SimulationResult, RequestError>,
    },
    SearchFinished {
        token: RequestToken,
        outcome: Result<SearchResponse, RequestError>,
    },
}

pub struct App {
    pub form: FormState,
    pub page: PageState,
    pub catalog: IsotopeCatalog,
    pub guard: RequestGuard,
    /// 在途模拟请求对应的同位素显示名，用于结果标题与 JSON 文件名
    pending_isotope: Option<String>,
    pub download_dir: PathBuf,
    pub input_mode: InputMode,
    pub focus_index: usize,
    pub command_input: String,
    pub command_cursor: usize,
    pub command_history: Vec<String>,
    pub command_history_index: Option<usize>,
    pub log_messages: Vec<String>,
    pub cmd_tx: mpsc::UnboundedSender<AppCommand>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
}

impl App {
    pub fn new(
        session_info: Vec<String>,
        catalog: IsotopeCatalog,
        download_dir: PathBuf,
        cmd_tx: mpsc::UnboundedSender<AppCommand>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["应用已启动".to_string()];
        log_messages.extend(session_info);

        let mut app = App {
            form: FormState::default(),
            page: PageState::default(),
            catalog,
            guard: RequestGuard::default(),
            pending_isotope: None,
            download_dir,
            input_mode: InputMode::Normal,
            focus_index: 0,
            command_input: String::new(),
            command_cursor: 0,
            command_history: Vec::new(),
            command_history_index: None,
            log_messages,
            cmd_tx,
            evt_rx: Some(evt_rx),
        };
        // 启动时检查一次复选框
        app.sync_run_blocked();
        app
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    // ---- 表单输入 ----

    pub fn set_isotope(&mut self, value: &str) {
        if !self.page.isotope_select_enabled {
            self.add_log("⚠ 已选择检索 dataset，先选择 None 再更换同位素".to_string());
            return;
        }
        if !self.catalog.accepts(value) {
            self.add_log(format!("✗ 未知同位素: {}", value));
            return;
        }
        self.form.isotope = value.to_string();
        self.page.custom_fields_visible = self.form.isotope == CUSTOM_ISOTOPE;
    }

    pub fn cycle_isotope(&mut self, delta: isize) {
        let next = self.catalog.cycle(&self.form.isotope, delta);
        self.set_isotope(&next);
    }

    pub fn set_unit(&mut self, raw: &str) {
        match HalfLifeUnit::from_str(raw) {
            Ok(unit) => self.form.custom_half_life_unit = unit,
            Err(_) => self.add_log(format!("✗ 未知半衰期单位: {}", raw)),
        }
    }

    pub fn set_text(&mut self, field: TextField, value: &str) {
        *self.form.text_mut(field) = value.to_string();
    }

    pub fn toggle_checkbox(&mut self, index: usize) {
        self.form.toggle_checkbox(index);
        self.sync_run_blocked();
    }

    pub fn set_checkbox(&mut self, name: &str, checked: bool) {
        if self.form.set_checked(name, checked) {
            self.sync_run_blocked();
        } else {
            self.add_log(format!("✗ 没有名为 {} 的选项", name));
        }
    }

    /// 没有勾选任何曲线时禁用运行按钮
    fn sync_run_blocked(&mut self) {
        let blocked = !self.form.any_checked();
        self.page.run.set_blocked(blocked);
    }

    /// dataset 下拉框变更：选中真实 dataset 时禁用同位素下拉框，选中 None 时恢复
    fn sync_dataset_selection(&mut self) {
        self.form.selected_dataset = self.page.datasets.selected_option().cloned();
        self.page.isotope_select_enabled = self.form.selected_dataset.is_none();
    }

    pub fn select_dataset(&mut self, index: Option<usize>) {
        let ok = match index {
            Some(i) => self.page.datasets.select(i),
            None => self.page.datasets.select_none(),
        };
        if ok {
            self.sync_dataset_selection();
        } else {
            self.add_log("✗ 无效的 dataset 选项".to_string());
        }
    }

    pub fn cycle_dataset(&mut self, delta: isize) {
        if self.page.datasets.cycle(delta) {
            self.sync_dataset_selection();
        }
    }

    // ---- 提交 ----

    fn reject(&mut self, err: ValidationError, now: Instant) {
        if err == ValidationError::NoIsotope {
            self.page.reset_results();
        }
        if let ValidationError::IncompleteCustom { ref missing } = err {
            self.add_log(format!("✗ 缺少字段: {}", missing.join(", ")));
        }
        self.page.show_error(err.to_string(), now);
    }

    fn isotope_display(&self, request: &SimulationRequest) -> String {
        match &request.custom {
            Some(custom) => custom.custom_name.clone(),
            None => self
                .catalog
                .display_name(&request.isotope)
                .unwrap_or(request.isotope.as_str())
                .to_string(),
        }
    }

    /// 点击 Run：采集表单、校验、占用守卫、发出请求
    pub fn submit_simulation(&mut self, now: Instant) {
        if !self.page.run.is_enabled() {
            return;
        }

        let request = build_simulation_request(&self.form);
        if let Err(err) = validate_simulation_request(&request) {
            self.reject(err, now);
            return;
        }

        let Some(token) = self.guard.acquire(RequestKind::Simulate) else {
            self.page.show_error(REQUEST_IN_PROGRESS, now);
            return;
        };

        self.page.run.begin();
        self.pending_isotope = Some(self.isotope_display(&request));
        info!("submit simulation {} isotope={}", token, request.isotope);
        self.add_log(format!("正在提交模拟: {}", request.isotope));

        if self
            .cmd_tx
            .send(AppCommand::Simulate { token, request })
            .is_err()
        {
            self.complete_simulation(token, Err(RequestError::Disconnected), now);
        }
    }

    /// 点击 Search：与 Run 共用同一个守卫
    pub fn submit_search(&mut self, now: Instant) {
        if !self.page.search.is_enabled() {
            return;
        }

        let query = build_search_query(&self.form);
        if let Err(err) = validate_search_query(&query) {
            self.reject(err, now);
            return;
        }

        let Some(token) = self.guard.acquire(RequestKind::Search) else {
            self.page.show_error(REQUEST_IN_PROGRESS, now);
            return;
        };

        self.page.search.begin();
        info!("submit search {} query={:?}", token, query.0);
        self.add_log(format!("正在检索: {}", query.0));

        if self.cmd_tx.send(AppCommand::Search { token, query }).is_err() {
            self.complete_search(token, Err(RequestError::Disconnected), now);
        }
    }

    fn complete_simulation(
        &mut self,
        token: RequestToken,
        outcome: Result<SimulationResult, RequestError>,
        now: Instant,
    ) {
        if self.guard.release(token).is_none() {
            warn!("ignore stale simulation result {}", token);
            return;
        }
        let isotope = self.pending_isotope.take().unwrap_or_default();
        match outcome {
            Ok(result) => {
                self.page.render_result(&result, &isotope);
                self.add_log(format!("✓ 模拟完成: {} ({} 个数据点)", isotope, result.data.len()));
            }
            Err(e) => {
                self.page.show_error(GENERIC_FAILURE, now);
                self.add_log(format!("✗ 模拟失败: {}", e));
            }
        }
        self.page.run.finish();
    }

    fn complete_search(
        &mut self,
        token: RequestToken,
        outcome: Result<SearchResponse, RequestError>,
        now: Instant,
    ) {
        if self.guard.release(token).is_none() {
            warn!("ignore stale search result {}", token);
            return;
        }
        match outcome {
            Ok(resp) => {
                let options = dataset_options(&resp);
                let count = options.len();
                self.page.datasets.replace(options);
                self.sync_dataset_selection();
                if resp.is_empty() {
                    self.add_log("⚠ 没有找到匹配的同位素".to_string());
                } else if count == 0 {
                    self.add_log("⚠ 没有找到 gamma 数据".to_string());
                } else {
                    self.add_log(format!("✓ 检索完成: {} 个 gamma 选项", count));
                }
            }
            Err(e) => {
                self.page.show_error(GENERIC_FAILURE, now);
                self.add_log(format!("✗ 检索失败: {}", e));
            }
        }
        self.page.search.finish();
    }

    pub fn apply_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::Log(msg) => self.add_log(msg),
            AppEvent::SimulationFinished { token, outcome } => {
                self.complete_simulation(token, outcome, now)
            }
            AppEvent::SearchFinished { token, outcome } => self.complete_search(token, outcome, now),
        }
    }

    // ---- 导出 ----

    fn finish_export(&mut self, result: Result<PathBuf, ExportError>) {
        match result {
            Ok(path) => self.add_log(format!("✓ 已保存: {}", path.display())),
            Err(ExportError::NoResult) => self.add_log("⚠ 还没有可保存的模拟结果".to_string()),
            Err(e) => self.add_log(format!("✗ 保存失败: {}", e)),
        }
    }

    pub fn save_image(&mut self, now: Instant) {
        if !self.page.save_image.is_enabled() {
            return;
        }
        let result = match self.page.plot.as_deref() {
            Some(plot) => DownloadArtifact::plot_image(plot)
                .and_then(|artifact| artifact.write_into(&self.download_dir)),
            None => Err(ExportError::NoResult),
        };
        self.finish_export(result);
        self.page.save_image.begin_for(now, SAVE_FEEDBACK);
    }

    pub fn save_json(&mut self, now: Instant) {
        if !self.page.save_json.is_enabled() {
            return;
        }
        let result = match self.page.json_download.clone() {
            Some(artifact) => artifact.write_into(&self.download_dir),
            None => Err(ExportError::NoResult),
        };
        self.finish_export(result);
        self.page.save_json.begin_for(now, SAVE_FEEDBACK);
    }

    pub fn tick(&mut self, now: Instant) {
        self.page.tick(now);
    }

    // ---- 命令 ----

    /// 执行一条表单命令，返回 true 表示退出
    pub fn execute(&mut self, cmd: FormCommand, now: Instant) -> bool {
        match cmd {
            FormCommand::Run => self.submit_simulation(now),
            FormCommand::Search(text) => {
                if let Some(text) = text {
                    self.form.isotope_search = text;
                }
                self.submit_search(now);
            }
            FormCommand::Set { field, value } => self.set_text(field, &value),
            FormCommand::Isotope(id) => self.set_isotope(&id),
            FormCommand::Unit(unit) => self.set_unit(&unit),
            FormCommand::Check(name) => self.set_checkbox(&name, true),
            FormCommand::Uncheck(name) => self.set_checkbox(&name, false),
            FormCommand::Dataset(index) => self.select_dataset(index),
            FormCommand::SaveImage => self.save_image(now),
            FormCommand::SaveJson => self.save_json(now),
            FormCommand::ToggleSettings => self.page.toggle_settings(),
            FormCommand::TogglePoints => self.page.toggle_data_points(),
            FormCommand::Help => self.add_log(HELP_TEXT.to_string()),
            FormCommand::Quit => {
                if self.guard.is_pending() {
                    warn!("quit with a request still pending");
                }
                let _ = self.cmd_tx.send(AppCommand::Quit);
                return true;
            }
            FormCommand::Unknown(msg) => {
                if !msg.is_empty() {
                    self.add_log(format!("✗ {}", msg));
                }
            }
        }
        false
    }

    pub fn get_completion_hint(&self) -> Option<String> {
        completion_hint(&self.command_input)
    }

    // ---- 焦点 ----

    /// 当前可见的表单条目
    pub fn form_items(&self) -> Vec<FormItem> {
        let mut items = vec![FormItem::Isotope];
        if self.page.custom_fields_visible {
            items.push(FormItem::Text(TextField::CustomName));
            items.push(FormItem::Text(TextField::CustomHalfLife));
            items.push(FormItem::HalfLifeUnit);
            items.push(FormItem::Text(TextField::CustomGamma));
        }
        items.push(FormItem::Text(TextField::InitialAmount));
        items.push(FormItem::SettingsToggle);
        if self.page.settings_visible {
            items.push(FormItem::Text(TextField::TimePoints));
            items.push(FormItem::Text(TextField::Noise));
        }
        items.extend((0..self.form.checkboxes.len()).map(FormItem::Checkbox));
        items.push(FormItem::Text(TextField::IsotopeSearch));
        items.push(FormItem::Button(ControlId::Search));
        items.push(FormItem::Datasets);
        items.push(FormItem::Button(ControlId::Run));
        items.push(FormItem::Button(ControlId::SaveImage));
        items.push(FormItem::Button(ControlId::SaveJson));
        items.push(FormItem::DataPointsToggle);
        items
    }

    pub fn focused_item(&self) -> Option<FormItem> {
        let items = self.form_items();
        items
            .get(self.focus_index.min(items.len().saturating_sub(1)))
            .copied()
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.form_items().len() as isize;
        let cur = (self.focus_index as isize).min(len - 1);
        self.focus_index = (cur + delta).clamp(0, len - 1) as usize;
    }

    fn activate(&mut self, item: FormItem, now: Instant) {
        match item {
            FormItem::Isotope => self.cycle_isotope(1),
            FormItem::Text(field) => self.input_mode = InputMode::Editing(field),
            FormItem::HalfLifeUnit => {
                self.form.custom_half_life_unit = self.form.custom_half_life_unit.cycle(1)
            }
            FormItem::SettingsToggle => self.page.toggle_settings(),
            FormItem::Checkbox(i) => self.toggle_checkbox(i),
            FormItem::Datasets => self.cycle_dataset(1),
            FormItem::Button(ControlId::Run) => self.submit_simulation(now),
            FormItem::Button(ControlId::Search) => self.submit_search(now),
            FormItem::Button(ControlId::SaveImage) => self.save_image(now),
            FormItem::Button(ControlId::SaveJson) => self.save_json(now),
            FormItem::DataPointsToggle => self.page.toggle_data_points(),
        }
    }

    fn step(&mut self, item: FormItem, delta: isize) {
        match item {
            FormItem::Isotope => self.cycle_isotope(delta),
            FormItem::HalfLifeUnit => {
                self.form.custom_half_life_unit = self.form.custom_half_life_unit.cycle(delta)
            }
            FormItem::Datasets => self.cycle_dataset(delta),
            _ => {}
        }
    }

    // ---- 按键 ----

    pub fn handle_key_event(&mut self, key: KeyCode, now: Instant) -> bool {
        match self.input_mode {
            InputMode::Command => self.handle_command_key(key, now),
            InputMode::Editing(field) => {
                match key {
                    KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => {
                        self.input_mode = InputMode::Normal;
                    }
                    KeyCode::Backspace => {
                        self.form.text_mut(field).pop();
                    }
                    KeyCode::Char(c) => self.form.text_mut(field).push(c),
                    _ => {}
                }
                false
            }
            InputMode::Normal => self.handle_normal_key(key, now),
        }
    }

    fn handle_normal_key(&mut self, key: KeyCode, now: Instant) -> bool {
        match key {
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                self.command_cursor = 0;
            }
            KeyCode::Char('q') => return self.execute(FormCommand::Quit, now),
            KeyCode::Up | KeyCode::BackTab => self.move_focus(-1),
            KeyCode::Down | KeyCode::Tab => self.move_focus(1),
            KeyCode::Left => {
                if let Some(item) = self.focused_item() {
                    self.step(item, -1);
                }
            }
            KeyCode::Right => {
                if let Some(item) = self.focused_item() {
                    self.step(item, 1);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(item) = self.focused_item() {
                    self.activate(item, now);
                }
            }
            KeyCode::Char('r') => self.submit_simulation(now),
            KeyCode::Char('s') => self.submit_search(now),
            KeyCode::Char('i') => self.save_image(now),
            KeyCode::Char('j') => self.save_json(now),
            KeyCode::Char('a') => self.page.toggle_settings(),
            KeyCode::Char('p') => self.page.toggle_data_points(),
            _ => {}
        }
        false
    }

    fn leave_command_mode(&mut self) {
        self.command_input.clear();
        self.command_cursor = 0;
        self.input_mode = InputMode::Normal;
    }

    fn handle_command_key(&mut self, key: KeyCode, now: Instant) -> bool {
        match key {
            KeyCode::Enter => {
                let cmd_owned = self.command_input.trim().to_string();
                self.leave_command_mode();
                if cmd_owned.is_empty() {
                    return false;
                }
                self.command_history.push(cmd_owned.clone());
                self.command_history_index = None;
                let cmd = FormCommand::from_str(&cmd_owned)
                    .unwrap_or_else(|_| FormCommand::Unknown(cmd_owned.clone()));
                return self.execute(cmd, now);
            }
            KeyCode::Esc => self.leave_command_mode(),
            KeyCode::Tab => {
                if let Some(hint) = self.get_completion_hint() {
                    let insert = format!("{} ", hint);
                    self.command_input.insert_str(self.command_cursor, &insert);
                    self.command_cursor += insert.len();
                }
            }
            KeyCode::Up => {
                if self.command_history.is_empty() {
                    return false;
                }
                let next = match self.command_history_index {
                    None => self.command_history.len().saturating_sub(1),
                    Some(i) => i.saturating_sub(1),
                };
                self.command_history_index = Some(next);
                if let Some(cmd) = self.command_history.get(next) {
                    self.command_input = cmd.clone();
                    self.command_cursor = self.command_input.len();
                }
            }
            KeyCode::Down => {
                let Some(i) = self.command_history_index else {
                    return false;
                };
                let n = i + 1;
                if n >= self.command_history.len() {
                    self.command_history_index = None;
                    self.command_input.clear();
                    self.command_cursor = 0;
                    return false;
                }
                self.command_history_index = Some(n);
                self.command_input = self.command_history[n].clone();
                self.command_cursor = self.command_input.len();
            }
            KeyCode::Backspace => {
                if self.command_cursor > 0 {
                    let prev = self.command_input[..self.command_cursor]
                        .chars()
                        .next_back()
                        .map(char::len_utf8)
                        .unwrap_or(1);
                    self.command_cursor -= prev;
                    self.command_input.remove(self.command_cursor);
                }
            }
            KeyCode::Delete => {
                if self.command_cursor < self.command_input.len() {
                    self.command_input.remove(self.command_cursor);
                }
            }
            KeyCode::Left => {
                if let Some(c) = self.command_input[..self.command_cursor].chars().next_back() {
                    self.command_cursor -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = self.command_input[self.command_cursor..].chars().next() {
                    self.command_cursor += c.len_utf8();
                }
            }
            KeyCode::Home => self.command_cursor = 0,
            KeyCode::End => self.command_cursor = self.command_input.len(),
            KeyCode::Char(c) => {
                self.command_input.insert(self.command_cursor, c);
                self.command_cursor += c.len_utf8();
            }
            _ => {}
        }
        false
    }
}
