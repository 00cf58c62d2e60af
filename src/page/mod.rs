//! 页面视图模型：表单之外的所有可见元素（按钮、横幅、结果区、下载物）

pub mod banner;
pub mod controls;
pub mod datasets;

pub use banner::BannerStack;
pub use controls::{Control, ControlId};
pub use datasets::DatasetSelect;

use crate::export::DownloadArtifact;
use crate::session::dto::SimulationResult;
use log::warn;
use std::time::Instant;

pub const SHOW_SETTINGS_LABEL: &str = "Show Advanced Settings";
pub const HIDE_SETTINGS_LABEL: &str = "Hide Advanced Settings";
pub const SHOW_POINTS_LABEL: &str = "Show Data Points";
pub const HIDE_POINTS_LABEL: &str = "Hide Data Points";

pub const TABLE_HEADER: [&str; 5] = ["Time", "Remaining", "Decayed", "Rate", "Gamma"];

#[derive(Debug, Clone)]
pub struct PageState {
    pub results_visible: bool,
    /// 最近一次结果的 base64 图像
    pub plot: Option<String>,
    pub table: Vec<[String; 5]>,
    pub data_points_visible: bool,
    pub settings_visible: bool,
    pub custom_fields_visible: bool,
    pub isotope_select_enabled: bool,
    pub selected_isotope_display: String,
    pub datasets: DatasetSelect,
    pub banners: BannerStack,
    pub run: Control,
    pub search: Control,
    pub save_image: Control,
    pub save_json: Control,
    /// 最近一次结果的 JSON 下载物，每次渲染都会替换
    pub json_download: Option<DownloadArtifact>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            results_visible: false,
            plot: None,
            table: Vec::new(),
            data_points_visible: false,
            settings_visible: false,
            custom_fields_visible: false,
            isotope_select_enabled: true,
            selected_isotope_display: String::new(),
            datasets: DatasetSelect::default(),
            banners: BannerStack::default(),
            run: Control::new(ControlId::Run),
            search: Control::new(ControlId::Search),
            save_image: Control::new(ControlId::SaveImage),
            save_json: Control::new(ControlId::SaveJson),
            json_download: None,
        }
    }
}

impl PageState {
    /// 图像元素的 src
    pub fn plot_src(&self) -> Option<String> {
        self.plot
            .as_ref()
            .map(|b64| format!("data:image/png;base64,{}", b64))
    }

    pub fn render_result(&mut self, result: &SimulationResult, isotope_display: &str) {
        self.plot = Some(result.plot.clone());
        self.table = result.data.iter().map(|p| p.cells()).collect();
        self.results_visible = true;
        self.data_points_visible = false;
        self.selected_isotope_display = isotope_display.to_string();
        self.json_download = match DownloadArtifact::data_json(isotope_display, &result.data) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                warn!("build json download failed: {}", e);
                None
            }
        };
    }

    /// 隐藏结果区（不清除已有数据）
    pub fn reset_results(&mut self) {
        self.results_visible = false;
        self.data_points_visible = false;
    }

    pub fn show_error(&mut self, message: impl Into<String>, now: Instant) {
        self.banners.push(message, now);
    }

    pub fn toggle_settings(&mut self) {
        self.settings_visible = !self.settings_visible;
    }

    pub fn settings_label(&self) -> &'static str {
        if self.settings_visible {
            HIDE_SETTINGS_LABEL
        } else {
            SHOW_SETTINGS_LABEL
        }
    }

    pub fn toggle_data_points(&mut self) {
        self.data_points_visible = !self.data_points_visible;
    }

    pub fn data_points_label(&self) -> &'static str {
        if self.data_points_visible {
            HIDE_POINTS_LABEL
        } else {
            SHOW_POINTS_LABEL
        }
    }

    pub fn control(&self, id: ControlId) -> &Control {
        match id {
            ControlId::Run => &self.run,
            ControlId::Search => &self.search,
            ControlId::SaveImage => &self.save_image,
            ControlId::SaveJson => &self.save_json,
        }
    }

    /// 横幅到期移除、保存按钮恢复
    pub fn tick(&mut self, now: Instant) {
        self.banners.expire(now);
        self.save_image.tick(now);
        self.save_json.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::dto::DataPoint;
    use serde_json::json;

    fn point(t: &str) -> DataPoint {
        serde_json::from_value(json!({
            "time": t, "remaining": "50.00", "decayed": "50.00", "rate": "3.47", "gamma": "12"
        }))
        .unwrap()
    }

    #[test]
    fn render_result_rebuilds_table_in_order() {
        let mut page = PageState::default();
        page.data_points_visible = true;
        let result = SimulationResult {
            plot: "iVBORw0KGgo=".to_string(),
            data: vec![point("0.00"), point("1.00"), point("2.00")],
        };
        page.render_result(&result, "Cobalt-60");

        assert!(page.results_visible);
        assert!(!page.data_points_visible);
        assert_eq!(page.data_points_label(), "Show Data Points");
        assert_eq!(page.table.len(), 3);
        let times: Vec<&str> = page.table.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(times, vec!["0.00", "1.00", "2.00"]);
        assert_eq!(page.table[1], ["1.00", "50.00", "50.00", "3.47", "12"].map(String::from));
        assert_eq!(page.plot_src().as_deref(), Some("data:image/png;base64,iVBORw0KGgo="));
        assert_eq!(page.selected_isotope_display, "Cobalt-60");
    }

    #[test]
    fn second_render_replaces_json_download() {
        let mut page = PageState::default();
        page.render_result(
            &SimulationResult {
                plot: String::new(),
                data: vec![point("0.00")],
            },
            "Cobalt-60",
        );
        page.render_result(
            &SimulationResult {
                plot: String::new(),
                data: vec![point("0.00"), point("1.00")],
            },
            "Iodine-131",
        );
        let artifact = page.json_download.as_ref().unwrap();
        assert_eq!(artifact.file_name, "Iodine-131_data.json");
        let parsed: Vec<DataPoint> = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn toggles_mirror_labels() {
        let mut page = PageState::default();
        assert_eq!(page.settings_label(), "Show Advanced Settings");
        page.toggle_settings();
        assert_eq!(page.settings_label(), "Hide Advanced Settings");
        page.toggle_data_points();
        assert_eq!(page.data_points_label(), "Hide Data Points");
        page.toggle_data_points();
        assert_eq!(page.data_points_label(), "Show Data Points");
    }
}
