use super::catalog::CUSTOM_ISOTOPE;
use super::dataset::DatasetOption;
use std::str::FromStr;

/// 复选框选项（表单顺序），决定后端绘制哪些曲线
pub const CHECKBOX_OPTIONS: [&str; 4] = ["remaining", "decayed", "gamma", "activity"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HalfLifeUnit {
    Seconds,
    Days,
    #[default]
    Years,
}

impl HalfLifeUnit {
    pub const ALL: [HalfLifeUnit; 3] = [HalfLifeUnit::Seconds, HalfLifeUnit::Days, HalfLifeUnit::Years];

    pub fn as_str(&self) -> &'static str {
        match self {
            HalfLifeUnit::Seconds => "s",
            HalfLifeUnit::Days => "d",
            HalfLifeUnit::Years => "y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HalfLifeUnit::Seconds => "seconds",
            HalfLifeUnit::Days => "days",
            HalfLifeUnit::Years => "years",
        }
    }

    pub fn cycle(self, delta: isize) -> Self {
        let idx = Self::ALL.iter().position(|u| *u == self).unwrap_or(0) as isize;
        Self::ALL[(idx + delta).rem_euclid(Self::ALL.len() as isize) as usize]
    }
}

impl FromStr for HalfLifeUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "seconds" => Ok(HalfLifeUnit::Seconds),
            "d" | "day" | "days" => Ok(HalfLifeUnit::Days),
            "y" | "yr" | "years" => Ok(HalfLifeUnit::Years),
            _ => Err(()),
        }
    }
}

/// 表单中可直接输入的文本字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    CustomName,
    CustomHalfLife,
    CustomGamma,
    InitialAmount,
    TimePoints,
    Noise,
    IsotopeSearch,
}

impl TextField {
    pub const ALL: [TextField; 7] = [
        TextField::CustomName,
        TextField::CustomHalfLife,
        TextField::CustomGamma,
        TextField::InitialAmount,
        TextField::TimePoints,
        TextField::Noise,
        TextField::IsotopeSearch,
    ];

    /// 表单字段名（同时也是请求体中的键名）
    pub fn name(&self) -> &'static str {
        match self {
            TextField::CustomName => "custom_name",
            TextField::CustomHalfLife => "custom_half_life",
            TextField::CustomGamma => "custom_gamma",
            TextField::InitialAmount => "initial_amount",
            TextField::TimePoints => "time_points",
            TextField::Noise => "noise",
            TextField::IsotopeSearch => "isotope_search",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TextField::CustomName => "Name",
            TextField::CustomHalfLife => "Half-life",
            TextField::CustomGamma => "Gamma (%)",
            TextField::InitialAmount => "Initial amount",
            TextField::TimePoints => "Time points",
            TextField::Noise => "Noise (%)",
            TextField::IsotopeSearch => "Search",
        }
    }
}

impl FromStr for TextField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == key || f.name().trim_start_matches("custom_") == key)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox {
    pub name: String,
    pub checked: bool,
}

/// 表单当前的全部输入
///
/// 由界面层修改，提交时交给 [`build_simulation_request`](super::build_simulation_request)。
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// 空字符串表示尚未选择
    pub isotope: String,
    pub custom_name: String,
    pub custom_half_life: String,
    pub custom_half_life_unit: HalfLifeUnit,
    pub custom_gamma: String,
    pub initial_amount: String,
    pub time_points: String,
    pub noise: String,
    pub checkboxes: Vec<Checkbox>,
    pub isotope_search: String,
    /// 检索结果中当前选中的 dataset；存在时覆盖同位素选择
    pub selected_dataset: Option<DatasetOption>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            isotope: String::new(),
            custom_name: String::new(),
            custom_half_life: String::new(),
            custom_half_life_unit: HalfLifeUnit::default(),
            custom_gamma: String::new(),
            initial_amount: "100".to_string(),
            time_points: "100".to_string(),
            noise: "0".to_string(),
            checkboxes: CHECKBOX_OPTIONS
                .iter()
                .map(|name| Checkbox {
                    name: name.to_string(),
                    checked: matches!(*name, "remaining" | "decayed"),
                })
                .collect(),
            isotope_search: String::new(),
            selected_dataset: None,
        }
    }
}

impl FormState {
    pub fn is_custom(&self) -> bool {
        self.isotope == CUSTOM_ISOTOPE
    }

    pub fn any_checked(&self) -> bool {
        self.checkboxes.iter().any(|c| c.checked)
    }

    /// 已勾选的选项名，保持表单顺序
    pub fn checked_names(&self) -> Vec<String> {
        self.checkboxes
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.name.clone())
            .collect()
    }

    /// 返回是否找到该复选框
    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        match self.checkboxes.iter_mut().find(|c| c.name == name) {
            Some(c) => {
                c.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn toggle_checkbox(&mut self, index: usize) {
        if let Some(c) = self.checkboxes.get_mut(index) {
            c.checked = !c.checked;
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::CustomName => &self.custom_name,
            TextField::CustomHalfLife => &self.custom_half_life,
            TextField::CustomGamma => &self.custom_gamma,
            TextField::InitialAmount => &self.initial_amount,
            TextField::TimePoints => &self.time_points,
            TextField::Noise => &self.noise,
            TextField::IsotopeSearch => &self.isotope_search,
        }
    }

    pub fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::CustomName => &mut self.custom_name,
            TextField::CustomHalfLife => &mut self.custom_half_life,
            TextField::CustomGamma => &mut self.custom_gamma,
            TextField::InitialAmount => &mut self.initial_amount,
            TextField::TimePoints => &mut self.time_points,
            TextField::Noise => &mut self.noise,
            TextField::IsotopeSearch => &mut self.isotope_search,
        }
    }
}
