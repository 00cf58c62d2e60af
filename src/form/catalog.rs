use crate::config::ConfigError;

/// 下拉框中代表“自定义同位素”的保留值
pub const CUSTOM_ISOTOPE: &str = "custom";
pub const CUSTOM_ISOTOPE_LABEL: &str = "Custom Isotope";
pub const PLACEHOLDER_LABEL: &str = "Select an isotope";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

/// 后端已知的同位素目录（id -> 显示名）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsotopeCatalog {
    entries: Vec<CatalogEntry>,
}

impl IsotopeCatalog {
    pub fn builtin() -> Self {
        let entries = [
            ("carbon-14", "Carbon-14"),
            ("radium-226", "Radium-226"),
            ("cobalt-60", "Cobalt-60"),
            ("iodine-131", "Iodine-131"),
            ("uranium-238", "Uranium-238"),
            ("cesium-137", "Cesium-137"),
        ]
        .iter()
        .map(|(id, name)| CatalogEntry {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect();
        Self { entries }
    }

    /// 解析 `id=Name,id=Name`；只写 id 时显示名与 id 相同
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut entries = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (id, name) = match item.split_once('=') {
                Some((id, name)) => (id.trim(), name.trim()),
                None => (item, item),
            };
            if id.is_empty() || id == CUSTOM_ISOTOPE {
                return Err(ConfigError::Catalog(item.to_string()));
            }
            entries.push(CatalogEntry {
                id: id.to_string(),
                name: (if name.is_empty() { id } else { name }).to_string(),
            });
        }
        if entries.is_empty() {
            return Err(ConfigError::Catalog(raw.to_string()));
        }
        Ok(Self { entries })
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }

    /// 同位素下拉框的全部选项 (value, label)：占位项、目录、自定义
    pub fn select_options(&self) -> Vec<(String, String)> {
        let mut out = vec![(String::new(), PLACEHOLDER_LABEL.to_string())];
        out.extend(
            self.entries
                .iter()
                .map(|e| (e.id.clone(), e.name.clone())),
        );
        out.push((CUSTOM_ISOTOPE.to_string(), CUSTOM_ISOTOPE_LABEL.to_string()));
        out
    }

    /// 在下拉框中从 `current` 移动 `delta` 步（循环）
    pub fn cycle(&self, current: &str, delta: isize) -> String {
        let options = self.select_options();
        let len = options.len() as isize;
        let idx = options
            .iter()
            .position(|(v, _)| v == current)
            .unwrap_or(0) as isize;
        let next = (idx + delta).rem_euclid(len) as usize;
        options[next].0.clone()
    }

    /// 下拉框是否包含该值
    pub fn accepts(&self, value: &str) -> bool {
        value.is_empty() || value == CUSTOM_ISOTOPE || self.display_name(value).is_some()
    }
}

impl Default for IsotopeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
