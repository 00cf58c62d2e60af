use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// POST /simulate 的请求体
///
/// 所有数值字段都按表单原样以字符串发送，由后端负责解析。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub isotope: String,
    pub initial_amount: String,
    pub time_points: String,
    pub noise: String,
    #[serde(rename = "checkedBoxes")]
    pub checked_boxes: Vec<String>,
    #[serde(flatten)]
    pub custom: Option<CustomIsotope>,
}

/// 仅在 isotope == "custom" 时出现的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomIsotope {
    pub custom_name: String,
    pub custom_half_life: String,
    pub custom_half_life_unit: String,
    pub custom_gamma: String,
}

/// POST /search 的请求体：一个裸 JSON 字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// base64 编码的 PNG
    pub plot: String,
    pub data: Vec<DataPoint>,
}

/// 后端已把数值格式化为字符串；这里保留原始 JSON 值，渲染和导出都原样使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub time: Value,
    pub remaining: Value,
    pub decayed: Value,
    pub rate: Value,
    pub gamma: Value,
}

impl DataPoint {
    /// 表格一行的五个单元格，顺序与表头一致
    pub fn cells(&self) -> [String; 5] {
        [
            value_text(&self.time),
            value_text(&self.remaining),
            value_text(&self.decayed),
            value_text(&self.rate),
            value_text(&self.gamma),
        ]
    }
}

/// POST /search 的响应：dataset 分组 -> dataset id -> 条目
///
/// 依赖 serde_json 的 preserve_order，保持后端返回的顺序。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SearchResponse(pub Map<String, Value>);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetEntry {
    #[serde(default)]
    pub isotope_data: Vec<IsotopeData>,
    #[serde(default)]
    pub gamma_emissions: Vec<GammaEmission>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IsotopeData {
    #[serde(default)]
    pub half_life: Value,
    #[serde(default)]
    pub unit: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GammaEmission {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub intensity: Value,
    #[serde(default)]
    pub energy: Value,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按响应顺序展开为 (dataset id, 条目)；无法解析的条目跳过
    pub fn datasets(&self) -> Vec<(String, DatasetEntry)> {
        let mut out = Vec::new();
        for group in self.0.values() {
            let Some(group) = group.as_object() else {
                continue;
            };
            for (id, raw) in group {
                match serde_json::from_value::<DatasetEntry>(raw.clone()) {
                    Ok(entry) => out.push((id.clone(), entry)),
                    Err(e) => log::warn!("skip dataset {}: {}", id, e),
                }
            }
        }
        out
    }
}

/// 把 JSON 值按页面显示的样子转成文本：字符串不带引号，null 为空，整数值的浮点数不带 `.0`
pub fn value_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn catalog_request_has_no_custom_keys() {
        let req = SimulationRequest {
            isotope: "cobalt-60".to_string(),
            initial_amount: "100".to_string(),
            time_points: "50".to_string(),
            noise: "0".to_string(),
            checked_boxes: vec!["remaining".to_string()],
            custom: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "isotope": "cobalt-60",
                "initial_amount": "100",
                "time_points": "50",
                "noise": "0",
                "checkedBoxes": ["remaining"]
            })
        );
    }

    #[test]
    fn whole_floats_print_like_integers() {
        assert_eq!(value_text(&json!(100.0)), "100");
        assert_eq!(value_text(&json!(1173.0)), "1173");
        assert_eq!(value_text(&json!(-2.0)), "-2");
        assert_eq!(value_text(&json!(99.9)), "99.9");
        assert_eq!(value_text(&json!(5.27)), "5.27");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!("5.0")), "5.0");
        assert_eq!(value_text(&json!(null)), "");
    }

    #[test]
    fn search_query_is_a_bare_string() {
        let body = serde_json::to_string(&SearchQuery("cobalt".to_string())).unwrap();
        assert_eq!(body, "\"cobalt\"");
    }

    #[test]
    fn data_point_cells_are_verbatim() {
        let point: DataPoint = serde_json::from_value(json!({
            "time": "0.00",
            "remaining": "100.00",
            "decayed": "0.00",
            "rate": "13.16",
            "gamma": 7
        }))
        .unwrap();
        assert_eq!(point.cells(), ["0.00", "100.00", "0.00", "13.16", "7"]);
    }

    #[test]
    fn datasets_keep_response_order() {
        let resp: SearchResponse = serde_json::from_value(json!({
            "group-b": {
                "9": { "isotope_data": [], "gamma_emissions": [] },
                "2": { "isotope_data": [], "gamma_emissions": [] }
            },
            "group-a": {
                "5": { "gamma_emissions": [] }
            }
        }))
        .unwrap();
        let ids: Vec<String> = resp.datasets().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["9", "2", "5"]);
    }
}
