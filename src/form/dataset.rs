use crate::session::dto::{value_text, SearchResponse};

/// 检索结果中的一条 gamma 发射记录，作为 dataset 下拉框的一个选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOption {
    pub dataset_id: String,
    pub energy: String,
    pub intensity: String,
    pub half_life: String,
    pub half_life_unit: String,
}

impl DatasetOption {
    pub fn label(&self) -> String {
        format!(
            "Dataset {}: γ: {}% - Energy: {} keV - T₁/₂: {} {}",
            self.dataset_id, self.intensity, self.energy, self.half_life, self.half_life_unit
        )
    }

    /// 选项值中冒号前的部分，用于拼接自定义同位素名
    pub fn short_name(&self) -> String {
        format!("Dataset {}", self.dataset_id)
    }
}

/// 只保留 type == "gamma" 的发射，按响应顺序展开
pub fn dataset_options(resp: &SearchResponse) -> Vec<DatasetOption> {
    let mut out = Vec::new();
    for (id, entry) in resp.datasets() {
        let (half_life, unit) = entry
            .isotope_data
            .first()
            .map(|d| (value_text(&d.half_life), value_text(&d.unit)))
            .unwrap_or_default();
        for emission in entry.gamma_emissions.iter().filter(|e| e.kind == "gamma") {
            out.push(DatasetOption {
                dataset_id: id.clone(),
                energy: value_text(&emission.energy),
                intensity: value_text(&emission.intensity),
                half_life: half_life.clone(),
                half_life_unit: unit.clone(),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn only_gamma_emissions_become_options() {
        let resp: SearchResponse = serde_json::from_value(json!({
            "Co60": {
                "3": {
                    "isotope_data": [{ "half_life": "5.27", "unit": "y", "decay_mode": "B-" }],
                    "gamma_emissions": [
                        { "type": "gamma", "intensity": 99.9, "energy": 1173 },
                        { "type": "X-ray", "intensity": "0.1", "energy": "7.5" },
                        { "type": "gamma", "intensity": "99.98", "energy": "1332.49" }
                    ]
                }
            }
        }))
        .unwrap();

        let options = dataset_options(&resp);
        assert_eq!(options.len(), 2);
        assert_eq!(
            options[0],
            DatasetOption {
                dataset_id: "3".to_string(),
                energy: "1173".to_string(),
                intensity: "99.9".to_string(),
                half_life: "5.27".to_string(),
                half_life_unit: "y".to_string(),
            }
        );
        assert_eq!(
            options[1].label(),
            "Dataset 3: γ: 99.98% - Energy: 1332.49 keV - T₁/₂: 5.27 y"
        );
    }

    #[test]
    fn whole_number_floats_are_labelled_without_fraction() {
        let resp: SearchResponse = serde_json::from_value(json!({
            "X": {
                "1": {
                    "isotope_data": [{ "half_life": 5.0, "unit": "y" }],
                    "gamma_emissions": [{ "type": "gamma", "intensity": 100.0, "energy": 1173.0 }]
                }
            }
        }))
        .unwrap();

        let options = dataset_options(&resp);
        assert_eq!(
            options[0].label(),
            "Dataset 1: γ: 100% - Energy: 1173 keV - T₁/₂: 5 y"
        );
        assert_eq!(options[0].intensity, "100");
    }

    #[test]
    fn empty_response_yields_no_options() {
        assert!(dataset_options(&SearchResponse::default()).is_empty());
    }
}
