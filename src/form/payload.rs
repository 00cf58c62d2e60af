use super::catalog::CUSTOM_ISOTOPE;
use super::state::FormState;
use crate::session::dto::{CustomIsotope, SearchQuery, SimulationRequest};

/// 由表单状态构造模拟请求（纯函数，不做校验）
///
/// 选中了检索得到的 dataset 时，请求改为 custom，并用该 dataset 的半衰期与强度填充。
pub fn build_simulation_request(form: &FormState) -> SimulationRequest {
    let mut request = SimulationRequest {
        isotope: form.isotope.clone(),
        initial_amount: form.initial_amount.clone(),
        time_points: form.time_points.clone(),
        noise: form.noise.clone(),
        checked_boxes: form.checked_names(),
        custom: None,
    };

    if form.is_custom() {
        request.custom = Some(CustomIsotope {
            custom_name: form.custom_name.clone(),
            custom_half_life: form.custom_half_life.clone(),
            custom_half_life_unit: form.custom_half_life_unit.as_str().to_string(),
            custom_gamma: form.custom_gamma.clone(),
        });
    }

    if let Some(option) = &form.selected_dataset {
        request.isotope = CUSTOM_ISOTOPE.to_string();
        request.custom = Some(CustomIsotope {
            custom_name: format!("{} - {}", form.isotope_search, option.short_name()),
            custom_half_life: option.half_life.clone(),
            custom_half_life_unit: option.half_life_unit.clone(),
            custom_gamma: option.intensity.clone(),
        });
    }

    request
}

pub fn build_search_query(form: &FormState) -> SearchQuery {
    SearchQuery(form.isotope_search.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{DatasetOption, HalfLifeUnit};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn custom_isotope_fields_are_sent() {
        let mut form = FormState::default();
        form.isotope = "custom".to_string();
        form.custom_name = "Test-1".to_string();
        form.custom_half_life = "10".to_string();
        form.custom_half_life_unit = HalfLifeUnit::Days;
        form.custom_gamma = "50%".to_string();

        let body = serde_json::to_value(build_simulation_request(&form)).unwrap();
        assert_eq!(
            body,
            json!({
                "isotope": "custom",
                "initial_amount": "100",
                "time_points": "100",
                "noise": "0",
                "checkedBoxes": ["remaining", "decayed"],
                "custom_name": "Test-1",
                "custom_half_life": "10",
                "custom_half_life_unit": "d",
                "custom_gamma": "50%"
            })
        );
    }

    #[test]
    fn stale_custom_inputs_are_dropped_for_catalog_isotopes() {
        let mut form = FormState::default();
        form.isotope = "iodine-131".to_string();
        form.custom_name = "leftover".to_string();

        let request = build_simulation_request(&form);
        assert_eq!(request.isotope, "iodine-131");
        assert_eq!(request.custom, None);
    }

    #[test]
    fn selected_dataset_overrides_isotope() {
        let mut form = FormState::default();
        form.isotope = "carbon-14".to_string();
        form.isotope_search = "cobalt".to_string();
        form.selected_dataset = Some(DatasetOption {
            dataset_id: "3".to_string(),
            energy: "1173".to_string(),
            intensity: "99.9".to_string(),
            half_life: "5.27".to_string(),
            half_life_unit: "y".to_string(),
        });

        let request = build_simulation_request(&form);
        assert_eq!(request.isotope, "custom");
        assert_eq!(
            request.custom,
            Some(CustomIsotope {
                custom_name: "cobalt - Dataset 3".to_string(),
                custom_half_life: "5.27".to_string(),
                custom_half_life_unit: "y".to_string(),
                custom_gamma: "99.9".to_string(),
            })
        );
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("isotope_search").is_none());
    }

    #[test]
    fn search_query_is_trimmed() {
        let mut form = FormState::default();
        form.isotope_search = "  cobalt ".to_string();
        assert_eq!(build_search_query(&form), SearchQuery("cobalt".to_string()));
    }
}
