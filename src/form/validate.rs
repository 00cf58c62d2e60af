use super::catalog::CUSTOM_ISOTOPE;
use crate::session::dto::{SearchQuery, SimulationRequest};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select an isotope.")]
    NoIsotope,
    /// 多个缺失字段只报一条消息
    #[error("Please fill in all custom isotope fields")]
    IncompleteCustom { missing: Vec<&'static str> },
    #[error("Input values out of range or malformed.")]
    OutOfRange,
    #[error("Please enter an isotope to search.")]
    EmptySearch,
}

/// 与后端相同的取值范围
pub fn is_input_valid(initial_amount: f64, time_points: i64, noise: i64) -> bool {
    initial_amount >= 1.0 && (10..=1000).contains(&time_points) && (0..=20).contains(&noise)
}

/// 提交前的同步校验，失败时不会发出任何请求
pub fn validate_simulation_request(request: &SimulationRequest) -> Result<(), ValidationError> {
    if request.isotope.trim().is_empty() {
        return Err(ValidationError::NoIsotope);
    }

    if request.isotope == CUSTOM_ISOTOPE {
        let mut missing = Vec::new();
        match &request.custom {
            Some(custom) => {
                if custom.custom_name.trim().is_empty() {
                    missing.push("custom_name");
                }
                if custom.custom_half_life.trim().is_empty() {
                    missing.push("custom_half_life");
                }
                if custom.custom_gamma.trim().is_empty() {
                    missing.push("custom_gamma");
                }
            }
            None => missing.extend(["custom_name", "custom_half_life", "custom_gamma"]),
        }
        if !missing.is_empty() {
            return Err(ValidationError::IncompleteCustom { missing });
        }
    }

    let initial_amount = request.initial_amount.trim().parse::<f64>();
    let time_points = request.time_points.trim().parse::<i64>();
    let noise = request.noise.trim().parse::<i64>();
    match (initial_amount, time_points, noise) {
        (Ok(a), Ok(t), Ok(n)) if a.is_finite() && is_input_valid(a, t, n) => Ok(()),
        _ => Err(ValidationError::OutOfRange),
    }
}

pub fn validate_search_query(query: &SearchQuery) -> Result<(), ValidationError> {
    if query.0.trim().is_empty() {
        return Err(ValidationError::EmptySearch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::dto::CustomIsotope;

    fn request(isotope: &str) -> SimulationRequest {
        SimulationRequest {
            isotope: isotope.to_string(),
            initial_amount: "100".to_string(),
            time_points: "100".to_string(),
            noise: "5".to_string(),
            checked_boxes: vec!["remaining".to_string()],
            custom: None,
        }
    }

    fn custom(name: &str, half_life: &str, gamma: &str) -> SimulationRequest {
        let mut req = request("custom");
        req.custom = Some(CustomIsotope {
            custom_name: name.to_string(),
            custom_half_life: half_life.to_string(),
            custom_half_life_unit: "s".to_string(),
            custom_gamma: gamma.to_string(),
        });
        req
    }

    #[test]
    fn empty_isotope_is_rejected() {
        assert_eq!(
            validate_simulation_request(&request("")),
            Err(ValidationError::NoIsotope)
        );
        assert_eq!(validate_simulation_request(&request("cobalt-60")), Ok(()));
    }

    #[test]
    fn every_missing_custom_field_gives_the_same_message() {
        for req in [
            custom("", "10", "50%"),
            custom("Test-1", "", "50%"),
            custom("Test-1", "10", ""),
            custom(" ", "", ""),
        ] {
            let err = validate_simulation_request(&req).unwrap_err();
            assert_eq!(err.to_string(), "Please fill in all custom isotope fields");
        }
        assert_eq!(validate_simulation_request(&custom("Test-1", "10", "50%")), Ok(()));
    }

    #[test]
    fn whitespace_only_custom_fields_count_as_missing() {
        let err = validate_simulation_request(&custom("Test-1", "   ", "\t")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IncompleteCustom {
                missing: vec!["custom_half_life", "custom_gamma"]
            }
        );
    }

    #[test]
    fn missing_fields_are_listed() {
        let err = validate_simulation_request(&custom("", "10", "")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IncompleteCustom {
                missing: vec!["custom_name", "custom_gamma"]
            }
        );
    }

    #[test]
    fn numeric_ranges_match_backend() {
        let mut req = request("cobalt-60");
        req.time_points = "5".to_string();
        assert_eq!(validate_simulation_request(&req), Err(ValidationError::OutOfRange));

        let mut req = request("cobalt-60");
        req.noise = "21".to_string();
        assert_eq!(validate_simulation_request(&req), Err(ValidationError::OutOfRange));

        let mut req = request("cobalt-60");
        req.initial_amount = "abc".to_string();
        assert_eq!(validate_simulation_request(&req), Err(ValidationError::OutOfRange));

        assert!(is_input_valid(1.0, 10, 0));
        assert!(is_input_valid(1e6, 1000, 20));
        assert!(!is_input_valid(0.5, 10, 0));
    }

    #[test]
    fn blank_search_is_rejected() {
        assert_eq!(
            validate_search_query(&SearchQuery("  ".to_string())),
            Err(ValidationError::EmptySearch)
        );
        assert_eq!(validate_search_query(&SearchQuery("Co60".to_string())), Ok(()));
    }
}
