pub mod payroll;
pub mod person;
pub mod report;
pub mod shift;
pub mod user;

use std::collections::HashMap;
use chrono::NaiveDate;
use crate::error::AppError;

// Optional ?start_date / ?end_date filters. Blank counts as absent; a
// malformed date is a client error, never an accidentally unfiltered list.
pub(crate) fn date_param(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<NaiveDate>, AppError> {
    match params.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("{key} must be formatted as YYYY-MM-DD"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(key: &str, value: &str) -> HashMap<String, String> {
        HashMap::from([(key.to_string(), value.to_string())])
    }

    #[test]
    fn date_param_parses_and_treats_blank_as_absent() {
        let found = date_param(&params("start_date", "2024-12-01"), "start_date").unwrap();
        assert_eq!(found, NaiveDate::from_ymd_opt(2024, 12, 1));

        assert_eq!(date_param(&params("start_date", "  "), "start_date").unwrap(), None);
        assert_eq!(date_param(&HashMap::new(), "start_date").unwrap(), None);
    }

    #[test]
    fn date_param_rejects_malformed_dates() {
        let err = date_param(&params("end_date", "garbage"), "end_date").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(date_param(&params("end_date", "2024-13-01"), "end_date").is_err());
    }
}
