//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, PlanCode};

pub(crate) fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

pub(crate) fn require_field<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid, Error> {
    Uuid::from_str(value).map_err(|_| {
        Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
            "field": field,
            "value": value,
            "code": "invalid_uuid",
        }))
    })
}

pub(crate) fn parse_plan_code(value: &str, field: &str) -> Result<PlanCode, Error> {
    PlanCode::from_str(value).map_err(|_| {
        Error::invalid_request(format!(
            "{field} must be one of 1M, 2M, 3M, 6M or Lifetime"
        ))
        .with_details(json!({
            "field": field,
            "value": value,
            "code": "invalid_plan_code",
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[test]
    fn missing_field_names_the_field() {
        let error = require_field(None::<String>, "plan").expect_err("missing");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error
            .details()
            .and_then(|value| value.as_object())
            .expect("details");
        assert_eq!(details.get("field").and_then(|v| v.as_str()), Some("plan"));
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    fn rejects_malformed_uuids(#[case] value: &str) {
        let error = parse_uuid(value, "studentId").expect_err("bad uuid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case("1M")]
    #[case("Lifetime")]
    fn accepts_known_plan_codes(#[case] value: &str) {
        parse_plan_code(value, "plan").expect("known plan");
    }

    #[test]
    fn rejects_unknown_plan_codes() {
        let error = parse_plan_code("4M", "plan").expect_err("unknown plan");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error
            .details()
            .and_then(|value| value.as_object())
            .expect("details");
        assert_eq!(details.get("value").and_then(|v| v.as_str()), Some("4M"));
    }
}
