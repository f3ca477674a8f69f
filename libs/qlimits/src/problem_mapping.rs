//! Mapping from validation errors to Problem (pure data)
//!
//! The validator only returns machine-checkable errors; this is where they
//! become protocol responses. Limit violations and unreadable values are
//! client errors (400) carrying the structured data in extension members.
//! Anything else is a server error.

use qlimits_errors::Problem;

use crate::Error;
use crate::errors::{INTERNAL, INVALID_VALUE, LIMIT_EXCEEDED};

impl From<Error> for Problem {
    fn from(err: Error) -> Self {
        match err {
            Error::LimitExceeded {
                limit,
                requested,
                dimension,
                scope,
            } => LIMIT_EXCEEDED
                .as_problem(format!(
                    "The limit of {limit} for {dimension} has been exceeded (requested {requested})"
                ))
                .with_extension("dimension", dimension.as_str())
                .with_extension("limit", limit)
                .with_extension("requested", requested)
                .with_extension("scope", scope.to_string()),

            Error::InvalidValue { dimension, raw } => {
                let problem = match dimension {
                    Some(d) => INVALID_VALUE
                        .as_problem(format!("Invalid value '{raw}' for {d}"))
                        .with_extension("dimension", d.as_str()),
                    None => INVALID_VALUE.as_problem(format!("Malformed query string: {raw}")),
                };
                problem.with_extension("value", raw)
            }

            Error::InvalidArgument(_) => INTERNAL
                .as_problem("An internal error occurred while validating the query options"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Dimension;
    use crate::resolver::LimitScope;
    use http::StatusCode;
    use serde_json::json;

    #[test]
    fn limit_exceeded_converts_to_bad_request() {
        let problem: Problem = Error::LimitExceeded {
            limit: 10,
            requested: 20,
            dimension: Dimension::Top,
            scope: LimitScope::Property,
        }
        .into();

        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert_eq!(problem.code, "qlimits.limit_exceeded.v1");
        assert!(problem.detail.contains("$top"));
        assert_eq!(problem.extension("dimension"), Some(&json!("$top")));
        assert_eq!(problem.extension("limit"), Some(&json!(10)));
        assert_eq!(problem.extension("requested"), Some(&json!(20)));
        assert_eq!(problem.extension("scope"), Some(&json!("property")));
    }

    #[test]
    fn invalid_value_converts_to_bad_request() {
        let problem: Problem = Error::InvalidValue {
            dimension: Some(Dimension::Skip),
            raw: "ten".to_owned(),
        }
        .into();

        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert_eq!(problem.code, "qlimits.invalid_value.v1");
        assert_eq!(problem.extension("dimension"), Some(&json!("$skip")));
        assert_eq!(problem.extension("value"), Some(&json!("ten")));
    }

    #[test]
    fn invalid_argument_is_server_error() {
        let problem: Problem = Error::InvalidArgument("evaluation context is required").into();

        assert_eq!(problem.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.code, "qlimits.internal.v1");
        assert!(!problem.detail.contains("evaluation context"));
        assert!(problem.extensions.is_empty());
    }

    #[test]
    fn rendered_body_contains_limit_data() {
        let problem: Problem = Error::LimitExceeded {
            limit: 100,
            requested: 150,
            dimension: Dimension::Top,
            scope: LimitScope::Global,
        }
        .into();
        let body = serde_json::to_value(&problem).unwrap();

        assert_eq!(body["status"], 400);
        assert_eq!(body["limit"], 100);
        assert_eq!(body["requested"], 150);
        assert_eq!(body["dimension"], "$top");
    }
}
