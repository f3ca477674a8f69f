//! Whole-request validation
//!
//! [`QueryRequest`] carries the numeric inputs extracted from a query string;
//! [`QueryValidator`] runs one [`QueryOptionValidator`] per dimension over them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::context::EvaluationContext;
use crate::option::QueryOption;
use crate::validator::{LimitValidator, QueryOptionValidator};
use crate::{Dimension, Error, ValidationSettings};

/// Numeric query inputs of one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub struct QueryRequest {
    pub top: Option<u64>,
    pub skip: Option<u64>,
    /// Number of `$orderby` clauses
    pub orderby_nodes: Option<u64>,
    /// `$expand` nesting depth
    pub expansion_depth: Option<u64>,
}

#[derive(Deserialize)]
struct RawParams {
    #[serde(rename = "$top")]
    top: Option<String>,
    #[serde(rename = "$skip")]
    skip: Option<String>,
    #[serde(rename = "$orderby")]
    orderby: Option<String>,
    #[serde(rename = "$expand")]
    expand: Option<String>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top(mut self, top: u64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_orderby_nodes(mut self, nodes: u64) -> Self {
        self.orderby_nodes = Some(nodes);
        self
    }

    pub fn with_expansion_depth(mut self, depth: u64) -> Self {
        self.expansion_depth = Some(depth);
        self
    }

    /// Requested value for a dimension
    #[must_use]
    pub fn value(&self, dimension: Dimension) -> Option<u64> {
        match dimension {
            Dimension::Top => self.top,
            Dimension::Skip => self.skip,
            Dimension::OrderBy => self.orderby_nodes,
            Dimension::Expand => self.expansion_depth,
        }
    }

    /// Extract numeric inputs from a URL query string (leading `?` allowed).
    ///
    /// Only `$top`, `$skip`, `$orderby` and `$expand` are looked at; other
    /// parameters are ignored.
    ///
    /// # Errors
    /// Returns `Error::InvalidValue` if the query string cannot be decoded, if
    /// `$top`/`$skip` are not plain digit sequences fitting a `u64`, or if `$orderby`/`$expand`
    /// are empty.
    pub fn from_query_str(query: &str) -> Result<Self, Error> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let raw: RawParams = serde_urlencoded::from_str(query).map_err(|e| Error::InvalidValue {
            dimension: None,
            raw: e.to_string(),
        })?;

        Ok(Self {
            top: raw
                .top
                .map(|v| parse_count(Dimension::Top, &v))
                .transpose()?,
            skip: raw
                .skip
                .map(|v| parse_count(Dimension::Skip, &v))
                .transpose()?,
            orderby_nodes: raw.orderby.map(|v| orderby_nodes(&v)).transpose()?,
            expansion_depth: raw.expand.map(|v| expansion_depth(&v)).transpose()?,
        })
    }
}

/// `1*DIGIT`: no sign, no whitespace.
fn parse_count(dimension: Dimension, raw: &str) -> Result<u64, Error> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(dimension, raw));
    }
    raw.parse::<u64>().map_err(|_| invalid(dimension, raw))
}

/// Count comma-separated clauses outside parentheses.
fn orderby_nodes(raw: &str) -> Result<u64, Error> {
    let mut depth = 0_usize;
    let mut nodes = 0_u64;
    let mut current_empty = true;

    for ch in raw.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                if current_empty {
                    return Err(invalid(Dimension::OrderBy, raw));
                }
                nodes += 1;
                current_empty = true;
                continue;
            }
            _ => {}
        }
        if !ch.is_whitespace() {
            current_empty = false;
        }
    }
    if current_empty {
        return Err(invalid(Dimension::OrderBy, raw));
    }
    Ok(nodes + 1)
}

/// Nesting depth of an `$expand` value: one plus the deepest parenthesis
/// level that contains a nested `$expand=`.
fn expansion_depth(raw: &str) -> Result<u64, Error> {
    const NESTED: &str = "$expand=";

    if raw.trim().is_empty() {
        return Err(invalid(Dimension::Expand, raw));
    }

    let mut depth = 0_u64;
    let mut deepest = 0_u64;
    for (idx, ch) in raw.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '$' if depth > 0 && raw[idx..].starts_with(NESTED) => deepest = deepest.max(depth),
            _ => {}
        }
    }
    Ok(deepest + 1)
}

fn invalid(dimension: Dimension, raw: &str) -> Error {
    Error::InvalidValue {
        dimension: Some(dimension),
        raw: raw.to_owned(),
    }
}

/// Runs one validator per dimension over a [`QueryRequest`].
///
/// Every dimension starts with the standard [`LimitValidator`]; custom
/// validators replace it through [`QueryValidator::with_validator`].
#[derive(Clone)]
pub struct QueryValidator {
    validators: HashMap<Dimension, Arc<dyn QueryOptionValidator>>,
}

impl Default for QueryValidator {
    fn default() -> Self {
        let validators = Dimension::ALL
            .into_iter()
            .map(|d| {
                let validator: Arc<dyn QueryOptionValidator> = Arc::new(LimitValidator::new(d));
                (d, validator)
            })
            .collect();
        Self { validators }
    }
}

impl QueryValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the validator for the dimension it reports.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn QueryOptionValidator>) -> Self {
        self.validators.insert(validator.dimension(), validator);
        self
    }

    /// Validator currently registered for `dimension`
    #[must_use]
    pub fn validator(&self, dimension: Dimension) -> Option<&Arc<dyn QueryOptionValidator>> {
        self.validators.get(&dimension)
    }

    /// Validate every present option in the order top, skip, orderby, expand.
    ///
    /// # Errors
    /// Returns the first failure reported by a dimension validator.
    pub fn validate(
        &self,
        request: &QueryRequest,
        context: EvaluationContext<'_>,
        settings: &ValidationSettings,
    ) -> Result<(), Error> {
        for dimension in Dimension::ALL {
            let Some(value) = request.value(dimension) else {
                continue;
            };
            let Some(validator) = self.validators.get(&dimension) else {
                continue;
            };
            let option = QueryOption::new(dimension, value, Some(context))?;
            validator.validate(&option, settings)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for QueryValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dims: Vec<_> = self.validators.keys().map(|d| d.as_str()).collect();
        dims.sort_unstable();
        f.debug_struct("QueryValidator")
            .field("dimensions", &dims)
            .finish()
    }
}
