//! Parsed numeric query options.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::context::EvaluationContext;

/// Which query option a value or ceiling belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Requested row count
    #[serde(rename = "$top")]
    Top,
    /// Number of rows to skip
    #[serde(rename = "$skip")]
    Skip,
    /// Number of `$orderby` clauses
    #[serde(rename = "$orderby")]
    OrderBy,
    /// `$expand` nesting depth
    #[serde(rename = "$expand")]
    Expand,
}

impl Dimension {
    /// Every dimension, in validation order
    pub const ALL: [Dimension; 4] = [
        Dimension::Top,
        Dimension::Skip,
        Dimension::OrderBy,
        Dimension::Expand,
    ];

    /// Query-string parameter name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Top => "$top",
            Dimension::Skip => "$skip",
            Dimension::OrderBy => "$orderby",
            Dimension::Expand => "$expand",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single requested value plus the position it is evaluated against.
///
/// Created once per request from parsed input and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct QueryOption<'a> {
    dimension: Dimension,
    value: u64,
    context: EvaluationContext<'a>,
}

impl<'a> QueryOption<'a> {
    /// Build an option from pipeline input.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if `context` is absent: a validator
    /// always needs the structural position of the constraint.
    pub fn new(
        dimension: Dimension,
        value: u64,
        context: Option<EvaluationContext<'a>>,
    ) -> Result<Self, Error> {
        let context = context.ok_or(Error::InvalidArgument("evaluation context is required"))?;
        Ok(Self {
            dimension,
            value,
            context,
        })
    }

    /// `$top` option with a known context
    #[must_use]
    pub fn top(value: u64, context: EvaluationContext<'a>) -> Self {
        Self {
            dimension: Dimension::Top,
            value,
            context,
        }
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.value
    }

    #[must_use]
    pub fn context(&self) -> &EvaluationContext<'a> {
        &self.context
    }
}
