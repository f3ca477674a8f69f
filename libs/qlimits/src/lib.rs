//! Layered limit validation for `OData`-style query options.
//!
//! A requested value (`$top`, `$skip`, number of `$orderby` clauses, `$expand`
//! depth) is checked against two layers:
//!
//! 1. the flat global ceiling in [`ValidationSettings`];
//! 2. one structural ceiling resolved from model annotations, narrowest scope
//!    first: property, declaring type, model-wide defaults.
//!
//! The first violation wins and comes back as [`Error::LimitExceeded`].
//!
//! ```rust
//! use qlimits::{
//!     DefaultQuerySettings, EvaluationContext, Model, ModelBoundLimits, PropertyRef, QueryOption,
//!     ValidationSettings,
//! };
//!
//! let model = Model::builder()
//!     .annotate_property("Customer", "orders", ModelBoundLimits::new().with_max_top(10))
//!     .build();
//! let defaults = DefaultQuerySettings::default();
//! let orders = PropertyRef::new("Customer", "orders");
//! let ctx = EvaluationContext::new(&model, &defaults).with_property(&orders);
//! let settings = ValidationSettings::new().with_max_top(1000);
//!
//! assert!(qlimits::validate(&QueryOption::top(5, ctx), &settings).is_ok());
//! assert!(qlimits::validate(&QueryOption::top(20, ctx), &settings).is_err());
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod config;
pub mod context;
pub mod errors;
pub mod limits;
pub mod model;
pub mod option;
pub mod problem_mapping;
pub mod query;
pub mod resolver;
pub mod validator;

pub use config::{ConfigError, LimitsConfig, ModelConfig};
pub use context::EvaluationContext;
pub use limits::{DefaultQuerySettings, ModelBoundLimits, ValidationSettings};
pub use model::{LimitAnnotations, Model, ModelBuilder, PropertyRef, TypeRef};
pub use option::{Dimension, QueryOption};
pub use query::{QueryRequest, QueryValidator};
pub use resolver::{LimitScope, ResolvedLimit, resolve_effective_limit, resolve_limit};
pub use validator::{LimitValidator, QueryOptionValidator, validate};

/// Unified error type for query option validation
///
/// ## HTTP Mapping
///
/// Converted to RFC 9457 problems by `problem_mapping`:
/// - `LimitExceeded` -> 400 `qlimits.limit_exceeded.v1`
/// - `InvalidValue` -> 400 `qlimits.invalid_value.v1`
/// - `InvalidArgument` -> 500 `qlimits.internal.v1`
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required input was absent or does not belong to this validator.
    /// Always an integration error; never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The requested value is above the ceiling enforced for it.
    #[error("the limit of {limit} for {dimension} has been exceeded (requested {requested}, {scope} scope)")]
    LimitExceeded {
        limit: u64,
        requested: u64,
        dimension: Dimension,
        scope: LimitScope,
    },

    /// A query option value could not be read from the request.
    /// `dimension` is `None` when the query string itself is malformed.
    #[error("invalid query option value '{raw}'")]
    InvalidValue {
        dimension: Option<Dimension>,
        raw: String,
    },
}

impl Error {
    /// `true` for failures the client can fix by changing its request
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::LimitExceeded { .. } | Error::InvalidValue { .. })
    }
}
