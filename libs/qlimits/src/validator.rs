//! Query option validators
//!
//! A validator checks one dimension. The standard [`LimitValidator`] runs the
//! layered check: global ceiling first, then the structural ceiling resolved
//! from the option's evaluation context. First violation wins.

use crate::option::QueryOption;
use crate::resolver::LimitScope;
use crate::{Dimension, Error, ValidationSettings};

/// Strategy seam for validating one query option.
///
/// Deployments that need different rules implement this trait and hand the
/// implementation to `QueryValidator::with_validator`.
pub trait QueryOptionValidator: Send + Sync {
    /// Dimension this validator is responsible for
    fn dimension(&self) -> Dimension;

    /// Validate `option` against `settings` and the option's structural position.
    ///
    /// # Errors
    /// Returns `Error::LimitExceeded` when a ceiling is violated and
    /// `Error::InvalidArgument` on integration errors.
    fn validate(&self, option: &QueryOption<'_>, settings: &ValidationSettings)
    -> Result<(), Error>;
}

/// Standard layered-limit validator for a single dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitValidator {
    dimension: Dimension,
}

impl LimitValidator {
    #[must_use]
    pub const fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }

    #[must_use]
    pub const fn top() -> Self {
        Self::new(Dimension::Top)
    }

    #[must_use]
    pub const fn skip() -> Self {
        Self::new(Dimension::Skip)
    }

    #[must_use]
    pub const fn orderby() -> Self {
        Self::new(Dimension::OrderBy)
    }

    #[must_use]
    pub const fn expand() -> Self {
        Self::new(Dimension::Expand)
    }
}

impl QueryOptionValidator for LimitValidator {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn validate(
        &self,
        option: &QueryOption<'_>,
        settings: &ValidationSettings,
    ) -> Result<(), Error> {
        let dimension = self.dimension;
        if option.dimension() != dimension {
            return Err(Error::InvalidArgument(
                "query option dimension does not match the validator",
            ));
        }
        let requested = option.value();

        if let Some(limit) = settings.ceiling(dimension)
            && requested > limit
        {
            tracing::debug!(%dimension, limit, requested, "global limit exceeded");
            return Err(Error::LimitExceeded {
                limit,
                requested,
                dimension,
                scope: LimitScope::Global,
            });
        }

        if let Some(resolved) = option.context().resolve(dimension)
            && requested > resolved.value
        {
            tracing::debug!(
                %dimension,
                limit = resolved.value,
                requested,
                scope = %resolved.scope,
                "structural limit exceeded"
            );
            return Err(Error::LimitExceeded {
                limit: resolved.value,
                requested,
                dimension,
                scope: resolved.scope,
            });
        }

        Ok(())
    }
}

/// Validate a `$top` option with the standard rules.
///
/// # Errors
/// Returns `Error::LimitExceeded` when the global or structural ceiling is
/// exceeded, `Error::InvalidArgument` if `option` is not a `$top` option.
pub fn validate(option: &QueryOption<'_>, settings: &ValidationSettings) -> Result<(), Error> {
    LimitValidator::top().validate(option, settings)
}
