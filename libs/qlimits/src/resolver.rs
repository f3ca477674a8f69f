//! Structural limit resolution
//!
//! Exactly one ceiling source wins, chosen by scope, narrowest first:
//! property annotation, then declaring-type annotation, then model-wide
//! defaults. Ceilings from different scopes are never combined.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Dimension;
use crate::limits::DefaultQuerySettings;
use crate::model::{LimitAnnotations, PropertyRef, TypeRef};

/// Where an enforced ceiling came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitScope {
    /// Request-scoped `ValidationSettings`
    Global,
    /// Annotation on the queried property
    Property,
    /// Annotation on the declaring type
    Type,
    /// Model-wide defaults
    Model,
}

impl fmt::Display for LimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LimitScope::Global => "global",
            LimitScope::Property => "property",
            LimitScope::Type => "type",
            LimitScope::Model => "model",
        })
    }
}

/// The single authoritative structural ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLimit {
    pub value: u64,
    pub scope: LimitScope,
}

/// Resolve the structural ceiling for `dimension`.
///
/// Returns `None` when no layer carries a ceiling for the dimension.
#[must_use]
pub fn resolve_limit(
    dimension: Dimension,
    property: Option<&PropertyRef>,
    declaring_type: Option<&TypeRef>,
    model: &dyn LimitAnnotations,
    default_settings: &DefaultQuerySettings,
) -> Option<ResolvedLimit> {
    let resolved = if let Some(value) = property.and_then(|p| model.property_limit(p, dimension)) {
        Some(ResolvedLimit {
            value,
            scope: LimitScope::Property,
        })
    } else if let Some(value) = declaring_type.and_then(|t| model.type_limit(t, dimension)) {
        Some(ResolvedLimit {
            value,
            scope: LimitScope::Type,
        })
    } else {
        default_settings
            .ceiling(dimension)
            .map(|value| ResolvedLimit {
                value,
                scope: LimitScope::Model,
            })
    };

    if let Some(limit) = resolved {
        tracing::trace!(
            %dimension,
            limit = limit.value,
            scope = %limit.scope,
            "resolved structural limit"
        );
    }
    resolved
}

/// Effective `$top` ceiling for a structural position.
#[must_use]
pub fn resolve_effective_limit(
    property: Option<&PropertyRef>,
    declaring_type: Option<&TypeRef>,
    model: &dyn LimitAnnotations,
    default_settings: &DefaultQuerySettings,
) -> Option<u64> {
    resolve_limit(
        Dimension::Top,
        property,
        declaring_type,
        model,
        default_settings,
    )
    .map(|limit| limit.value)
}
