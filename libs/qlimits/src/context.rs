//! Structural position a query option is evaluated against.

use crate::Dimension;
use crate::limits::DefaultQuerySettings;
use crate::model::{LimitAnnotations, PropertyRef, TypeRef};
use crate::resolver::{ResolvedLimit, resolve_limit};

/// Read-only view of where a query option applies.
///
/// Owned by the request pipeline; validators only borrow it. The property is
/// absent for queries on a collection root, and the declaring type may be
/// absent when the caller has no type information at all.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    property: Option<&'a PropertyRef>,
    declaring_type: Option<&'a TypeRef>,
    model: &'a dyn LimitAnnotations,
    defaults: &'a DefaultQuerySettings,
}

impl<'a> EvaluationContext<'a> {
    /// Context without property or type, bound to a model and its defaults.
    #[must_use]
    pub fn new(model: &'a dyn LimitAnnotations, defaults: &'a DefaultQuerySettings) -> Self {
        Self {
            property: None,
            declaring_type: None,
            model,
            defaults,
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: &'a PropertyRef) -> Self {
        self.property = Some(property);
        self
    }

    #[must_use]
    pub fn with_declaring_type(mut self, declaring_type: &'a TypeRef) -> Self {
        self.declaring_type = Some(declaring_type);
        self
    }

    #[must_use]
    pub fn property(&self) -> Option<&'a PropertyRef> {
        self.property
    }

    #[must_use]
    pub fn declaring_type(&self) -> Option<&'a TypeRef> {
        self.declaring_type
    }

    #[must_use]
    pub fn model(&self) -> &'a dyn LimitAnnotations {
        self.model
    }

    #[must_use]
    pub fn defaults(&self) -> &'a DefaultQuerySettings {
        self.defaults
    }

    /// Structural ceiling for `dimension` at this position.
    #[must_use]
    pub fn resolve(&self, dimension: Dimension) -> Option<ResolvedLimit> {
        resolve_limit(
            dimension,
            self.property,
            self.declaring_type,
            self.model,
            self.defaults,
        )
    }
}

impl std::fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("property", &self.property)
            .field("declaring_type", &self.declaring_type)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
