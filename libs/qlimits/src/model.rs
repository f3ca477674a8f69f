//! Structural identities and the limit annotation registry.
//!
//! A [`Model`] maps types and properties to [`ModelBoundLimits`]. It is filled
//! once at model-build time (through [`ModelBuilder`] or configuration) and is
//! read-only afterwards, so a single instance can be shared across threads.

use std::collections::HashMap;
use std::fmt;

use crate::Dimension;
use crate::limits::ModelBoundLimits;

/// Identity of a structured type (entity or complex type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a property: its declaring type plus its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct PropertyRef {
    declaring_type: TypeRef,
    name: String,
}

impl PropertyRef {
    pub fn new(declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaring_type: TypeRef::new(declaring_type),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn declaring_type(&self) -> &TypeRef {
        &self.declaring_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}

/// Lookup of limit annotations by identity.
///
/// Implementations must be pure lookups: the resolver may call them from
/// many request threads at once.
pub trait LimitAnnotations: Send + Sync {
    /// Ceiling annotated on `property` for `dimension`, if any
    fn property_limit(&self, property: &PropertyRef, dimension: Dimension) -> Option<u64>;

    /// Ceiling annotated on `ty` for `dimension`, if any
    fn type_limit(&self, ty: &TypeRef, dimension: Dimension) -> Option<u64>;
}

/// In-memory annotation registry.
#[derive(Debug, Clone, Default)]
pub struct Model {
    types: HashMap<TypeRef, ModelBoundLimits>,
    properties: HashMap<PropertyRef, ModelBoundLimits>,
}

impl Model {
    /// A model without annotations
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    /// Annotation registered for `ty`, all dimensions
    #[must_use]
    pub fn type_limits(&self, ty: &TypeRef) -> Option<&ModelBoundLimits> {
        self.types.get(ty)
    }

    #[must_use]
    pub fn property_limits(&self, property: &PropertyRef) -> Option<&ModelBoundLimits> {
        self.properties.get(property)
    }

    /// Number of annotated types and properties
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len() + self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.properties.is_empty()
    }
}

impl LimitAnnotations for Model {
    fn property_limit(&self, property: &PropertyRef, dimension: Dimension) -> Option<u64> {
        self.property_limits(property)?.ceiling(dimension)
    }

    fn type_limit(&self, ty: &TypeRef, dimension: Dimension) -> Option<u64> {
        self.type_limits(ty)?.ceiling(dimension)
    }
}

/// Model-build-time annotation of types and properties.
///
/// Annotating the same target twice replaces the earlier annotation.
#[derive(Debug, Default)]
#[must_use]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    pub fn annotate_type(mut self, ty: impl Into<String>, limits: ModelBoundLimits) -> Self {
        self.model.types.insert(TypeRef::new(ty), limits);
        self
    }

    pub fn annotate_property(
        mut self,
        declaring_type: impl Into<String>,
        property: impl Into<String>,
        limits: ModelBoundLimits,
    ) -> Self {
        self.model
            .properties
            .insert(PropertyRef::new(declaring_type, property), limits);
        self
    }

    #[must_use]
    pub fn build(self) -> Model {
        self.model
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn property_ref_display() {
        let p = PropertyRef::new("Customer", "orders");
        assert_eq!(p.to_string(), "Customer.orders");
        assert_eq!(p.declaring_type().name(), "Customer");
        assert_eq!(p.name(), "orders");
    }

    #[test]
    fn lookups_are_per_dimension() {
        let model = Model::builder()
            .annotate_type("Order", ModelBoundLimits::new().with_max_top(50))
            .annotate_property(
                "Customer",
                "orders",
                ModelBoundLimits::new().with_max_skip(7),
            )
            .build();

        let order_type = TypeRef::new("Order");
        let orders = PropertyRef::new("Customer", "orders");

        assert_eq!(model.type_limit(&order_type, Dimension::Top), Some(50));
        assert_eq!(model.type_limit(&order_type, Dimension::Skip), None);
        assert_eq!(model.property_limit(&orders, Dimension::Skip), Some(7));
        assert_eq!(model.property_limit(&orders, Dimension::Top), None);
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn unknown_targets_have_no_limits() {
        let model = Model::empty();
        assert!(model.is_empty());
        assert_eq!(
            model.property_limit(&PropertyRef::new("A", "b"), Dimension::Top),
            None
        );
        assert_eq!(model.type_limit(&TypeRef::new("A"), Dimension::Top), None);
    }

    #[test]
    fn reannotation_replaces() {
        let model = Model::builder()
            .annotate_type("Order", ModelBoundLimits::new().with_max_top(50))
            .annotate_type("Order", ModelBoundLimits::new().with_max_skip(5))
            .build();
        let order_type = TypeRef::new("Order");
        assert_eq!(model.type_limit(&order_type, Dimension::Top), None);
        assert_eq!(model.type_limit(&order_type, Dimension::Skip), Some(5));
        assert_eq!(
            model.type_limits(&order_type),
            Some(&ModelBoundLimits::new().with_max_skip(5))
        );
    }

    #[test]
    fn property_reannotation_replaces_whole_annotation() {
        let model = Model::builder()
            .annotate_property(
                "Customer",
                "orders",
                ModelBoundLimits::new().with_max_top(10).with_max_skip(3),
            )
            .annotate_property(
                "Customer",
                "orders",
                ModelBoundLimits::new().with_max_expansion_depth(1),
            )
            .build();
        let orders = PropertyRef::new("Customer", "orders");

        assert_eq!(
            model.property_limits(&orders),
            Some(&ModelBoundLimits::new().with_max_expansion_depth(1))
        );
        assert_eq!(model.property_limit(&orders, Dimension::Top), None);
        assert!(model.type_limits(&TypeRef::new("Customer")).is_none());
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn same_property_name_on_different_types_is_distinct() {
        let model = Model::builder()
            .annotate_property("Customer", "items", ModelBoundLimits::new().with_max_top(1))
            .build();
        assert_eq!(
            model.property_limit(&PropertyRef::new("Supplier", "items"), Dimension::Top),
            None
        );
    }
}
