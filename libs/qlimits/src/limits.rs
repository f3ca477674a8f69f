//! Ceiling sets for query options
//!
//! Two shapes of ceilings exist:
//! - [`ValidationSettings`]: the flat, request-scoped global ceilings supplied by the caller
//! - [`ModelBoundLimits`]: ceilings annotated on a property, on a type, or model-wide
//!   (as [`DefaultQuerySettings`])
//!
//! Every ceiling is optional. `None` means unbounded; `Some(0)` is an enforceable
//! ceiling that rejects any non-zero request.

use serde::{Deserialize, Serialize};

use crate::Dimension;

/// Global ceilings checked before any structural limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[must_use]
pub struct ValidationSettings {
    /// Maximum value for `$top`
    pub max_top: Option<u64>,
    /// Maximum value for `$skip`
    pub max_skip: Option<u64>,
    /// Maximum number of `$orderby` clauses
    pub max_orderby_nodes: Option<u64>,
    /// Maximum `$expand` nesting depth
    pub max_expansion_depth: Option<u64>,
}

impl ValidationSettings {
    /// Settings with every ceiling unbounded
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_top(mut self, max_top: u64) -> Self {
        self.max_top = Some(max_top);
        self
    }

    pub fn with_max_skip(mut self, max_skip: u64) -> Self {
        self.max_skip = Some(max_skip);
        self
    }

    pub fn with_max_orderby_nodes(mut self, max: u64) -> Self {
        self.max_orderby_nodes = Some(max);
        self
    }

    pub fn with_max_expansion_depth(mut self, max: u64) -> Self {
        self.max_expansion_depth = Some(max);
        self
    }

    /// Global ceiling for a dimension, `None` when unbounded
    #[must_use]
    pub fn ceiling(&self, dimension: Dimension) -> Option<u64> {
        match dimension {
            Dimension::Top => self.max_top,
            Dimension::Skip => self.max_skip,
            Dimension::OrderBy => self.max_orderby_nodes,
            Dimension::Expand => self.max_expansion_depth,
        }
    }
}

/// Ceilings attached to a property, a type, or the whole model.
///
/// Built at model-build time and only read during validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[must_use]
pub struct ModelBoundLimits {
    pub max_top: Option<u64>,
    pub max_skip: Option<u64>,
    pub max_orderby_nodes: Option<u64>,
    pub max_expansion_depth: Option<u64>,
}

/// Model-wide fallback ceilings, the last structural layer consulted.
pub type DefaultQuerySettings = ModelBoundLimits;

impl ModelBoundLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_top(mut self, max_top: u64) -> Self {
        self.max_top = Some(max_top);
        self
    }

    pub fn with_max_skip(mut self, max_skip: u64) -> Self {
        self.max_skip = Some(max_skip);
        self
    }

    pub fn with_max_orderby_nodes(mut self, max: u64) -> Self {
        self.max_orderby_nodes = Some(max);
        self
    }

    pub fn with_max_expansion_depth(mut self, max: u64) -> Self {
        self.max_expansion_depth = Some(max);
        self
    }

    #[must_use]
    pub fn ceiling(&self, dimension: Dimension) -> Option<u64> {
        match dimension {
            Dimension::Top => self.max_top,
            Dimension::Skip => self.max_skip,
            Dimension::OrderBy => self.max_orderby_nodes,
            Dimension::Expand => self.max_expansion_depth,
        }
    }

    /// `true` when no dimension carries a ceiling
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.ceiling(*d).is_none())
    }
}
