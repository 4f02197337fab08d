//! Parameter storage using Arc for clone-friendly clause builders.

use rusqlite::ToSql;
use std::sync::Arc;

/// A clone-friendly bound parameter.
///
/// Criteria and changesets are assembled before any statement exists, so the
/// values are kept behind `Arc` and borrowed out as `&dyn ToSql` only at
/// execution time.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any bindable value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Borrow the inner value as a ToSql trait object.
    pub fn as_sql(&self) -> &dyn ToSql {
        &*self.0
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// An ordered collection of bound parameters.
///
/// Placeholder indices (`?1`, `?2`, ...) are handed out at build time, so the
/// rendered SQL never goes through string replacement.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a value and return its 1-based placeholder index.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> usize {
        self.params.push(Param::new(value));
        self.params.len()
    }

    /// Add a pre-wrapped [`Param`] and return its 1-based placeholder index.
    pub fn push_param(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// All parameters as references for statement execution.
    pub fn as_refs(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_sql()).collect()
    }

    /// Extend this list with another list's parameters.
    pub fn extend(&mut self, other: &ParamList) {
        self.params.extend(other.params.iter().cloned());
    }
}
