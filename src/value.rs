//! Type-erased values flowing through the registry
//!
//! Every factory produces a [`Value`], and every constructor argument is
//! one. A `Value` always wraps an `Arc<T>` so that trait objects
//! (`Arc<dyn Storage>`) and plain values (`Arc<i32>`) travel the same way,
//! and so that resolving a memoized value hands out the same allocation.

use crate::{DiError, Result};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased, cheaply clonable `Arc<T>`.
#[derive(Clone)]
pub struct Value {
    /// Holds an `Arc<T>`, boxed once more as `dyn Any`
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Value {
    /// Wrap an owned value.
    #[inline]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an existing `Arc`, including `Arc<dyn Trait>`.
    #[inline]
    pub fn from_arc<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            inner: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// TypeId of the wrapped `T`
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Type name of the wrapped `T`, for diagnostics
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check whether this value wraps a `T`
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Get the wrapped `Arc<T>`, or `None` if the type does not match.
    #[inline]
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.inner.downcast_ref::<Arc<T>>().cloned()
    }

    /// Like [`Value::downcast`], reporting a [`DiError::TypeMismatch`] on failure.
    #[inline]
    pub fn try_downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.downcast::<T>().ok_or(DiError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: self.type_name,
        })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type_name", &self.type_name)
            .finish()
    }
}
