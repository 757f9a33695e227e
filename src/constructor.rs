//! Constructor declarations
//!
//! The registry cannot inspect a type's constructors at runtime, so a
//! concrete type lists them up front by implementing [`Constructible`].
//! Each [`Constructor`] names its parameters and their types, and carries
//! a build closure that receives the evaluated arguments as [`Args`].

use crate::{DiError, Injectable, Registry, Result, Value};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Identity of a constructor parameter type.
#[derive(Clone, Copy)]
pub struct ParamType {
    type_id: TypeId,
    type_name: &'static str,
}

impl ParamType {
    /// Parameter type for `T` (may be a `dyn Trait`).
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// True when this parameter asks for the registry itself
    #[inline]
    pub fn is_registry(&self) -> bool {
        self.type_id == TypeId::of::<Registry>()
    }
}

impl PartialEq for ParamType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ParamType {}

impl fmt::Debug for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// A named, typed constructor parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub ty: ParamType,
}

/// Type-erased build closure
pub(crate) type BuildFn<T> = Arc<dyn Fn(&Args) -> Result<T> + Send + Sync>;

/// One way of building a `T`.
///
/// # Examples
///
/// ```rust
/// use service_registry::{Constructible, Constructor};
///
/// struct Money {
///     cents: i64,
/// }
///
/// impl Constructible for Money {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![
///             Constructor::new(|args| Ok(Money { cents: *args.get::<i64>("cents")? }))
///                 .param::<i64>("cents"),
///         ]
///     }
/// }
/// ```
pub struct Constructor<T> {
    params: Vec<Param>,
    build: BuildFn<T>,
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            build: Arc::clone(&self.build),
        }
    }
}

impl<T: 'static> Constructor<T> {
    /// Create a constructor with no parameters yet; add them with
    /// [`Constructor::param`] in positional order.
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&Args) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            build: Arc::new(build),
        }
    }

    /// Append a parameter of type `P`.
    ///
    /// Use `Registry` as `P` to receive the resolving registry itself.
    pub fn param<P: ?Sized + 'static>(mut self, name: &'static str) -> Self {
        self.params.push(Param {
            name,
            ty: ParamType::of::<P>(),
        });
        self
    }

    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether the parameter types equal `types`, position by position
    pub fn matches(&self, types: &[ParamType]) -> bool {
        self.params.len() == types.len()
            && self.params.iter().zip(types).all(|(p, t)| p.ty == *t)
    }

    /// True for the `(Registry)` constructor shape
    #[inline]
    pub fn takes_only_registry(&self) -> bool {
        matches!(self.params.as_slice(), [only] if only.ty.is_registry())
    }

    /// Run the build closure
    #[inline]
    pub fn invoke(&self, args: &Args) -> Result<T> {
        (self.build)(args)
    }

    pub(crate) fn signature(&self) -> String {
        format_signature(self.params.iter().map(|p| &p.ty))
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish()
    }
}

pub(crate) fn format_signature<'a>(types: impl IntoIterator<Item = &'a ParamType>) -> String {
    types
        .into_iter()
        .map(|t| t.type_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A concrete type the registry knows how to build.
///
/// The order of the returned constructors is their declaration order,
/// which decides the fallback when no `(Registry)` or zero-argument
/// constructor exists.
pub trait Constructible: Injectable + Sized {
    fn constructors() -> Vec<Constructor<Self>>;
}

/// Evaluated constructor arguments, in parameter order.
pub struct Args {
    owner: &'static str,
    entries: Vec<(&'static str, Value)>,
}

impl Args {
    pub(crate) fn new(owner: &'static str, entries: Vec<(&'static str, Value)>) -> Self {
        Self { owner, entries }
    }

    /// Get the argument bound to parameter `name`.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        self.value(name)?.try_downcast::<T>()
    }

    /// Get a clone of the argument bound to parameter `name`.
    pub fn cloned<T: Clone + Send + Sync + 'static>(&self, name: &str) -> Result<T> {
        self.get::<T>(name).map(|arc| (*arc).clone())
    }

    /// Get the registry passed to a `Registry`-typed parameter.
    pub fn registry(&self, name: &str) -> Result<Registry> {
        self.cloned::<Registry>(name)
    }

    /// Get the argument at a position.
    pub fn at<T: ?Sized + Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>> {
        match self.entries.get(index) {
            Some((_, value)) => value.try_downcast::<T>(),
            None => Err(DiError::MissingArgument {
                type_name: self.owner,
                parameter: format!("#{index}"),
            }),
        }
    }

    /// Raw type-erased argument.
    pub fn value(&self, name: &str) -> Result<&Value> {
        self.entries
            .iter()
            .find(|(param, _)| *param == name)
            .map(|(_, value)| value)
            .ok_or_else(|| DiError::MissingArgument {
                type_name: self.owner,
                parameter: name.to_string(),
            })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("owner", &self.owner)
            .field("params", &self.entries.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}
