//! Factories stored in the provider table
//!
//! Factories encapsulate how a registration produces its value. They are
//! invoked with the registry that is resolving them, so parameter
//! bindings can pull further registrations out of the same tables.
//!
//! ## Enum dispatch
//!
//! `AnyFactory` is an enum rather than `Box<dyn Factory>`: the set of
//! factory shapes is closed (constructed, fixed, instance, singleton) and
//! matching on them keeps every path visible to the optimizer.

use crate::constructor::{Args, Param};
use crate::{DiError, Registry, Result, Value};
use ahash::RandomState;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Erased build step: evaluated arguments in, capability value out
pub(crate) type ErasedBuild = Arc<dyn Fn(&Args) -> Result<Value> + Send + Sync>;

/// Per-parameter bindings of one registration, shared between the
/// registration builder and the factory it installed.
pub(crate) type Bindings = DashMap<&'static str, Binding, RandomState>;

// =============================================================================
// Bindings
// =============================================================================

/// How one constructor argument is produced at resolution time
#[derive(Debug, Clone)]
pub(crate) enum Binding {
    /// The resolving registry itself
    Registry,
    /// Whatever the parameter type's default registration produces
    Alias(Param),
    /// A specific named registration
    Named(String),
    /// A constant supplied at registration time
    Fixed(Value),
}

impl Binding {
    /// Default binding for a constructor parameter
    pub(crate) fn for_param(param: Param) -> Self {
        if param.ty.is_registry() {
            Binding::Registry
        } else {
            Binding::Alias(param)
        }
    }

    /// Produce the argument value
    pub(crate) fn produce(&self, registry: &Registry) -> Result<Value> {
        match self {
            Binding::Registry => Ok(Value::new(registry.clone())),
            Binding::Alias(param) => {
                let name = registry
                    .alias_for_id(param.ty.type_id())
                    .ok_or(DiError::NoAlias {
                        type_name: param.ty.type_name(),
                    })?;
                registry.resolve_value(&name)
            }
            Binding::Named(name) => registry.resolve_value(name),
            Binding::Fixed(value) => Ok(value.clone()),
        }
    }
}

// =============================================================================
// Constructed Factory
// =============================================================================

/// Builds a fresh instance on every call from live parameter bindings
pub(crate) struct ConstructedFactory {
    pub(crate) type_name: &'static str,
    pub(crate) params: Vec<Param>,
    pub(crate) bindings: Arc<Bindings>,
    pub(crate) build: ErasedBuild,
}

impl ConstructedFactory {
    fn create(&self, registry: &Registry) -> Result<Value> {
        #[cfg(feature = "logging")]
        trace!(
            target: "service_registry",
            concrete = self.type_name,
            params = self.params.len(),
            "Constructing new instance"
        );

        let mut entries = Vec::with_capacity(self.params.len());
        for param in &self.params {
            // Clone the binding out so no shard guard is held while it
            // recursively resolves.
            let binding = self
                .bindings
                .get(param.name)
                .map(|b| b.value().clone())
                .unwrap_or_else(|| Binding::for_param(*param));
            entries.push((param.name, binding.produce(registry)?));
        }

        (self.build)(&Args::new(self.type_name, entries))
    }
}

// =============================================================================
// Fixed Factory
// =============================================================================

/// Invokes one constructor with arguments fixed at registration time
pub(crate) struct FixedFactory {
    pub(crate) type_name: &'static str,
    pub(crate) params: Vec<Param>,
    pub(crate) values: Vec<Value>,
    pub(crate) build: ErasedBuild,
}

impl FixedFactory {
    fn create(&self) -> Result<Value> {
        let entries = self
            .params
            .iter()
            .zip(&self.values)
            .map(|(param, value)| (param.name, value.clone()))
            .collect();

        (self.build)(&Args::new(self.type_name, entries))
    }
}

// =============================================================================
// Singleton Factory
// =============================================================================

/// Memoizes the first value produced by the wrapped factory.
///
/// `OnceCell::get_or_try_init` blocks concurrent first callers until the
/// winner finishes, so the wrapped factory runs at most once per
/// successful initialization. A failed attempt leaves the cell empty.
pub(crate) struct SingletonFactory {
    pub(crate) name: String,
    pub(crate) inner: Arc<AnyFactory>,
    pub(crate) instance: OnceCell<Value>,
}

impl SingletonFactory {
    fn resolve(&self, registry: &Registry) -> Result<Value> {
        #[cfg(feature = "logging")]
        let was_empty = self.instance.get().is_none();

        let value = self.instance.get_or_try_init(|| {
            #[cfg(feature = "logging")]
            debug!(
                target: "service_registry",
                registration = %self.name,
                "Singleton initializing on first access"
            );

            self.inner.resolve(registry)
        })?;

        #[cfg(feature = "logging")]
        if !was_empty {
            trace!(
                target: "service_registry",
                registration = %self.name,
                "Singleton already initialized, returning cached instance"
            );
        }

        Ok(value.clone())
    }
}

// =============================================================================
// AnyFactory
// =============================================================================

/// Type-erased factory wrapper for storage
pub(crate) enum AnyFactory {
    /// New instance per call, arguments from bindings
    Constructed(ConstructedFactory),
    /// New instance per call, arguments fixed up front
    Fixed(FixedFactory),
    /// Always the same pre-built value
    Instance(Value),
    /// Memoized wrapper around another factory
    Singleton(SingletonFactory),
    /// Concrete type has nothing to build with
    Unconstructible { type_name: &'static str },
}

impl AnyFactory {
    /// Wrap the given factory in a memoizing singleton
    #[inline]
    pub(crate) fn singleton(name: impl Into<String>, inner: Arc<AnyFactory>) -> Self {
        AnyFactory::Singleton(SingletonFactory {
            name: name.into(),
            inner,
            instance: OnceCell::new(),
        })
    }

    /// Resolve the value
    #[inline]
    pub(crate) fn resolve(&self, registry: &Registry) -> Result<Value> {
        match self {
            AnyFactory::Constructed(f) => f.create(registry),
            AnyFactory::Fixed(f) => f.create(),
            AnyFactory::Instance(value) => Ok(value.clone()),
            AnyFactory::Singleton(f) => f.resolve(registry),
            AnyFactory::Unconstructible { type_name } => Err(DiError::NoConstructors { type_name }),
        }
    }

    /// Short label for diagnostics
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            AnyFactory::Constructed(_) => "constructed",
            AnyFactory::Fixed(_) => "fixed",
            AnyFactory::Instance(_) => "instance",
            AnyFactory::Singleton(_) => "singleton",
            AnyFactory::Unconstructible { .. } => "unconstructible",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructor::ParamType;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting_build(counter: &'static AtomicU32) -> ErasedBuild {
        Arc::new(move |_args| Ok(Value::new(counter.fetch_add(1, Ordering::SeqCst))))
    }

    fn constructed(build: ErasedBuild) -> AnyFactory {
        AnyFactory::Constructed(ConstructedFactory {
            type_name: "Counter",
            params: Vec::new(),
            bindings: Arc::new(Bindings::default()),
            build,
        })
    }

    #[test]
    fn test_instance_factory() {
        let registry = Registry::new();
        let value = Value::new(42u32);
        let factory = AnyFactory::Instance(value.clone());

        let a = factory.resolve(&registry).unwrap().downcast::<u32>().unwrap();
        let b = factory.resolve(&registry).unwrap().downcast::<u32>().unwrap();

        assert_eq!(*a, 42);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_constructed_factory_builds_each_time() {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let registry = Registry::new();
        let factory = constructed(counting_build(&COUNTER));

        let a = factory.resolve(&registry).unwrap().downcast::<u32>().unwrap();
        let b = factory.resolve(&registry).unwrap().downcast::<u32>().unwrap();

        assert_eq!(*a, 0);
        assert_eq!(*b, 1);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_singleton_factory_memoizes() {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let registry = Registry::new();
        let inner = Arc::new(constructed(counting_build(&COUNTER)));
        let factory = AnyFactory::singleton("counter", inner);

        assert_eq!(COUNTER.load(Ordering::SeqCst), 0);

        let a = factory.resolve(&registry).unwrap().downcast::<u32>().unwrap();
        let b = factory.resolve(&registry).unwrap().downcast::<u32>().unwrap();

        assert_eq!(COUNTER.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_fixed_factory_passes_values() {
        let registry = Registry::new();
        let factory = AnyFactory::Fixed(FixedFactory {
            type_name: "Sum",
            params: vec![
                Param { name: "a", ty: ParamType::of::<i32>() },
                Param { name: "b", ty: ParamType::of::<i32>() },
            ],
            values: vec![Value::new(2i32), Value::new(3i32)],
            build: Arc::new(|args| {
                Ok(Value::new(*args.get::<i32>("a")? + *args.get::<i32>("b")?))
            }),
        });

        let sum = factory.resolve(&registry).unwrap().downcast::<i32>().unwrap();
        assert_eq!(*sum, 5);
        assert_eq!(factory.kind(), "fixed");
    }

    #[test]
    fn test_alias_binding_without_alias() {
        trait Missing: Send + Sync {}

        let registry = Registry::new();
        let binding = Binding::for_param(Param {
            name: "missing",
            ty: ParamType::of::<dyn Missing>(),
        });

        let err = binding.produce(&registry).unwrap_err();
        assert!(matches!(err, DiError::NoAlias { .. }));
    }

    #[test]
    fn test_registry_binding() {
        let registry = Registry::new();
        let binding = Binding::for_param(Param {
            name: "resolver",
            ty: ParamType::of::<Registry>(),
        });

        let value = binding.produce(&registry).unwrap();
        let passed = value.downcast::<Registry>().unwrap();
        assert!(Registry::same(&registry, &passed));
    }

    #[test]
    fn test_unconstructible() {
        let registry = Registry::new();
        let factory = AnyFactory::Unconstructible { type_name: "Nothing" };
        assert_eq!(
            factory.resolve(&registry).unwrap_err(),
            DiError::NoConstructors { type_name: "Nothing" }
        );
    }
}
