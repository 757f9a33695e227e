//! Fluent registration builder
//!
//! `Registry::register` returns a [`Registration`]. Creating it picks a
//! constructor of the concrete type, binds every parameter, and installs
//! the composed factory right away; the fluent methods then rebind single
//! parameters or replace the factory. Argument values are never produced
//! here, only when the registration is resolved.

use crate::constructor::{Constructor, Param, ParamType, format_signature};
use crate::factory::{AnyFactory, Binding, Bindings, ConstructedFactory, ErasedBuild, FixedFactory};
use crate::{Constructible, DiError, Injectable, Provides, Registry, Result, Value};
use std::marker::PhantomData;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Pick the constructor a registration binds by default.
///
/// First match wins:
/// 1. a constructor taking exactly one `Registry`
/// 2. the zero-argument constructor
/// 3. the first declared constructor
pub fn select_constructor<T>(constructors: &[Constructor<T>]) -> Option<&Constructor<T>>
where
    T: 'static,
{
    constructors
        .iter()
        .find(|c| c.takes_only_registry())
        .or_else(|| constructors.iter().find(|c| c.arity() == 0))
        .or_else(|| constructors.first())
}

/// Erase a concrete constructor into a capability-producing build step
fn erase<I, C>(constructor: &Constructor<C>) -> ErasedBuild
where
    I: ?Sized + Injectable,
    C: Constructible + Provides<I>,
{
    let constructor = constructor.clone();
    Arc::new(move |args| {
        let concrete = constructor.invoke(args)?;
        Ok(Value::from_arc(<C as Provides<I>>::into_capability(Arc::new(concrete))))
    })
}

/// Configuration handle for one registration.
///
/// Every method consumes and returns the handle so calls chain; later
/// calls override earlier ones.
///
/// # Examples
///
/// ```rust
/// use service_registry::{Constructible, Constructor, Registry, provides};
/// use std::sync::Arc;
///
/// trait Number: Send + Sync {
///     fn value(&self) -> i32;
/// }
///
/// struct Literal(i32);
///
/// impl Number for Literal {
///     fn value(&self) -> i32 {
///         self.0
///     }
/// }
///
/// impl Constructible for Literal {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![
///             Constructor::new(|args| Ok(Literal(*args.get::<i32>("value")?)))
///                 .param::<i32>("value"),
///         ]
///     }
/// }
///
/// struct Add(Arc<dyn Number>, Arc<dyn Number>);
///
/// impl Number for Add {
///     fn value(&self) -> i32 {
///         self.0.value() + self.1.value()
///     }
/// }
///
/// impl Constructible for Add {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![
///             Constructor::new(|args| Ok(Add(args.get("lhs")?, args.get("rhs")?)))
///                 .param::<dyn Number>("lhs")
///                 .param::<dyn Number>("rhs"),
///         ]
///     }
/// }
///
/// provides!(Literal => dyn Number);
/// provides!(Add => dyn Number);
///
/// let registry = Registry::new();
/// registry
///     .register_named::<dyn Number, Add>("add")
///     .with_dependency("lhs", "five")
///     .with_dependency("rhs", "six");
/// registry
///     .register_named::<dyn Number, Literal>("five")
///     .with_constructor("value", 5);
/// registry
///     .register_named::<dyn Number, Literal>("six")
///     .with_constructor("value", 6);
///
/// let sum = registry.resolve_named::<dyn Number>("add").unwrap();
/// assert_eq!(sum.value(), 11);
/// ```
pub struct Registration<'r, I: ?Sized, C> {
    registry: &'r Registry,
    name: String,
    params: Vec<Param>,
    bindings: Arc<Bindings>,
    /// Factory most recently installed by this registration
    current: Arc<AnyFactory>,
    _marker: PhantomData<fn() -> (Arc<I>, C)>,
}

impl<'r, I, C> Registration<'r, I, C>
where
    I: ?Sized + Injectable,
    C: Constructible + Provides<I>,
{
    /// Select a constructor, bind its parameters and install the factory.
    pub(crate) fn new(registry: &'r Registry, name: String) -> Self {
        let type_name = std::any::type_name::<C>();
        let constructors = C::constructors();
        let bindings = Arc::new(Bindings::default());

        let (params, factory) = match select_constructor(&constructors) {
            Some(constructor) => {
                #[cfg(feature = "logging")]
                debug!(
                    target: "service_registry",
                    concrete = type_name,
                    registration = %name,
                    signature = %constructor.signature(),
                    "Selected constructor"
                );

                let params = constructor.params().to_vec();
                for param in &params {
                    bindings.insert(param.name, Binding::for_param(*param));
                }
                let factory = AnyFactory::Constructed(ConstructedFactory {
                    type_name,
                    params: params.clone(),
                    bindings: Arc::clone(&bindings),
                    build: erase::<I, C>(constructor),
                });
                (params, factory)
            }
            None => {
                #[cfg(feature = "logging")]
                warn!(
                    target: "service_registry",
                    concrete = type_name,
                    registration = %name,
                    "Concrete type declares no constructors"
                );

                (Vec::new(), AnyFactory::Unconstructible { type_name })
            }
        };

        let current = Arc::new(factory);
        registry.install(&name, Arc::clone(&current));

        Self {
            registry,
            name,
            params,
            bindings,
            current,
            _marker: PhantomData,
        }
    }

    /// Registration name this handle owns
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters of the selected constructor
    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    fn install(&mut self, factory: AnyFactory) {
        let factory = Arc::new(factory);
        self.registry.install(&self.name, Arc::clone(&factory));
        self.current = factory;
    }

    fn rebind(self, param: &str, binding: Binding) -> Self {
        match self.bindings.get_mut(param) {
            Some(mut slot) => {
                #[cfg(feature = "logging")]
                debug!(
                    target: "service_registry",
                    registration = %self.name,
                    parameter = param,
                    binding = ?*slot,
                    "Rebinding constructor parameter"
                );
                *slot = binding;
            }
            None => {
                #[cfg(feature = "logging")]
                warn!(
                    target: "service_registry",
                    registration = %self.name,
                    parameter = param,
                    "Ignoring override for unknown constructor parameter"
                );
            }
        }
        self
    }

    /// Resolve parameter `param` from the registration named `registration`
    /// instead of the parameter type's default.
    ///
    /// The named registration only has to exist once this one is resolved.
    #[inline]
    pub fn with_dependency(self, param: &str, registration: impl Into<String>) -> Self {
        self.rebind(param, Binding::Named(registration.into()))
    }

    /// Pass a constant for parameter `param`.
    ///
    /// For a capability parameter such as `dyn Trait`, use
    /// [`Registration::with_constructor_arc`] instead.
    #[inline]
    pub fn with_constructor<V: Injectable>(self, param: &str, value: V) -> Self {
        self.with_constructor_value(param, Value::new(value))
    }

    /// Pass a shared constant for `param`, typically an `Arc<dyn Trait>`.
    #[inline]
    pub fn with_constructor_arc<V: ?Sized + Injectable>(self, param: &str, value: Arc<V>) -> Self {
        self.with_constructor_value(param, Value::from_arc(value))
    }

    /// Pass a pre-wrapped constant for `param`.
    ///
    /// A value whose type differs from the parameter's declared type is
    /// ignored with a warning, leaving the previous binding in place.
    pub fn with_constructor_value(self, param: &str, value: Value) -> Self {
        let declared = self.params.iter().find(|p| p.name == param);
        if let Some(declared) = declared.filter(|p| p.ty.type_id() != value.type_id()) {
            #[cfg(feature = "logging")]
            warn!(
                target: "service_registry",
                registration = %self.name,
                parameter = param,
                expected = declared.ty.type_name(),
                found = value.type_name(),
                "Ignoring constant of the wrong type for constructor parameter"
            );
            return self;
        }

        self.rebind(param, Binding::Fixed(value))
    }

    /// Build with the declared constructor whose parameter types are
    /// exactly `types`, always passing `values`.
    ///
    /// Replaces the selected constructor and all per-parameter bindings.
    /// Fails with [`DiError::NoMatchingConstructor`] if no such constructor
    /// is declared, or when `values` do not fit the signature.
    pub fn with_constructor_signature(mut self, types: &[ParamType], values: Vec<Value>) -> Result<Self> {
        let type_name = std::any::type_name::<C>();
        let constructors = C::constructors();
        let constructor = constructors
            .iter()
            .find(|c| c.matches(types))
            .ok_or_else(|| DiError::NoMatchingConstructor {
                type_name,
                name: self.name.clone(),
                signature: format_signature(types),
            })?;

        if values.len() != types.len() {
            return Err(DiError::ArgumentCount {
                type_name,
                expected: types.len(),
                found: values.len(),
            });
        }
        if let Some((param, value)) = constructor
            .params()
            .iter()
            .zip(&values)
            .find(|(param, value)| param.ty.type_id() != value.type_id())
        {
            return Err(DiError::TypeMismatch {
                expected: param.ty.type_name(),
                found: value.type_name(),
            });
        }

        #[cfg(feature = "logging")]
        debug!(
            target: "service_registry",
            concrete = type_name,
            registration = %self.name,
            signature = %constructor.signature(),
            "Using explicit constructor with fixed arguments"
        );

        let factory = AnyFactory::Fixed(FixedFactory {
            type_name,
            params: constructor.params().to_vec(),
            values,
            build: erase::<I, C>(constructor),
        });
        self.install(factory);
        Ok(self)
    }

    /// Always resolve to `instance` itself.
    pub fn as_instance(mut self, instance: Arc<C>) -> Self {
        #[cfg(feature = "logging")]
        debug!(
            target: "service_registry",
            registration = %self.name,
            "Registering fixed instance"
        );

        let value = Value::from_arc(<C as Provides<I>>::into_capability(instance));
        self.install(AnyFactory::Instance(value));
        self
    }

    /// Memoize the factory currently installed under this registration's
    /// name: the first resolution builds, every later one returns the same
    /// instance.
    ///
    /// Does nothing if the name was removed in the meantime, e.g. by
    /// [`Registry::clear_registrations`].
    pub fn as_singleton(mut self) -> Self {
        let Some(installed) = self.registry.factory(&self.name) else {
            #[cfg(feature = "logging")]
            warn!(
                target: "service_registry",
                registration = %self.name,
                "Registration no longer installed, not making it a singleton"
            );
            return self;
        };

        #[cfg(feature = "logging")]
        debug!(
            target: "service_registry",
            registration = %self.name,
            wraps = installed.kind(),
            "Registering as singleton"
        );

        self.install(AnyFactory::singleton(self.name.clone(), installed));
        self
    }
}

impl<I: ?Sized, C> std::fmt::Debug for Registration<'_, I, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("kind", &self.current.kind())
            .finish()
    }
}
