//! The service registry
//!
//! `Registry` owns the provider table (name -> factory) and the alias
//! table (capability type -> default name), and resolves capabilities by
//! invoking the stored factories.

use crate::factory::AnyFactory;
use crate::registration::Registration;
use crate::storage::RegistryStorage;
use crate::{Constructible, DiError, Injectable, Provides, Result, Value};
use std::any::TypeId;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Name- and type-keyed service registry.
///
/// Cloning a `Registry` is cheap and yields a handle to the same tables;
/// every [`Registry::new`] is an independent container.
///
/// # Examples
///
/// ```rust
/// use service_registry::{Constructible, Constructor, Registry, provides};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// impl Constructible for English {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|_| Ok(English))]
///     }
/// }
///
/// provides!(English => dyn Greeter);
///
/// let registry = Registry::new();
/// registry.register::<dyn Greeter, English>();
///
/// let greeter = registry.resolve::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
#[derive(Clone)]
pub struct Registry {
    storage: Arc<RegistryStorage>,
}

impl Registry {
    /// Create a new, empty registry.
    #[inline]
    pub fn new() -> Self {
        #[cfg(feature = "logging")]
        debug!(target: "service_registry", "Creating new registry");

        Self {
            storage: Arc::new(RegistryStorage::new()),
        }
    }

    /// Create a registry with pre-allocated capacity.
    ///
    /// Use this when you know approximately how many registrations will be made.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        #[cfg(feature = "logging")]
        debug!(target: "service_registry", capacity, "Creating new registry");

        Self {
            storage: Arc::new(RegistryStorage::with_capacity(capacity)),
        }
    }

    /// True when both handles point at the same tables.
    #[inline]
    pub fn same(a: &Registry, b: &Registry) -> bool {
        Arc::ptr_eq(&a.storage, &b.storage)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `C` as the implementation of capability `I` under the
    /// capability's fully-qualified type name.
    #[inline]
    pub fn register<I, C>(&self) -> Registration<'_, I, C>
    where
        I: ?Sized + Injectable,
        C: Constructible + Provides<I>,
    {
        self.register_named::<I, C>(std::any::type_name::<I>())
    }

    /// Register `C` as an implementation of `I` under `name`.
    ///
    /// The first registration of `I` also makes `name` the default used by
    /// [`Registry::resolve`]; later ones only add named entries. Any
    /// factory already stored under `name` is replaced.
    pub fn register_named<I, C>(&self, name: impl Into<String>) -> Registration<'_, I, C>
    where
        I: ?Sized + Injectable,
        C: Constructible + Provides<I>,
    {
        let name = name.into();

        #[cfg_attr(not(feature = "logging"), allow(unused_variables))]
        let aliased = self.storage.alias_if_absent(TypeId::of::<I>(), &name);

        #[cfg(feature = "logging")]
        debug!(
            target: "service_registry",
            capability = std::any::type_name::<I>(),
            concrete = std::any::type_name::<C>(),
            registration = %name,
            default = aliased,
            "Registering service"
        );

        Registration::new(self, name)
    }

    /// Install a factory (used by registrations)
    #[inline]
    pub(crate) fn install(&self, name: &str, factory: Arc<AnyFactory>) {
        self.storage.insert(name, factory);
    }

    /// Factory currently stored under `name`
    #[inline]
    pub(crate) fn factory(&self, name: &str) -> Option<Arc<AnyFactory>> {
        self.storage.factory(name)
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve the default registration of capability `I`.
    ///
    /// Fails with [`DiError::NoAlias`] if `I` was never registered.
    pub fn resolve<I: ?Sized + Injectable>(&self) -> Result<Arc<I>> {
        let name = self.alias_for_id(TypeId::of::<I>()).ok_or_else(|| {
            #[cfg(feature = "logging")]
            debug!(
                target: "service_registry",
                capability = std::any::type_name::<I>(),
                "No default registration for capability"
            );
            DiError::no_alias::<I>()
        })?;

        self.resolve_named::<I>(&name)
    }

    /// Resolve the registration stored under `name` as capability `I`.
    ///
    /// Fails with [`DiError::MissingProvider`] if nothing is stored under
    /// `name`, or [`DiError::TypeMismatch`] if it produces something else.
    #[inline]
    pub fn resolve_named<I: ?Sized + Injectable>(&self, name: &str) -> Result<Arc<I>> {
        self.resolve_value(name)?.try_downcast::<I>()
    }

    /// Resolve the registration stored under `name` without a type check.
    pub fn resolve_value(&self, name: &str) -> Result<Value> {
        let Some(factory) = self.storage.factory(name) else {
            #[cfg(feature = "logging")]
            debug!(
                target: "service_registry",
                registration = name,
                "No provider registered under name"
            );
            return Err(DiError::missing_provider(name));
        };

        #[cfg(feature = "logging")]
        trace!(
            target: "service_registry",
            registration = name,
            kind = factory.kind(),
            "Resolving registration"
        );

        factory.resolve(self)
    }

    /// Try to resolve, returning None on any failure.
    #[inline]
    pub fn try_resolve<I: ?Sized + Injectable>(&self) -> Option<Arc<I>> {
        self.resolve::<I>().ok()
    }

    // =========================================================================
    // Query Methods
    // =========================================================================

    /// Default registration name of capability `I`, if registered.
    #[inline]
    pub fn alias_of<I: ?Sized + 'static>(&self) -> Option<String> {
        self.alias_for_id(TypeId::of::<I>())
    }

    #[inline]
    pub(crate) fn alias_for_id(&self, type_id: TypeId) -> Option<String> {
        self.storage.alias(&type_id)
    }

    /// Check whether capability `I` has a default registration with a
    /// factory behind it.
    #[inline]
    pub fn contains<I: ?Sized + 'static>(&self) -> bool {
        self.alias_of::<I>()
            .is_some_and(|name| self.storage.contains(&name))
    }

    /// Check whether a factory is stored under `name`.
    #[inline]
    pub fn contains_name(&self, name: &str) -> bool {
        self.storage.contains(name)
    }

    /// Number of registration names.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// All registration names, sorted.
    pub fn registered_names(&self) -> Vec<String> {
        self.storage.names()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Remove every registration and alias.
    ///
    /// Afterwards every previously valid name or capability fails to
    /// resolve with a registration-missing error.
    pub fn clear_registrations(&self) {
        #[cfg(feature = "logging")]
        let count = self.storage.len();

        self.storage.clear();

        #[cfg(feature = "logging")]
        debug!(
            target: "service_registry",
            registrations_removed = count,
            "Registry cleared"
        );
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("registrations", &self.storage.kinds())
            .field("aliases", &self.storage.alias_count())
            .finish()
    }
}
