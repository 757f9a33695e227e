//! Capability traits for the registry
//!
//! A capability is whatever callers ask the registry for, usually a trait
//! object type such as `dyn Storage`. A concrete type satisfies a
//! capability when it implements [`Provides`] for it.

use std::sync::Arc;

/// Marker trait for types that can be stored in and resolved from the registry.
///
/// This is automatically implemented for all `Send + Sync + 'static` types,
/// sized or not, so `dyn Trait` capabilities qualify as long as the trait
/// has `Send + Sync` as supertraits.
pub trait Injectable: Send + Sync + 'static {
    /// Returns the type name for debugging
    #[inline]
    fn type_name_of() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<T: ?Sized + Send + Sync + 'static> Injectable for T {}

/// Conversion from a concrete type into a capability it satisfies.
///
/// Every type provides itself. Implementations for trait objects are one
/// line each and are most easily written with [`provides!`](crate::provides).
///
/// # Examples
///
/// ```rust
/// use service_registry::Provides;
/// use std::sync::Arc;
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
/// impl Provides<dyn Greeter> for English {
///     fn into_capability(self: Arc<Self>) -> Arc<dyn Greeter> {
///         self
///     }
/// }
/// ```
pub trait Provides<I: ?Sized + Injectable>: Injectable {
    /// Turn a shared concrete instance into a shared capability.
    fn into_capability(self: Arc<Self>) -> Arc<I>;
}

impl<T: Injectable> Provides<T> for T {
    #[inline]
    fn into_capability(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Declare which trait-object capabilities a concrete type provides.
///
/// ```rust
/// use service_registry::provides;
///
/// trait Reader: Send + Sync {}
/// trait Writer: Send + Sync {}
///
/// struct File;
/// impl Reader for File {}
/// impl Writer for File {}
///
/// provides!(File => dyn Reader, dyn Writer);
/// ```
#[macro_export]
macro_rules! provides {
    ($concrete:ty => $($capability:ty),+ $(,)?) => {
        $(
            impl $crate::Provides<$capability> for $concrete {
                #[inline]
                fn into_capability(
                    self: ::std::sync::Arc<Self>,
                ) -> ::std::sync::Arc<$capability> {
                    self
                }
            }
        )+
    };
}
