//! # Service Registry - Name- and Type-Keyed Dependency Injection
//!
//! A small service locator: register a capability (usually a `dyn Trait`)
//! against a concrete type, optionally under a name, then resolve it by
//! type or by name. Constructor parameters are wired lazily by resolving
//! each parameter's own registration at resolve time.
//!
//! ## Features
//!
//! - 🔑 **Named registrations** - the same capability many times, under different names
//! - 🧩 **Constructor wiring** - parameters resolved from the registry on demand
//! - 🎯 **Overrides** - bind a parameter to a named registration or a constant
//! - 🏭 **Singletons and instances** - memoize a factory or hand out one object
//! - ⚡ **Concurrent** - `DashMap` tables, at-most-once singleton initialization
//! - 📊 **Observable** - optional tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use service_registry::{Constructible, Constructor, Registry, provides};
//! use std::sync::Arc;
//!
//! trait Store: Send + Sync {
//!     fn url(&self) -> String;
//! }
//!
//! struct Postgres {
//!     url: String,
//! }
//!
//! impl Store for Postgres {
//!     fn url(&self) -> String {
//!         self.url.clone()
//!     }
//! }
//!
//! impl Constructible for Postgres {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![
//!             Constructor::new(|args| Ok(Postgres { url: args.cloned("url")? }))
//!                 .param::<String>("url"),
//!         ]
//!     }
//! }
//!
//! struct Users {
//!     store: Arc<dyn Store>,
//! }
//!
//! impl Constructible for Users {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![
//!             Constructor::new(|args| Ok(Users { store: args.get("store")? }))
//!                 .param::<dyn Store>("store"),
//!         ]
//!     }
//! }
//!
//! provides!(Postgres => dyn Store);
//!
//! let registry = Registry::new();
//! registry
//!     .register::<dyn Store, Postgres>()
//!     .with_constructor("url", String::from("postgres://localhost"))
//!     .as_singleton();
//! registry.register::<Users, Users>();
//!
//! let users = registry.resolve::<Users>().unwrap();
//! assert_eq!(users.store.url(), "postgres://localhost");
//! ```
//!
//! ## Constructor Selection
//!
//! Without overrides a registration binds, in order of preference, the
//! constructor taking exactly one [`Registry`], the zero-argument
//! constructor, or the first declared one.
//! [`Registration::with_constructor_signature`] picks an exact signature
//! instead.

mod constructor;
mod error;
mod factory;
#[cfg(feature = "logging")]
pub mod logging;
mod provider;
mod registration;
mod registry;
mod storage;
mod value;

pub use constructor::{Args, Constructible, Constructor, Param, ParamType};
pub use error::*;
pub use provider::*;
pub use registration::*;
pub use registry::*;
pub use value::*;

// Re-export tracing macros for convenience when logging feature is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

// Re-export for convenience
pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Args, Constructible, Constructor, DiError, Injectable, ParamType, Provides, Registration,
        Registry, Result, Value, provides,
    };
    pub use std::sync::Arc;
}
