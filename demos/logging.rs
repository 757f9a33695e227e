//! Example demonstrating logging capabilities
//!
//! Run with JSON logging (production):
//! ```bash
//! cargo run --example logging --features logging-json
//! ```
//!
//! Run with pretty logging (development):
//! ```bash
//! cargo run --example logging --features logging-pretty
//! ```

use service_registry::{Constructible, Constructor, Registry, provides};
use std::sync::Arc;

trait Database: Send + Sync {
    fn url(&self) -> String;
}

trait UserService: Send + Sync {
    fn describe(&self) -> String;
}

struct Postgres {
    url: String,
}

impl Database for Postgres {
    fn url(&self) -> String {
        self.url.clone()
    }
}

impl Constructible for Postgres {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|args| Ok(Postgres { url: args.cloned("url")? })).param::<String>("url")]
    }
}

struct Users {
    db: Arc<dyn Database>,
}

impl UserService for Users {
    fn describe(&self) -> String {
        format!("users stored at {}", self.db.url())
    }
}

impl Constructible for Users {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|args| Ok(Users { db: args.get("db")? })).param::<dyn Database>("db")]
    }
}

provides!(Postgres => dyn Database);
provides!(Users => dyn UserService);

fn main() {
    // Initialize logging - uses JSON if logging-json feature enabled,
    // pretty if logging-pretty enabled
    #[cfg(feature = "logging")]
    {
        service_registry::logging::init();
    }

    println!("=== Service Registry Logging Demo ===\n");

    // Create registry (logs: "Creating new registry")
    let registry = Registry::new();

    // Register services (logs: "Registering service", "Selected constructor")
    registry
        .register::<dyn Database, Postgres>()
        .with_constructor("url", String::from("postgres://localhost/mydb"))
        .as_singleton();

    registry.register::<dyn UserService, Users>();

    // A second database under its own name (logs: "Rebinding constructor parameter")
    registry
        .register_named::<dyn Database, Postgres>("replica")
        .with_constructor("url", String::from("postgres://replica/mydb"));

    // Resolve services (logs: "Resolving registration", "Singleton initializing on first access")
    let users = registry.resolve::<dyn UserService>().unwrap();
    println!("  [App] {}", users.describe());

    let replica = registry.resolve_named::<dyn Database>("replica").unwrap();
    println!("  [App] replica at {}", replica.url());

    // Try to get a registration that doesn't exist (logs: "No provider registered under name")
    let missing = registry.resolve_named::<dyn Database>("archive");
    assert!(missing.is_err());

    // Clear everything (logs: "Registry cleared")
    registry.clear_registrations();
    assert!(registry.try_resolve::<dyn UserService>().is_none());

    println!("\n=== Demo Complete ===");
    println!("Check the log output above to see structured logging in action!");
    println!("\nTip: Use --features logging-json for production (JSON output)");
    println!("     Use --features logging-pretty for development (colorful output)");
}
