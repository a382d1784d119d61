//! Basic example of the rndi container.

use std::sync::Arc;

use rndi::Parameter;
use rndi::prelude::*;

// === Define your types ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

#[derive(Injectable)]
struct Database {
    database_url: String,
    logger: Arc<dyn Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.database_url)
    }
}

#[derive(Injectable)]
struct UserService {
    #[inject(name = "db")]
    database: Database,
    logger: Arc<dyn Logger>,
    #[inject(default = "100")]
    page_size: usize,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.logger.log(&format!("Getting user {id} (page size {})", self.page_size));
        self.database.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

#[derive(Injectable)]
struct Greeter {
    greeting: String,
}

// === Providers ===

struct InfrastructureProvider;

impl ServiceProvider for InfrastructureProvider {
    fn register(&self, binder: &mut Binder<'_>) {
        binder
            // Instance: the same Arc is handed out every time
            .bind_instance("logger", Arc::new(ConsoleLogger) as Arc<dyn Logger>)
            .bind_instance("database_url", String::from("postgres://localhost/myapp"))
            // Class: a fresh Database per resolution
            .bind_class::<Database>("db");
    }
}

struct GreetingProvider;

impl ServiceProvider for GreetingProvider {
    fn register(&self, binder: &mut Binder<'_>) {
        binder
            .bind_instance("name", String::from("Vicent"))
            // Factory: computed from other bindings on every resolution
            .bind_factory("greeting", vec![Parameter::required::<String>("name")], |args| {
                Ok(format!("Hello {}!", args.take::<String>("name")?))
            });
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("rndi_container=debug")
        .init();

    let container = Container::builder()
        .add_provider(InfrastructureProvider)
        .add_provider(GreetingProvider)
        .build();

    // Registration runs here, once
    container.warm_up();
    println!("✅ Container built successfully!");
    println!("{container:?}");

    let service: UserService = container.get()?;
    println!("👤 {}", service.get_user(42));

    let greeter: Greeter = container.get()?;
    println!("👋 {}", greeter.greeting);

    // Not an injectable class
    match container.get::<u64>() {
        Err(err) => tracing::warn!(%err, "Expected failure"),
        Ok(_) => unreachable!(),
    }

    println!("\n🎉 Everything works!");
    Ok(())
}
