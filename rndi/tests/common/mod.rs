//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rndi::prelude::*;
use rndi::Parameter;

pub const FOO: &str = "This is a foo.";
pub const BAR: &str = "This is a bar.";
pub const NAME: &str = "Vicent";

pub fn greeting_for(name: &str) -> String {
    format!("Hello {name}!")
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Injectable)]
pub struct SampleWithMissingDependency {
    pub missing_dependency: String,
}

#[derive(Debug, Injectable)]
pub struct Sample {
    pub foo: String,
    pub bar: String,
    pub greeting: String,
}

/// Binds everything `Sample` needs except `greeting`.
///
/// `provide_greeting` is a plain helper: it is not bound, so it plays no
/// part in resolution.
pub struct SampleServiceProvider;

impl SampleServiceProvider {
    pub fn provide_greeting(&self, name: &str) -> String {
        greeting_for(name)
    }
}

impl ServiceProvider for SampleServiceProvider {
    fn register(&self, binder: &mut Binder<'_>) {
        binder
            .bind_instance("name", NAME.to_string())
            .bind_instance("foo", FOO.to_string())
            .bind_instance("bar", BAR.to_string())
            .bind_class::<Sample>("foobar");
    }
}

/// Binds `greeting` through a factory over `name`.
pub struct GreetingFactoryProvider;

impl ServiceProvider for GreetingFactoryProvider {
    fn register(&self, binder: &mut Binder<'_>) {
        binder.bind_factory("greeting", vec![Parameter::required::<String>("name")], |args| {
            Ok(greeting_for(&args.take::<String>("name")?))
        });
    }
}

/// Binds `greeting` directly.
pub struct GreetingInstanceProvider(pub &'static str);

impl ServiceProvider for GreetingInstanceProvider {
    fn register(&self, binder: &mut Binder<'_>) {
        binder.bind_instance("greeting", self.0.to_string());
    }
}

/// Counts how many times it was registered.
pub struct CountingProvider(pub Arc<AtomicUsize>);

impl CountingProvider {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl ServiceProvider for CountingProvider {
    fn register(&self, _: &mut Binder<'_>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
