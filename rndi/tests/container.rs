mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;

use rndi::prelude::*;
use rndi::{Binding, Parameter};

use common::*;

#[derive(Debug, Clone, PartialEq)]
struct Settings {
    url: String,
}

#[derive(Injectable)]
struct Repository {
    settings: Arc<Settings>,
    #[inject(default = "5")]
    pool_size: u32,
    #[inject(default)]
    verbose: bool,
}

#[derive(Injectable)]
struct UserService {
    #[inject(name = "user_repository")]
    repository: Repository,
    r#type: String,
}

#[derive(Debug, Injectable)]
struct Clock;

#[derive(Injectable)]
struct Ticket {
    serial: u64,
}

#[derive(Injectable)]
struct Desk {
    ticket: Ticket,
}

#[derive(Injectable)]
struct Mirror {
    #[inject(name = "host")]
    primary: String,
    #[inject(name = "host")]
    replica: String,
}

#[derive(Injectable)]
struct Pair {
    #[inject(name = "ticket")]
    left: Ticket,
    #[inject(name = "ticket")]
    right: Ticket,
}

#[derive(Injectable)]
struct Chicken {
    egg: Egg,
}

#[derive(Injectable)]
struct Egg {
    hen: String,
}

struct SettingsProvider(Arc<Settings>);

impl ServiceProvider for SettingsProvider {
    fn register(&self, binder: &mut Binder<'_>) {
        binder.bind_instance("settings", self.0.clone());
    }
}

fn settings() -> Arc<Settings> {
    Arc::new(Settings {
        url: "postgres://localhost/app".to_string(),
    })
}

#[test]
fn container_should_provide_required_instance_using_dependencies_from_service_provider() {
    init_logging();
    let container = Container::builder()
        .add_provider(SampleServiceProvider)
        .add_provider(GreetingFactoryProvider)
        .build();

    let service: Sample = container.get().unwrap();

    assert_eq!(service.foo, FOO);
    assert_eq!(service.bar, BAR);
    assert_eq!(service.greeting, greeting_for(NAME));
}

#[test]
fn container_should_provide_directly_bound_greeting() {
    init_logging();
    let container = Container::builder()
        .add_provider(SampleServiceProvider)
        .add_provider(GreetingInstanceProvider("Hello Vicent!"))
        .build();

    let service: Sample = container.get().unwrap();
    assert_eq!(service.foo, "This is a foo.");
    assert_eq!(service.bar, "This is a bar.");
    assert_eq!(service.greeting, "Hello Vicent!");
}

#[test]
fn unbound_helper_does_not_satisfy_greeting() {
    init_logging();
    let provider = SampleServiceProvider;
    assert_eq!(provider.provide_greeting(NAME), "Hello Vicent!");

    let container = Container::builder().add_provider(provider).build();

    match container.get::<Sample>() {
        Err(ContainerError::DependencyBuildingFailure(msg)) => {
            assert!(msg.contains("greeting"), "unexpected message: {msg}");
            assert!(msg.contains("Sample"), "unexpected message: {msg}");
        }
        other => panic!("Expected DependencyBuildingFailure, got: {other:?}"),
    }
}

#[test]
fn container_should_raise_dependency_building_failure_on_missing_dependency() {
    init_logging();
    let container = Container::builder().add_provider(SampleServiceProvider).build();

    let err = container.get::<SampleWithMissingDependency>().unwrap_err();
    assert!(matches!(err, ContainerError::DependencyBuildingFailure(_)));
    assert!(err.message().contains("missing_dependency"));
}

#[test]
fn container_should_raise_invalid_class_type_on_calling_get_with_no_class_type() {
    init_logging();
    let container = Container::new(vec![]);

    assert!(matches!(container.get::<i32>(), Err(ContainerError::InvalidClassType(_))));
    assert!(matches!(container.get::<String>(), Err(ContainerError::InvalidClassType(_))));
}

#[test]
fn later_provider_overrides_earlier_binding() {
    init_logging();
    let container = Container::builder()
        .add_provider(SampleServiceProvider)
        .add_provider(GreetingFactoryProvider)
        .add_provider(GreetingInstanceProvider("Hi!"))
        .build();
    assert_eq!(container.get::<Sample>().unwrap().greeting, "Hi!");

    let container = Container::builder()
        .add_provider(SampleServiceProvider)
        .add_provider(GreetingInstanceProvider("Hi!"))
        .add_provider(GreetingFactoryProvider)
        .build();
    assert_eq!(container.get::<Sample>().unwrap().greeting, "Hello Vicent!");
}

#[test]
fn providers_register_once_across_gets() {
    init_logging();
    let counting = Arc::new(CountingProvider(Arc::new(AtomicUsize::new(0))));
    let container = Container::builder()
        .add_provider(SampleServiceProvider)
        .add_provider(GreetingFactoryProvider)
        .add_shared_provider(counting.clone())
        .build();

    assert_eq!(counting.count(), 0);
    for _ in 0..3 {
        let _: Sample = container.get().unwrap();
    }
    let _ = container.get::<SampleWithMissingDependency>();

    assert_eq!(counting.count(), 1);
}

#[test]
fn defaults_apply_only_when_unbound() {
    init_logging();
    let shared = settings();
    let container = Container::builder()
        .add_provider(SettingsProvider(shared.clone()))
        .build();

    let repository: Repository = container.get().unwrap();
    assert_eq!(repository.settings.url, "postgres://localhost/app");
    assert_eq!(repository.pool_size, 5);
    assert!(!repository.verbose);

    struct Tuning;

    impl ServiceProvider for Tuning {
        fn register(&self, binder: &mut Binder<'_>) {
            binder.bind_instance("pool_size", 32u32).bind_instance("verbose", true);
        }
    }

    let container = Container::builder()
        .add_provider(SettingsProvider(shared))
        .add_provider(Tuning)
        .build();

    let repository: Repository = container.get().unwrap();
    assert_eq!(repository.pool_size, 32);
    assert!(repository.verbose);
}

#[test]
fn instance_bindings_are_reference_identical() {
    init_logging();
    let shared = settings();
    let container = Container::builder()
        .add_provider(SettingsProvider(shared.clone()))
        .build();

    let a: Repository = container.get().unwrap();
    let b: Repository = container.get().unwrap();

    assert!(Arc::ptr_eq(&a.settings, &shared));
    assert!(Arc::ptr_eq(&a.settings, &b.settings));
}

#[test]
fn renamed_and_raw_keywords() {
    init_logging();

    struct Users;

    impl ServiceProvider for Users {
        fn register(&self, binder: &mut Binder<'_>) {
            binder
                .bind_class::<Repository>("user_repository")
                .bind_instance("type", String::from("admin"));
        }
    }

    let container = Container::builder()
        .add_provider(SettingsProvider(settings()))
        .add_provider(Users)
        .build();

    let service: UserService = container.get().unwrap();
    assert_eq!(service.r#type, "admin");
    assert_eq!(service.repository.pool_size, 5);
}

#[test]
fn unit_struct_needs_no_bindings() {
    init_logging();
    let container = Container::new(vec![]);
    assert!(container.get::<Clock>().is_ok());
}

#[test]
fn class_bindings_are_transient() {
    init_logging();

    struct Counter(Arc<AtomicU64>);

    impl ServiceProvider for Counter {
        fn register(&self, binder: &mut Binder<'_>) {
            let next = self.0.clone();
            binder
                .bind_class::<Ticket>("ticket")
                .bind_factory("serial", vec![], move |_| Ok(next.fetch_add(1, Ordering::SeqCst)));
        }
    }

    let container = Container::builder()
        .add_provider(Counter(Arc::new(AtomicU64::new(100))))
        .build();

    let first: Desk = container.get().unwrap();
    let second: Desk = container.get().unwrap();
    assert_eq!(first.ticket.serial, 100);
    assert_eq!(second.ticket.serial, 101);
}

#[test]
fn wrong_argument_type_is_invalid_class_type() {
    init_logging();

    struct SignedPool;

    impl ServiceProvider for SignedPool {
        fn register(&self, binder: &mut Binder<'_>) {
            binder.bind_instance("pool_size", -1i64);
        }
    }

    let container = Container::builder()
        .add_provider(SettingsProvider(settings()))
        .add_provider(SignedPool)
        .build();

    match container.get::<Repository>() {
        Err(ContainerError::InvalidClassType(msg)) => {
            assert!(msg.contains("pool_size"), "unexpected message: {msg}");
            assert!(msg.contains("expected u32"), "unexpected message: {msg}");
        }
        Err(other) => panic!("Expected InvalidClassType, got: {other:?}"),
        Ok(_) => panic!("Expected InvalidClassType, got a Repository"),
    }
}

#[test]
fn cycles_fail_fast() {
    init_logging();

    struct Farm;

    impl ServiceProvider for Farm {
        fn register(&self, binder: &mut Binder<'_>) {
            binder
                .bind_class::<Egg>("egg")
                .bind_class::<Chicken>("chicken")
                .bind_factory("hen", vec![Parameter::required::<Chicken>("chicken")], |args| {
                    let _: Chicken = args.take("chicken")?;
                    Ok(String::from("hen"))
                });
        }
    }

    let container = Container::builder().add_provider(Farm).build();

    match container.get::<Chicken>() {
        Err(ContainerError::CircularDependency(msg)) => {
            assert!(
                msg.contains("Chicken → egg → hen → chicken → egg"),
                "unexpected message: {msg}"
            );
        }
        Err(other) => panic!("Expected CircularDependency, got: {other:?}"),
        Ok(_) => panic!("Expected CircularDependency, got a Chicken"),
    }
}

#[test]
fn warmed_up_container_is_shared_across_threads() {
    init_logging();
    let container = Arc::new(
        Container::builder()
            .add_provider(SampleServiceProvider)
            .add_provider(GreetingFactoryProvider)
            .build(),
    );
    container.warm_up();
    assert!(container.is_built());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || container.get::<Sample>().map(|s| s.greeting))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "Hello Vicent!");
    }
}

#[test]
fn fields_sharing_a_keyword_each_receive_the_binding() {
    init_logging();

    struct Hosts;

    impl ServiceProvider for Hosts {
        fn register(&self, binder: &mut Binder<'_>) {
            binder.bind_instance("host", String::from("db.local"));
        }
    }

    let container = Container::builder().add_provider(Hosts).build();

    let mirror: Mirror = container.get().unwrap();
    assert_eq!(mirror.primary, "db.local");
    assert_eq!(mirror.replica, "db.local");
}

#[test]
fn shared_class_keyword_builds_one_instance_per_field() {
    init_logging();

    struct Counter(Arc<AtomicU64>);

    impl ServiceProvider for Counter {
        fn register(&self, binder: &mut Binder<'_>) {
            let next = self.0.clone();
            binder
                .bind_class::<Ticket>("ticket")
                .bind_factory("serial", vec![], move |_| Ok(next.fetch_add(1, Ordering::SeqCst)));
        }
    }

    let container = Container::builder()
        .add_provider(Counter(Arc::new(AtomicU64::new(1))))
        .build();

    let pair: Pair = container.get().unwrap();
    assert_eq!(pair.left.serial, 1);
    assert_eq!(pair.right.serial, 2);
}

#[test]
fn factory_parameters_sharing_a_keyword() {
    init_logging();

    struct Echo;

    impl ServiceProvider for Echo {
        fn register(&self, binder: &mut Binder<'_>) {
            binder
                .bind_instance("word", String::from("hey"))
                .bind_factory(
                    "greeting",
                    vec![
                        Parameter::required::<String>("word"),
                        Parameter::required::<String>("word"),
                    ],
                    |args| {
                        let first: String = args.take("word")?;
                        let second: String = args.take("word")?;
                        Ok(format!("{first} {second}!"))
                    },
                );
        }
    }

    let container = Container::builder()
        .add_provider(SampleServiceProvider)
        .add_provider(Echo)
        .build();

    assert_eq!(container.get::<Sample>().unwrap().greeting, "hey hey!");
}

#[test]
fn seeded_bindings_resolve_and_yield_to_later_providers() {
    init_logging();
    let seeded = || {
        Bindings::over(
            SampleServiceProvider,
            vec![Binding::instance("greeting", String::from("Hola Vicent!"))],
        )
    };

    let container = Container::builder().add_provider(seeded()).build();
    assert_eq!(container.get::<Sample>().unwrap().greeting, "Hola Vicent!");

    let container = Container::builder()
        .add_provider(seeded())
        .add_provider(GreetingFactoryProvider)
        .build();
    assert_eq!(container.get::<Sample>().unwrap().greeting, "Hello Vicent!");

    let data_only: Bindings = vec![
        Binding::instance("foo", FOO.to_string()),
        Binding::instance("bar", BAR.to_string()),
        Binding::instance("greeting", String::from("Hi!")),
    ]
    .into();
    let container = Container::builder().add_provider(data_only).build();
    let service: Sample = container.get().unwrap();
    assert_eq!(service.foo, FOO);
    assert_eq!(service.greeting, "Hi!");
}
