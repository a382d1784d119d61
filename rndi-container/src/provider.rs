//! Service providers — modules of related bindings.
//!
//! A provider groups the bindings of one concern, the way a Laravel
//! `ServiceProvider` does. The container runs every provider's
//! [`register`](ServiceProvider::register) hook once, in list order, against
//! a shared [`BindingTable`]; a later provider overrides the keywords of an
//! earlier one.
//!
//! # Examples
//! ```
//! use rndi_container::provider::{Binder, ServiceProvider};
//!
//! struct MailProvider;
//!
//! impl ServiceProvider for MailProvider {
//!     fn register(&self, binder: &mut Binder<'_>) {
//!         binder
//!             .bind_instance("smtp_host", String::from("localhost"))
//!             .bind_instance("smtp_port", 25u16);
//!     }
//! }
//! ```
//!
//! Bindings that already exist as data need no provider type of their own:
//! [`Bindings`] replays them, optionally after a wrapped provider.

use std::fmt;
use std::sync::Arc;

use crate::binding::{Binding, BindingTable};
use crate::class::{Arguments, ClassRef, Injectable, Parameter};
use crate::error::GraphError;

/// A module that declares bindings into the container.
///
/// Only explicit bindings count: helper methods on a provider take part in
/// resolution only when bound with [`Binder::bind_factory`].
pub trait ServiceProvider: Send + Sync {
    /// Declare this provider's bindings.
    ///
    /// Called once per container, on its first resolution. Declaring no
    /// bindings is fine.
    fn register(&self, binder: &mut Binder<'_>);

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Write handle on the shared binding table, handed to
/// [`ServiceProvider::register`].
///
/// Every bind returns the binder itself so calls can be chained.
pub struct Binder<'a> {
    table: &'a mut BindingTable,
}

impl<'a> Binder<'a> {
    pub fn new(table: &'a mut BindingTable) -> Self {
        Self { table }
    }

    /// Binds `keyword` to a pre-built value.
    ///
    /// Every consumer receives a clone; bind an `Arc<T>` when consumers must
    /// share the same allocation.
    pub fn bind_instance<V>(&mut self, keyword: impl Into<String>, value: V) -> &mut Self
    where
        V: Clone + Send + Sync + 'static,
    {
        self.table.insert(Binding::instance(keyword, value));
        self
    }

    /// Binds `keyword` to class `C`, constructed anew for every consumer.
    pub fn bind_class<C: Injectable>(&mut self, keyword: impl Into<String>) -> &mut Self {
        self.bind_class_ref(keyword, ClassRef::of::<C>())
    }

    /// Binds `keyword` to an already obtained [`ClassRef`].
    pub fn bind_class_ref(&mut self, keyword: impl Into<String>, class: ClassRef) -> &mut Self {
        self.table.insert(Binding::class(keyword, class));
        self
    }

    /// Binds `keyword` to a factory run on every resolution.
    ///
    /// `parameters` are resolved by name like constructor parameters and
    /// handed to the closure.
    ///
    /// ```
    /// use rndi_container::class::Parameter;
    /// use rndi_container::binding::BindingTable;
    /// use rndi_container::provider::Binder;
    ///
    /// let mut table = BindingTable::new();
    /// Binder::new(&mut table)
    ///     .bind_instance("name", String::from("Vicent"))
    ///     .bind_factory("greeting", vec![Parameter::required::<String>("name")], |args| {
    ///         Ok(format!("Hello {}!", args.take::<String>("name")?))
    ///     });
    /// assert_eq!(table.keywords(), vec!["name", "greeting"]);
    /// ```
    pub fn bind_factory<V, F>(
        &mut self,
        keyword: impl Into<String>,
        parameters: Vec<Parameter>,
        factory: F,
    ) -> &mut Self
    where
        V: Send + Sync + 'static,
        F: Fn(&mut Arguments) -> Result<V, GraphError> + Send + Sync + 'static,
    {
        self.table.insert(Binding::factory(keyword, parameters, factory));
        self
    }

    /// Inserts an already built binding.
    pub fn bind(&mut self, binding: Binding) -> &mut Self {
        self.table.insert(binding);
        self
    }

    /// Number of bindings currently in the shared table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// A provider seeded with ready-made bindings.
///
/// On registration the wrapped provider, if any, declares its bindings
/// first; the seeded bindings are inserted after them and win on a shared
/// keyword.
///
/// ```
/// use rndi_container::binding::{Binding, BindingTable};
/// use rndi_container::provider::{Binder, Bindings, ServiceProvider};
///
/// let seeded = Bindings::new(vec![Binding::instance("smtp_port", 2525u16)])
///     .with(Binding::instance("smtp_host", String::from("localhost")));
///
/// let mut table = BindingTable::new();
/// seeded.register(&mut Binder::new(&mut table));
/// assert_eq!(table.keywords(), vec!["smtp_port", "smtp_host"]);
/// ```
#[derive(Clone, Default)]
pub struct Bindings {
    base: Option<Arc<dyn ServiceProvider>>,
    seeded: Vec<Binding>,
}

impl Bindings {
    pub fn new(seeded: Vec<Binding>) -> Self {
        Self { base: None, seeded }
    }

    /// Seeds `provider` with `seeded`, replayed after its own declarations.
    pub fn over(provider: impl ServiceProvider + 'static, seeded: Vec<Binding>) -> Self {
        Self {
            base: Some(Arc::new(provider)),
            seeded,
        }
    }

    /// Appends one more seeded binding.
    pub fn with(mut self, binding: Binding) -> Self {
        self.seeded.push(binding);
        self
    }

    pub fn len(&self) -> usize {
        self.seeded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeded.is_empty()
    }
}

impl From<Vec<Binding>> for Bindings {
    fn from(seeded: Vec<Binding>) -> Self {
        Self::new(seeded)
    }
}

impl ServiceProvider for Bindings {
    fn register(&self, binder: &mut Binder<'_>) {
        if let Some(base) = &self.base {
            base.register(binder);
        }
        for binding in &self.seeded {
            binder.bind(binding.clone());
        }
    }

    fn name(&self) -> &str {
        match &self.base {
            Some(base) => base.name(),
            None => "Bindings",
        }
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("base", &self.base.as_ref().map(|base| base.name()))
            .field("seeded", &self.seeded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingKind;

    struct Transport;

    impl Injectable for Transport {
        fn parameters() -> Vec<Parameter> {
            vec![]
        }

        fn construct(_: &mut Arguments) -> Result<Self, GraphError> {
            Ok(Transport)
        }
    }

    struct MailProvider;

    impl ServiceProvider for MailProvider {
        fn register(&self, binder: &mut Binder<'_>) {
            binder
                .bind_instance("smtp_host", String::from("localhost"))
                .bind_class::<Transport>("transport")
                .bind_factory("smtp_url", vec![Parameter::required::<String>("smtp_host")], |args| {
                    Ok(format!("smtp://{}", args.take::<String>("smtp_host")?))
                });
        }
    }

    struct EmptyProvider;

    impl ServiceProvider for EmptyProvider {
        fn register(&self, _: &mut Binder<'_>) {}
    }

    #[test]
    fn provider_declares_bindings() {
        let mut table = BindingTable::new();
        MailProvider.register(&mut Binder::new(&mut table));

        assert_eq!(table.keywords(), vec!["smtp_host", "transport", "smtp_url"]);
        assert!(matches!(table.get("transport").unwrap().kind(), BindingKind::Class(_)));
        assert!(matches!(table.get("smtp_url").unwrap().kind(), BindingKind::Factory { .. }));
    }

    #[test]
    fn empty_provider_is_legal() {
        let mut table = BindingTable::new();
        let mut binder = Binder::new(&mut table);
        EmptyProvider.register(&mut binder);
        assert!(binder.is_empty());
    }

    #[test]
    fn later_provider_overrides() {
        struct Override;

        impl ServiceProvider for Override {
            fn register(&self, binder: &mut Binder<'_>) {
                binder.bind_instance("smtp_host", String::from("mail.example.com"));
            }
        }

        let mut table = BindingTable::new();
        MailProvider.register(&mut Binder::new(&mut table));
        Override.register(&mut Binder::new(&mut table));

        assert_eq!(table.len(), 3);
        let host = match table.get("smtp_host").unwrap().kind() {
            BindingKind::Instance(produce) => produce().downcast::<String>().unwrap(),
            other => panic!("Expected instance, got: {}", other.label()),
        };
        assert_eq!(*host, "mail.example.com");
    }

    #[test]
    fn provider_has_name() {
        assert!(MailProvider.name().contains("MailProvider"));
        assert!(Bindings::over(MailProvider, vec![]).name().contains("MailProvider"));
        assert_eq!(Bindings::default().name(), "Bindings");
    }

    #[test]
    fn seeded_bindings_follow_own_declarations() {
        let seeded = Bindings::over(
            MailProvider,
            vec![
                Binding::instance("smtp_host", String::from("relay.local")),
                Binding::instance("smtp_port", 587u16),
            ],
        );
        assert_eq!(seeded.len(), 2);

        let mut table = BindingTable::new();
        seeded.register(&mut Binder::new(&mut table));

        assert_eq!(table.keywords(), vec!["smtp_host", "transport", "smtp_url", "smtp_port"]);
        let host = match table.get("smtp_host").unwrap().kind() {
            BindingKind::Instance(produce) => produce().downcast::<String>().unwrap(),
            other => panic!("Expected instance, got: {}", other.label()),
        };
        assert_eq!(*host, "relay.local");
    }

    #[test]
    fn seeded_bindings_replay_on_every_registration() {
        let seeded: Bindings =
            vec![Binding::class("transport", ClassRef::of::<Transport>())].into();

        for _ in 0..2 {
            let mut table = BindingTable::new();
            seeded.register(&mut Binder::new(&mut table));
            assert!(table.contains("transport"));
        }
        assert!(format!("{seeded:?}").contains("transport"));
    }
}
