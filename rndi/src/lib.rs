//! # rndi — explicit dependency injection for Rust
//!
//! Service providers declare keyword bindings; the container builds a
//! requested type by matching each of its constructor parameters, by name,
//! to those keywords.
//!
//! ```rust
//! use rndi::prelude::*;
//! use rndi::Parameter;
//!
//! #[derive(Injectable)]
//! struct Sample {
//!     foo: String,
//!     bar: String,
//!     greeting: String,
//! }
//!
//! struct SampleServiceProvider;
//!
//! impl ServiceProvider for SampleServiceProvider {
//!     fn register(&self, binder: &mut Binder<'_>) {
//!         binder
//!             .bind_instance("name", String::from("Vicent"))
//!             .bind_instance("foo", String::from("This is a foo."))
//!             .bind_instance("bar", String::from("This is a bar."))
//!             .bind_class::<Sample>("foobar")
//!             .bind_factory("greeting", vec![Parameter::required::<String>("name")], |args| {
//!                 Ok(format!("Hello {}!", args.take::<String>("name")?))
//!             });
//!     }
//! }
//!
//! fn main() {
//!     let container = Container::builder()
//!         .add_provider(SampleServiceProvider)
//!         .build();
//!
//!     let sample: Sample = container.get().expect("Failed to resolve");
//!     assert_eq!(sample.greeting, "Hello Vicent!");
//! }
//! ```

pub use rndi_container::*;
pub use rndi_derive::Injectable;
pub use rndi_support::*;

pub mod prelude {
    pub use rndi_container::prelude::*;
    pub use rndi_derive::Injectable;
}
