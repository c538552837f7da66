//! # Lifeguard
//!
//! Typed field schemas for attribute records.
//!
//! Lifeguard adds declared field types, value coercion and validation to
//! plain attribute bags:
//!
//! - **Type registry**: a closed catalog of field types, each with its own
//!   coercion and type-check
//! - **Schema compilation**: field definitions and defaults are normalized
//!   once, when a record kind is declared
//! - **Validation pipeline**: every write is coerced, validated and
//!   type-checked; all errors are reported together and nothing is
//!   committed on failure
//! - **Records**: schema-aware record kinds, collections and plain classes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lifeguard::prelude::*;
//!
//! let book = RecordKind::builder("Book")
//!     .field("title", FieldDefinition::typed("string"))
//!     .field("published", FieldDefinition::typed("date"))
//!     .build()?;
//!
//! let record = book.create(Attributes::new())?;
//! record.try_set(attributes_from_json(json!({"published": "1965-08-01"})))?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod errors;
pub mod events;
pub mod observability;
pub mod record;
pub mod schema;
pub mod testing;
pub mod types;
pub mod utils;
pub mod validation;
pub mod value;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{LifeguardConfig, LoggingConfig};
    pub use crate::errors::{
        AttributeError, AttributeErrorKind, LifeguardError, SchemaError, SchemaErrorKind,
        ValidationErrors,
    };
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink, ERROR_EVENT};
    pub use crate::record::{
        BaseValidate, ClassKind, Collection, CollectionKind, KindCatalog, Record, RecordKind,
        SetOptions,
    };
    pub use crate::schema::{CompiledSchema, FieldDefinition, SchemaCompiler, SchemaDeclaration};
    pub use crate::types::{TypeName, TypeSpec, REGISTRY};
    pub use crate::value::{attributes_from_json, Attributes, Value};
}
