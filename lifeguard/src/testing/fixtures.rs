//! Ready-made record kinds for tests and examples.

use crate::errors::SchemaError;
use crate::record::{CollectionKind, RecordKind};
use crate::schema::{FieldDefinition, SchemaDeclaration};
use crate::types::TypeSpec;
use crate::value::{attributes_from_json, Attributes, Value};
use std::sync::Arc;

/// Rejects missing ISBNs and ISBNs shorter than ten characters.
#[must_use]
pub fn isbn_validator(value: &Value) -> Option<String> {
    let long_enough = value.as_str().is_some_and(|isbn| isbn.chars().count() >= 10);
    (!long_enough).then(|| "too short".to_string())
}

/// Builds attributes from a JSON object literal.
#[must_use]
pub fn attrs(value: serde_json::Value) -> Attributes {
    attributes_from_json(value)
}

/// The kinds of a small bookstore domain.
#[derive(Debug, Clone)]
pub struct Bookstore {
    /// `Author`: no fields, so writes are not validated.
    pub author: Arc<RecordKind>,
    /// `Authors`: a collection of `Author` records.
    pub authors: Arc<CollectionKind>,
    /// `Book`: typed fields referencing both of the above.
    pub book: Arc<RecordKind>,
}

/// The `Book` declaration, given its author kinds.
#[must_use]
pub fn book_declaration(author: &Arc<RecordKind>, authors: &Arc<CollectionKind>) -> SchemaDeclaration {
    SchemaDeclaration::new()
        .field("id", FieldDefinition::typed("integer").default_value(Value::Null))
        .field("isbn", FieldDefinition::typed("string").validate(isbn_validator))
        .field("title", FieldDefinition::typed("String"))
        .field("pages", FieldDefinition::typed("integer"))
        .field("published", FieldDefinition::typed("date"))
        .field("author", FieldDefinition::typed(TypeSpec::class(Arc::clone(author))))
        .field("similarAuthors", FieldDefinition::typed(TypeSpec::class(Arc::clone(authors))))
}

/// Declares the bookstore kinds.
///
/// # Errors
///
/// Propagates compile errors of the declarations.
pub fn bookstore() -> Result<Bookstore, SchemaError> {
    let author = RecordKind::builder("Author")
        .with_default("firstName", "")
        .with_default("lastName", "")
        .build()?;
    let authors = CollectionKind::new("Authors", Arc::clone(&author));
    let book = RecordKind::declare("Book", book_declaration(&author, &authors))?;

    Ok(Bookstore {
        author,
        authors,
        book,
    })
}
