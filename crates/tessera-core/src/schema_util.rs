//! Helpers for turning Rust type information into JSON Schema. The schemas
//! document the on-disk configuration formats (settings file, skill
//! `config.json`) so editors can validate them before the loader does.

use schemars::{JsonSchema, SchemaGenerator, r#gen::SchemaSettings};
use serde_json::Value;

/// Generate a JSON Schema for the given `T` **inline**, i.e. without
/// `$ref` pointers to external definitions.
///
/// # Example
///
/// ```
/// use tessera_core::schema_util::derive_schema;
/// use schemars::JsonSchema;
///
/// #[derive(JsonSchema)]
/// struct Foo { bar: String }
///
/// let schema = derive_schema::<Foo>();
/// assert_eq!(schema["properties"]["bar"]["type"], "string");
/// ```
pub fn derive_schema<T>() -> Value
where
    T: JsonSchema + 'static,
{
    // Inline so a single file fully describes the format.
    let mut settings = SchemaSettings::draft07();
    settings.inline_subschemas = true;

    let generator = SchemaGenerator::new(settings);
    let root = generator.into_root_schema_for::<T>();

    serde_json::to_value(root).unwrap_or_default()
}
