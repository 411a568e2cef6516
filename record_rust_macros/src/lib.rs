mod record;

use proc_macro::TokenStream;

/// Derive macro implementing `record_rust::Record` (and `PartialEq` by
/// attribute comparison) for a struct with named fields.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Debug, Record)]
/// #[record(entity = "Person", configure = Person::schema)]
/// struct Person {
///     meta: RecordMeta,
///     name: Option<String>,
///     #[record(extra)]
///     extra: Attributes,
/// }
/// ```
///
/// Struct attributes:
/// - `entity = "..."`: entity type name (default: the struct name)
/// - `configure = path`: `fn(&mut Schema<Self>)` registering validations,
///   callbacks and associations
///
/// Field attributes:
/// - `meta`: the `RecordMeta` field (default: the field named `meta`)
/// - `extra`: an `Attributes` field holding any attribute not declared as a
///   field
/// - `skip`: not an attribute; filled with `Default::default()` on
///   construction
///
/// Every other field is an attribute named after the field and converted
/// through serde.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
