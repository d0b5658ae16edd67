//! Error type injection.
//!
//! Every binding decodes remote failures with an `RPCError` message. Schemas
//! that do not declare one get the standard definition appended to their
//! source text before the authoritative parse.

use std::borrow::Cow;

use hrpc_define::Schema;
use tracing::debug;

/// Name of the message used to carry remote failures.
pub const ERROR_TYPE_NAME: &str = "RPCError";

/// Standard error message appended when the schema has none.
pub const ERROR_TYPE_DEFINITION: &str = "\
message RPCError {
  required string message = 1;
  optional string code = 2;
  optional int32 errno = 3;
  optional string details = 4;
}
";

/// Ensures the schema text declares an `RPCError` message.
///
/// `schema` must be the parse of `source`. When it already declares
/// `RPCError` the text is returned borrowed and unchanged, whatever shape the
/// user gave it. Otherwise the standard definition is appended.
///
/// ## Examples
///
/// ```
/// use std::borrow::Cow;
/// use hrpc_define::parse_schema;
/// use hrpc_gen::inject::inject_error_type;
///
/// let source = "message Ping {}";
/// let schema = parse_schema(source).unwrap();
/// let injected = inject_error_type(source, &schema);
/// assert!(injected.contains("message RPCError"));
///
/// let source = "message RPCError { optional string why = 1; }";
/// let schema = parse_schema(source).unwrap();
/// assert!(matches!(inject_error_type(source, &schema), Cow::Borrowed(_)));
/// ```
pub fn inject_error_type<'a>(source: &'a str, schema: &Schema) -> Cow<'a, str> {
    if schema.has_message(ERROR_TYPE_NAME) {
        debug!("schema declares its own {}", ERROR_TYPE_NAME);
        return Cow::Borrowed(source);
    }

    debug!("appending standard {} definition", ERROR_TYPE_NAME);
    let mut text = String::with_capacity(source.len() + ERROR_TYPE_DEFINITION.len() + 1);
    text.push_str(source);
    if !source.is_empty() && !source.ends_with('\n') {
        text.push('\n');
    }
    text.push('\n');
    text.push_str(ERROR_TYPE_DEFINITION);
    Cow::Owned(text)
}
