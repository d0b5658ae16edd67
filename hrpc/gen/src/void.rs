//! Void type classification.

use hrpc_define::Schema;

/// Type names that mean "no payload" unless shadowed by a declared message.
pub const VOID_NAMES: [&str; 3] = ["Void", "NULL", "hrpc.Void"];

/// Returns `true` if `type_name` denotes the empty payload.
///
/// A message the schema declares under one of these names is an ordinary
/// payload type.
///
/// ## Examples
///
/// ```
/// use hrpc_define::parse_schema;
/// use hrpc_gen::void::is_void;
///
/// let plain = parse_schema("message Ping {}").unwrap();
/// assert!(is_void(&plain, "Void"));
/// assert!(is_void(&plain, "NULL"));
/// assert!(!is_void(&plain, "Ping"));
///
/// let shadowed = parse_schema("message Void { optional int32 x = 1; }").unwrap();
/// assert!(!is_void(&shadowed, "Void"));
/// ```
pub fn is_void(schema: &Schema, type_name: &str) -> bool {
    VOID_NAMES.contains(&type_name) && !schema.has_message(type_name)
}

#[cfg(test)]
mod tests {
    use hrpc_define::parse_schema;

    use super::*;

    #[test]
    fn names_are_case_sensitive() {
        let schema = Schema::default();
        assert!(!is_void(&schema, "void"));
        assert!(!is_void(&schema, "Null"));
        assert!(!is_void(&schema, "VOID"));
    }

    #[test]
    fn namespaced_void_is_void() {
        assert!(is_void(&Schema::default(), "hrpc.Void"));
    }

    #[test]
    fn declared_null_is_a_payload() {
        let schema = parse_schema("message NULL {}").unwrap();
        assert!(!is_void(&schema, "NULL"));
        assert!(is_void(&schema, "Void"));
    }

    #[test]
    fn packaged_void_message_shadows_namespaced_name() {
        let schema = parse_schema("package hrpc; message Void {}").unwrap();
        assert!(!is_void(&schema, "hrpc.Void"));
    }
}
