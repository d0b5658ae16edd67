//! Service and method declarations.
//!
//! These are the parsed, un-annotated forms: ids are not assigned here. The
//! compiler reads explicit ids from [`Options`] and allocates the rest.

use crate::types::Options;

/// A `service` block.
///
/// ## Examples
///
/// ```
/// use hrpc_define::parse_schema;
///
/// let schema = parse_schema(r#"
///     message Req {}
///     service Files {
///         option (hrpc.service) = 7;
///         rpc Stat (Req) returns (Req) { option id = 2; }
///     }
/// "#).unwrap();
///
/// let service = &schema.services[0];
/// assert_eq!(service.options.get("hrpc.service"), Some("7"));
/// assert_eq!(service.method("Stat").unwrap().options.get("id"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub name: String,
    pub options: Options,
    /// Methods in declaration order.
    pub methods: Vec<MethodDefinition>,
}

impl ServiceDefinition {
    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A single `rpc` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDefinition {
    pub name: String,
    /// Request type name as written (may be `Void` or `NULL`).
    pub input_type: String,
    /// Response type name as written.
    pub output_type: String,
    pub options: Options,
}
