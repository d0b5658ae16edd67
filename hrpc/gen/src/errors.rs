//! Error types for the hrpc generator.

use hrpc_define::ParseError;
use thiserror::Error;

/// Errors that can occur while compiling a schema into a binding.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The schema text could not be parsed.
    #[error("Failed to parse schema: {0}")]
    Parse(#[from] ParseError),

    /// `--service` named a service the schema does not declare.
    #[error("Service '{name}' not found in schema (available: {})", format_available(.available))]
    ServiceNotFound {
        name: String,
        /// Declared service names, in declaration order.
        available: Vec<String>,
    },

    /// A request or response type is neither a declared message nor void.
    #[error("Unknown type '{type_name}' used by {service}.{method}")]
    UnresolvedType {
        service: String,
        method: String,
        type_name: String,
    },

    /// An `id` option whose value is not an unsigned integer.
    #[error("Invalid id '{value}' on {target}")]
    InvalidId {
        /// `service Foo` or `method Foo.bar`.
        target: String,
        value: String,
    },

    /// An unpinned entry follows an id of `u32::MAX`.
    #[error("No id left for {target}: the preceding id is {}", u32::MAX)]
    IdOverflow {
        /// `service Foo` or `method Foo.bar`.
        target: String,
    },

    /// Two services resolved to the same id.
    #[error("Services '{first}' and '{second}' share id {id}")]
    DuplicateServiceId {
        id: u32,
        first: String,
        second: String,
    },

    /// Two methods of one service resolved to the same id.
    #[error("Methods '{first}' and '{second}' of service '{service}' share id {id}")]
    DuplicateMethodId {
        service: String,
        id: u32,
        first: String,
        second: String,
    },

    /// Failed to read the schema file
    #[error("Failed to read schema file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),
}

impl GeneratorError {
    /// Process exit code for this error.
    ///
    /// A missing `--service` target exits with `2`; every other failure
    /// exits with `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ServiceNotFound { .. } => 2,
            _ => 1,
        }
    }
}

impl From<std::fmt::Error> for GeneratorError {
    fn from(err: std::fmt::Error) -> Self {
        Self::CodeGenError(err.to_string())
    }
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_not_found_exits_with_two() {
        let err = GeneratorError::ServiceNotFound {
            name: "Missing".to_string(),
            available: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "Service 'Missing' not found in schema (available: A, B)"
        );
    }

    #[test]
    fn service_not_found_without_services() {
        let err = GeneratorError::ServiceNotFound {
            name: "RPC".to_string(),
            available: vec![],
        };
        assert!(err.to_string().ends_with("(available: none)"));
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = GeneratorError::UnresolvedType {
            service: "Test".to_string(),
            method: "test".to_string(),
            type_name: "Missing".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Unknown type 'Missing' used by Test.test");

        let err = GeneratorError::CodeGenError("boom".to_string());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn parse_errors_convert() {
        let err: GeneratorError = ParseError::UnexpectedEof {
            expected: "'}'".to_string(),
        }
        .into();
        assert!(matches!(err, GeneratorError::Parse(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
