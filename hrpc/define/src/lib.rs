//! hrpc Definition Library
//!
//! This crate provides the schema model consumed by the `hrpc-gen` compiler,
//! together with a parser for the protobuf-style schema text that describes it.
//!
//! ## Core Types
//!
//! - [`Schema`] - A complete parsed schema: messages, enums and services
//! - [`MessageType`] - A `message` block with its fields and nested types
//! - [`Field`] / [`FieldLabel`] - Message fields and their qualifiers
//! - [`EnumType`] - An `enum` block
//! - [`ServiceDefinition`] - A `service` block with its methods
//! - [`MethodDefinition`] - A single `rpc` declaration
//! - [`Options`] - Ordered `option` key/value pairs
//!
//! ## Examples
//!
//! ```
//! use hrpc_define::parse_schema;
//!
//! let schema = parse_schema(r#"
//!     message Ping { required string body = 1; }
//!
//!     service Health {
//!         option id = 4;
//!         rpc Check (Ping) returns (Ping);
//!     }
//! "#).unwrap();
//!
//! assert!(schema.has_message("Ping"));
//! assert_eq!(schema.services[0].name, "Health");
//! assert_eq!(schema.services[0].options.get("id"), Some("4"));
//! ```
//!
//! The grammar is a lax subset of the protobuf language: everything the
//! compiler needs is kept, everything else (`reserved`, `extensions`,
//! `extend` blocks) is accepted and skipped.

pub mod errors;
pub mod parser;
pub mod schema;
pub mod service;
pub mod types;

pub use errors::ParseError;
pub use parser::parse_schema;
pub use schema::Schema;
pub use service::{MethodDefinition, ServiceDefinition};
pub use types::{EnumType, EnumValue, Field, FieldLabel, MessageType, Options};
