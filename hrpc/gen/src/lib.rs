//! hrpc compiler library.
//!
//! This crate compiles an hrpc schema (protobuf-style messages and services)
//! into a JavaScript RPC binding for the `hrpc-runtime` package. Two modules
//! are produced:
//!
//! - a codec module with one encoder/decoder per message
//! - a binding module exporting an `HRPCSession` class with one typed wrapper
//!   per service
//!
//! ## Pipeline
//!
//! ```text
//! schema text
//!   -> probe parse
//!   -> inject RPCError (text)        inject
//!   -> authoritative parse           hrpc_define::parse_schema
//!   -> ids, void types, names        model (ids, void, naming, validation)
//!   -> JavaScript                    codegen
//!   -> atomic writes                 output
//! ```
//!
//! ## Modules
//!
//! - [`inject`] - appends the standard `RPCError` message when missing
//! - [`ids`] - wire id allocation for services and methods
//! - [`void`] - recognizes payload-less request/response types
//! - [`naming`] - binding member names
//! - [`model`] - the annotated [`model::BindingModel`]
//! - [`validation`] - type resolution and id uniqueness checks
//! - [`codegen`] - JavaScript emission
//! - [`output`] - import paths, assembly and file writing
//! - [`options`] - [`options::GeneratorOptions`]
//! - [`errors`] - [`errors::GeneratorError`]
//!
//! ## Example Usage
//!
//! ```
//! use hrpc_gen::options::GeneratorOptions;
//! use hrpc_gen::output::generate;
//!
//! let schema = r#"
//!     message TestRequest { required string name = 1; }
//!     message TestResponse { optional string res = 1; }
//!     service Test {
//!         rpc test (TestRequest) returns (TestResponse);
//!         rpc boring (Void) returns (Void);
//!     }
//! "#;
//!
//! let modules = generate(schema, &GeneratorOptions::default()).unwrap();
//! assert!(modules.rpc.contains("class HRPCServiceTest {"));
//! assert!(modules.rpc.contains("    this.test = new HRPCServiceTest(rpc)"));
//! ```

pub mod codegen;
pub mod errors;
pub mod ids;
pub mod inject;
pub mod model;
pub mod naming;
pub mod options;
pub mod output;
pub mod validation;
pub mod void;

#[cfg(test)]
pub(crate) mod test_utils;

use std::borrow::Cow;

use hrpc_define::{Schema, parse_schema};
use tracing::{debug, info, instrument};

use crate::errors::GeneratorError;
use crate::ids::IdAllocator;
use crate::inject::inject_error_type;
use crate::model::{BindingModel, build_model};
use crate::options::GeneratorOptions;

/// The result of compiling one schema.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Final schema text, `RPCError` included.
    pub schema_source: String,
    /// Parse of `schema_source`.
    pub schema: Schema,
    pub model: BindingModel,
    /// Service-scope allocator after the last service.
    pub service_ids: IdAllocator,
}

/// Compiles schema text into a [`Compilation`].
///
/// The text is parsed once to see whether it declares `RPCError`. If the
/// standard definition has to be appended, the extended text is parsed again
/// and that parse is the one everything downstream uses.
///
/// ## Errors
///
/// Parse failures, invalid or duplicate ids, unresolved types and an unknown
/// flattened service.
#[instrument(skip_all, fields(bytes = source.len()))]
pub fn compile(source: &str, options: &GeneratorOptions) -> Result<Compilation, GeneratorError> {
    let probe = parse_schema(source)?;

    let (schema_source, schema) = match inject_error_type(source, &probe) {
        Cow::Borrowed(unchanged) => (unchanged.to_string(), probe),
        Cow::Owned(extended) => {
            debug!("re-parsing schema with injected error type");
            let schema = parse_schema(&extended)?;
            (extended, schema)
        }
    };

    let (model, service_ids) = build_model(&schema, &options.layout)?;
    info!(
        services = model.services.len(),
        methods = model.services.iter().map(|s| s.methods.len()).sum::<usize>(),
        "compiled schema"
    );

    Ok(Compilation {
        schema_source,
        schema,
        model,
        service_ids,
    })
}
