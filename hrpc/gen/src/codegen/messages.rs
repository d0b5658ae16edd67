//! The codec module.
//!
//! The binding requires a module exposing one codec per message
//! (`messages.TestRequest.encode`, `.decode`, `.encodingLength`). How that
//! module is produced sits behind [`CodecGenerator`]; the default
//! [`RuntimeCodec`] compiles the schema at load time.

use tracing::debug;

use super::{CodeWriter, GENERATED_HEADER, js_string};
use crate::cw_writeln;
use crate::errors::GeneratorError;
use crate::options::GeneratorOptions;

/// Package that turns schema text into message codecs at load time.
pub const PROTOBUF_MODULE: &str = "protocol-buffers";

/// Produces the codec module for a compiled schema.
pub trait CodecGenerator {
    /// Renders the module.
    ///
    /// `schema_source` is the final schema text, with `RPCError` already
    /// present. Implementations must honor `options.line_ending` and
    /// `options.runtime`.
    fn generate(&self, schema_source: &str, options: &GeneratorOptions) -> Result<String, GeneratorError>;
}

/// Embeds the schema text and compiles it with `protocol-buffers`, using the
/// runtime's `encodings` for the wire scalars.
///
/// ```
/// use hrpc_gen::codegen::{CodecGenerator, RuntimeCodec};
/// use hrpc_gen::options::GeneratorOptions;
///
/// let module = RuntimeCodec
///     .generate("message Ping {}", &GeneratorOptions::default())
///     .unwrap();
/// assert!(module.contains("module.exports = protobuf(\"message Ping {}\", { encodings })"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeCodec;

impl CodecGenerator for RuntimeCodec {
    fn generate(&self, schema_source: &str, options: &GeneratorOptions) -> Result<String, GeneratorError> {
        let embedded = serde_json::to_string(schema_source)
            .map_err(|e| GeneratorError::CodeGenError(format!("failed to embed schema: {}", e)))?;

        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, options.line_ending.as_str());

        w.writeln(GENERATED_HEADER)?;
        w.blank_line()?;
        cw_writeln!(w, "const protobuf = require({})", js_string(PROTOBUF_MODULE))?;
        cw_writeln!(
            w,
            "const encodings = require({})",
            js_string(&format!("{}/encodings", options.runtime))
        )?;
        w.blank_line()?;
        cw_writeln!(w, "module.exports = protobuf({}, {{ encodings }})", embedded)?;

        debug!(bytes = out.len(), "rendered codec module");
        Ok(out)
    }
}
