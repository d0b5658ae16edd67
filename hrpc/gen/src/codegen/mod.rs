//! JavaScript emission.
//!
//! Each submodule renders one part of the output into a shared
//! [`CodeWriter`]:
//!
//! - [`error_encoding`] - the `errorEncoding` codec for `RPCError` frames
//! - [`service`] - one `HRPCService<Name>` wrapper class per service
//! - [`session`] - the exported `HRPCSession` class and `isStreamError`
//! - [`messages`] - the codec module the binding requires
//!
//! [`render_binding`] stitches the first three into the binding module.

pub mod code_writer;
pub mod error_encoding;
pub mod messages;
pub mod service;
pub mod session;

pub use code_writer::{CodeWriter, IndentGuard};
pub use error_encoding::write_error_encoding;
pub use messages::{CodecGenerator, RuntimeCodec};
pub use service::write_service_class;
pub use session::{write_is_stream_error, write_session_class};

use tracing::debug;

use crate::cw_writeln;
use crate::errors::GeneratorError;
use crate::model::{BindingModel, SessionShape};
use crate::options::GeneratorOptions;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// This file was generated by hrpc-gen. Do not edit.";

/// Renders the binding module.
///
/// `import_path` is the specifier the binding uses to require the codec
/// module (see [`crate::output::import_path`]).
///
/// ## Errors
///
/// Returns [`GeneratorError::CodeGenError`] if formatting fails.
pub fn render_binding(
    model: &BindingModel,
    import_path: &str,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let mut out = String::new();
    let mut w = CodeWriter::new(&mut out, options.line_ending.as_str());

    w.writeln(GENERATED_HEADER)?;
    w.blank_line()?;
    cw_writeln!(w, "const messages = require({})", js_string(import_path))?;
    cw_writeln!(w, "const HRPC = require({})", js_string(&options.runtime))?;
    cw_writeln!(w, "const RPC = require({})", js_string(&format!("{}/rpc", options.runtime)))?;
    w.blank_line()?;

    write_error_encoding(&mut w)?;

    let classes: Vec<_> = match &model.session {
        SessionShape::PerService => model.services.iter().collect(),
        SessionShape::Flattened { service } => model.service(service).into_iter().collect(),
    };
    for service in classes {
        w.blank_line()?;
        write_service_class(&mut w, service)?;
    }

    w.blank_line()?;
    write_session_class(&mut w, model)?;
    w.blank_line()?;
    write_is_stream_error(&mut w)?;

    debug!(bytes = out.len(), "rendered binding module");
    Ok(out)
}

/// Quotes `value` as a single-quoted JavaScript string literal.
///
/// ```
/// use hrpc_gen::codegen::js_string;
///
/// assert_eq!(js_string("./rpc-messages"), "'./rpc-messages'");
/// assert_eq!(js_string("it's"), r"'it\'s'");
/// ```
pub fn js_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}
