//! The exported session class.
//!
//! The session owns the raw socket, pipes it through the runtime's RPC
//! stream and exposes the services. Errors raised by the RPC stream are
//! re-emitted unless they only echo a socket error or a stream teardown,
//! and even those are re-emitted once someone listens for `error`.

use std::fmt;

use super::CodeWriter;
use super::service::write_calls;
use crate::cw_writeln;
use crate::model::{BindingModel, SessionShape};

/// Default `maxSize` of a per-service session, in bytes (2 GiB).
pub const DEFAULT_MAX_SIZE: &str = "2 * 1024 * 1024 * 1024";

/// Messages the stream layer uses when a peer hangs up mid-frame.
pub const STREAM_TEARDOWN_MESSAGES: [&str; 2] = [
    "Writable stream closed prematurely",
    "Readable stream closed prematurely",
];

/// Private session field holding the promoted service in flattened mode.
const FLATTENED_FIELD: &str = "_service";

pub fn write_session_class<W: fmt::Write>(w: &mut CodeWriter<W>, model: &BindingModel) -> fmt::Result {
    let flattened = match &model.session {
        SessionShape::PerService => None,
        SessionShape::Flattened { service } => model.service(service),
    };

    w.block("module.exports = class HRPCSession extends HRPC", |w| {
        let constructor = match flattened {
            Some(_) => "constructor (rawSocket)".to_string(),
            None => format!("constructor (rawSocket, {{ maxSize = {} }} = {{}})", DEFAULT_MAX_SIZE),
        };

        w.block(&constructor, |w| {
            w.writeln("super()")?;
            w.blank_line()?;
            w.writeln("this.rawSocket = rawSocket")?;
            w.writeln("this.rawSocketError = null")?;
            w.writeln("rawSocket.on('error', (err) => {")?;
            {
                let _indent = w.indent();
                w.writeln("this.rawSocketError = err")?;
            }
            w.writeln("})")?;
            w.blank_line()?;

            match flattened {
                Some(_) => w.writeln("const rpc = new RPC({ errorEncoding })")?,
                None => w.writeln("const rpc = new RPC({ errorEncoding, maxSize })")?,
            }
            w.writeln("rpc.pipe(this.rawSocket).pipe(rpc)")?;
            w.writeln("rpc.on('close', () => this.emit('close'))")?;
            w.writeln("rpc.on('error', (err) => {")?;
            {
                let _indent = w.indent();
                w.writeln(
                    "if ((err !== this.rawSocketError && !isStreamError(err)) || this.listenerCount('error')) this.emit('error', err)",
                )?;
            }
            w.writeln("})")?;

            match flattened {
                Some(service) => {
                    w.blank_line()?;
                    cw_writeln!(w, "this.{} = new {}(rpc)", FLATTENED_FIELD, service.class_name)?;
                }
                None if !model.services.is_empty() => {
                    w.blank_line()?;
                    for service in &model.services {
                        cw_writeln!(w, "this.{} = new {}(rpc)", service.field_name, service.class_name)?;
                    }
                }
                None => {}
            }
            Ok(())
        })?;

        if let Some(service) = flattened {
            w.blank_line()?;
            w.block("onRequest (handlers, context = handlers)", |w| {
                cw_writeln!(w, "return this.{}.onRequest(handlers, context)", FLATTENED_FIELD)
            })?;

            for method in &service.methods {
                let target = format!("this.{}.{}", FLATTENED_FIELD, method.binding_name);
                w.blank_line()?;
                write_calls(w, method, &target, &format!("{target}NoReply"))?;
            }
        }

        w.blank_line()?;
        w.block("destroy (err)", |w| w.writeln("this.rawSocket.destroy(err)"))
    })
}

/// Renders the `isStreamError` helper used by the session's error filter.
pub fn write_is_stream_error<W: fmt::Write>(w: &mut CodeWriter<W>) -> fmt::Result {
    let checks: Vec<_> = STREAM_TEARDOWN_MESSAGES
        .iter()
        .map(|message| format!("err.message === '{}'", message))
        .collect();

    w.block("function isStreamError (err)", |w| {
        cw_writeln!(w, "return {}", checks.join(" || "))
    })
}
