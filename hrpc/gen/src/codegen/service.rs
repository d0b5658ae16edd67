//! Service wrapper classes.
//!
//! Each service becomes a class that registers its method slots with the
//! runtime and exposes `<method>` / `<method>NoReply` calls plus an
//! `onRequest` hook for installing handlers.

use std::fmt;

use super::CodeWriter;
use crate::cw_writeln;
use crate::model::{MethodSlot, ServiceBinding};

/// Renders `class HRPCService<Name> { ... }`.
pub fn write_service_class<W: fmt::Write>(w: &mut CodeWriter<W>, service: &ServiceBinding) -> fmt::Result {
    w.block(&format!("class {}", service.class_name), |w| {
        w.block("constructor (rpc)", |w| {
            cw_writeln!(w, "const service = rpc.defineService({{ id: {} }})", service.id)?;
            for method in &service.methods {
                w.blank_line()?;
                write_method_slot(w, method)?;
            }
            Ok(())
        })?;

        w.blank_line()?;
        w.block("onRequest (handlers, context = handlers)", |w| {
            for method in &service.methods {
                let name = &method.binding_name;
                cw_writeln!(
                    w,
                    "if (handlers.{name}) this._{name}.onrequest = handlers.{name}.bind(context)"
                )?;
            }
            Ok(())
        })?;

        for method in &service.methods {
            let slot = format!("this._{}", method.binding_name);
            w.blank_line()?;
            write_calls(w, method, &format!("{slot}.request"), &format!("{slot}.requestNoReply"))?;
        }
        Ok(())
    })
}

fn write_method_slot<W: fmt::Write>(w: &mut CodeWriter<W>, method: &MethodSlot) -> fmt::Result {
    cw_writeln!(w, "this._{} = service.defineMethod({{", method.binding_name)?;
    {
        let _indent = w.indent();
        cw_writeln!(w, "id: {},", method.id)?;
        cw_writeln!(w, "requestEncoding: {},", method.request.encoding())?;
        cw_writeln!(w, "responseEncoding: {}", method.response.encoding())?;
    }
    w.writeln("})")
}

/// Renders the request and no-reply calls for `method`, forwarding to
/// `request` and `no_reply`.
///
/// Void requests take no argument.
pub(crate) fn write_calls<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    method: &MethodSlot,
    request: &str,
    no_reply: &str,
) -> fmt::Result {
    let arg = if method.request.is_void() { "" } else { "data" };
    let name = &method.binding_name;

    w.block(&format!("{name} ({arg})"), |w| cw_writeln!(w, "return {request}({arg})"))?;
    w.blank_line()?;
    w.block(&format!("{name}NoReply ({arg})"), |w| cw_writeln!(w, "return {no_reply}({arg})"))
}
