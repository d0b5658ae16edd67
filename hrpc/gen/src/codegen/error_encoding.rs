//! The `errorEncoding` codec.
//!
//! Encoding delegates to the `RPCError` message codec. Decoding turns the
//! frame back into an `Error` with `code`, `errno` and `details` attached, and
//! mirrors the consumed byte count onto `errorEncoding.decode.bytes` as the
//! runtime's codec protocol expects.

use std::fmt;

use super::CodeWriter;

pub fn write_error_encoding<W: fmt::Write>(w: &mut CodeWriter<W>) -> fmt::Result {
    w.block("const errorEncoding =", |w| {
        w.writeln("encode: messages.RPCError.encode,")?;
        w.writeln("encodingLength: messages.RPCError.encodingLength,")?;
        w.block("decode (buf, offset)", |w| {
            w.writeln("const { message, code, errno, details } = messages.RPCError.decode(buf, offset)")?;
            w.writeln("errorEncoding.decode.bytes = messages.RPCError.decode.bytes")?;
            w.writeln("const err = new Error(message)")?;
            w.writeln("err.code = code")?;
            w.writeln("err.errno = errno")?;
            w.writeln("err.details = details")?;
            w.writeln("return err")
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_error_codec() {
        let mut out = String::new();
        write_error_encoding(&mut CodeWriter::new(&mut out, "\n")).unwrap();

        let expected = "\
const errorEncoding = {
  encode: messages.RPCError.encode,
  encodingLength: messages.RPCError.encodingLength,
  decode (buf, offset) {
    const { message, code, errno, details } = messages.RPCError.decode(buf, offset)
    errorEncoding.decode.bytes = messages.RPCError.decode.bytes
    const err = new Error(message)
    err.code = code
    err.errno = errno
    err.details = details
    return err
  }
}
";
        assert_eq!(out, expected);
    }
}
