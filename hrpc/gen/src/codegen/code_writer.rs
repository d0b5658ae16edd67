//! Indentation-tracking writer for the generated JavaScript.
//!
//! Indentation is held in an `Rc<Cell<usize>>`, so an [`IndentGuard`] can be
//! alive while the writer is borrowed mutably for output.
//!
//! ```
//! use hrpc_gen::codegen::code_writer::CodeWriter;
//!
//! let mut out = String::new();
//! let mut w = CodeWriter::new(&mut out, "\n");
//! w.block("class Foo", |w| {
//!     w.block("bar ()", |w| w.writeln("return 1"))
//! }).unwrap();
//!
//! assert_eq!(out, "class Foo {\n  bar () {\n    return 1\n  }\n}\n");
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Two spaces, as in `standard` JavaScript style.
const INDENT: &str = "  ";

pub struct CodeWriter<W> {
    writer: W,
    indent_level: Rc<Cell<usize>>,
    newline: &'static str,
    at_line_start: bool,
}

impl<W: fmt::Write> CodeWriter<W> {
    /// Creates a writer that terminates lines with `newline`.
    pub fn new(writer: W, newline: &'static str) -> Self {
        Self {
            writer,
            indent_level: Rc::new(Cell::new(0)),
            newline,
            at_line_start: true,
        }
    }

    /// Writes text without a line terminator. Indents if at line start.
    pub fn write(&mut self, text: &str) -> fmt::Result {
        if text.is_empty() {
            return Ok(());
        }

        if self.at_line_start {
            for _ in 0..self.indent_level.get() {
                self.writer.write_str(INDENT)?;
            }
            self.at_line_start = false;
        }

        self.writer.write_str(text)
    }

    /// Writes text followed by the line terminator.
    pub fn writeln(&mut self, text: &str) -> fmt::Result {
        self.write(text)?;
        self.end_line()
    }

    /// Writes an empty line. Never indented.
    pub fn blank_line(&mut self) -> fmt::Result {
        self.end_line()
    }

    fn end_line(&mut self) -> fmt::Result {
        self.writer.write_str(self.newline)?;
        self.at_line_start = true;
        Ok(())
    }

    /// Increases indentation until the returned guard is dropped.
    pub fn indent(&mut self) -> IndentGuard {
        self.indent_level.set(self.indent_level.get() + 1);
        IndentGuard {
            indent_level: Rc::clone(&self.indent_level),
        }
    }

    /// Writes `header {`, the indented body, and `}`.
    pub fn block<F>(&mut self, header: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.writeln(&format!("{} {{", header))?;
        {
            let _indent = self.indent();
            body(self)?;
        }
        self.writeln("}")
    }

    #[doc(hidden)]
    pub fn writeln_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        let formatted = format!("{}", args);
        self.writeln(&formatted)
    }
}

/// Restores the previous indentation level when dropped.
pub struct IndentGuard {
    indent_level: Rc<Cell<usize>>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        let current = self.indent_level.get();
        self.indent_level.set(current.saturating_sub(1));
    }
}

/// Writes a formatted line to a [`CodeWriter`].
#[macro_export]
macro_rules! cw_writeln {
    ($writer:expr, $($arg:tt)*) => {
        $writer.writeln_fmt(format_args!($($arg)*))
    };
}
