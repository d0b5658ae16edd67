//! Generator configuration.
//!
//! [`GeneratorOptions`] carries everything the binary collects from the
//! command line. Its [`Default`] matches the CLI defaults, so library callers
//! and the `hrpc` binary produce identical output for identical input.

use std::path::PathBuf;

use clap::ValueEnum;

/// Default module specifier of the runtime package.
pub const DEFAULT_RUNTIME: &str = "hrpc-runtime";

/// Service name used when `--service` is given without a value.
pub const DEFAULT_FLATTENED_SERVICE: &str = "RPC";

/// How services are exposed on the generated session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionLayout {
    /// One session field per service (`session.files.stat()`).
    #[default]
    PerService,
    /// The named service's methods are promoted onto the session itself
    /// (`session.stat()`).
    Flattened { service: String },
}

/// Line terminator used when joining the generated binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
    /// The host platform's terminator.
    Native,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
            Self::Native => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

/// Options for a single compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Where the binding module is written.
    pub rpc_path: PathBuf,
    /// Where the codec module is written.
    pub messages_path: PathBuf,
    pub layout: SessionLayout,
    pub line_ending: LineEnding,
    /// Module specifier of the runtime package (`<runtime>`, `<runtime>/rpc`,
    /// `<runtime>/encodings`).
    pub runtime: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            rpc_path: PathBuf::from("rpc.js"),
            messages_path: PathBuf::from("rpc-messages.js"),
            layout: SessionLayout::default(),
            line_ending: LineEnding::default(),
            runtime: DEFAULT_RUNTIME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let options = GeneratorOptions::default();
        assert_eq!(options.rpc_path, PathBuf::from("rpc.js"));
        assert_eq!(options.messages_path, PathBuf::from("rpc-messages.js"));
        assert_eq!(options.layout, SessionLayout::PerService);
        assert_eq!(options.line_ending, LineEnding::Lf);
        assert_eq!(options.runtime, "hrpc-runtime");
    }

    #[test]
    fn line_endings() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::Crlf.as_str(), "\r\n");
        assert!(matches!(LineEnding::Native.as_str(), "\n" | "\r\n"));
    }

    #[test]
    fn line_ending_parses_from_cli_value() {
        assert_eq!(LineEnding::from_str("crlf", true), Ok(LineEnding::Crlf));
        assert!(LineEnding::from_str("cr", true).is_err());
    }
}
