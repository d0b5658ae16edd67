//! Output assembly and file writing.
//!
//! A compilation produces two files:
//!
//! ```text
//! rpc-messages.js   # codec module (one codec per message)
//! rpc.js            # binding module, requires the codec module
//! ```
//!
//! Both are rendered in memory first. Nothing touches the disk unless both
//! rendered, and each file is replaced atomically (temp file in the target
//! directory, then rename), so a failed run never leaves a half-written
//! binding behind.

use std::fs;
use std::io::Write;
use std::path::{Component, Path};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::codegen::{CodecGenerator, RuntimeCodec, render_binding};
use crate::compile;
use crate::errors::GeneratorError;
use crate::options::GeneratorOptions;

/// The two rendered modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModules {
    /// Codec module, written to `options.messages_path`.
    pub messages: String,
    /// Binding module, written to `options.rpc_path`.
    pub rpc: String,
}

/// Reads a schema file.
///
/// ## Errors
///
/// Returns [`GeneratorError::ReadError`] if the file cannot be read as UTF-8.
pub fn read_schema(path: &Path) -> Result<String, GeneratorError> {
    fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Compiles `source` and renders both modules with the given codec generator.
///
/// ## Errors
///
/// Any compile error (see [`compile`]) or rendering failure.
#[instrument(skip_all, fields(rpc = %options.rpc_path.display(), messages = %options.messages_path.display()))]
pub fn generate_with(
    source: &str,
    options: &GeneratorOptions,
    codec: &dyn CodecGenerator,
) -> Result<GeneratedModules, GeneratorError> {
    let compiled = compile(source, options)?;

    let import = import_path(&options.rpc_path, &options.messages_path);
    debug!(import = %import, "resolved codec import path");

    let messages = codec.generate(&compiled.schema_source, options)?;
    let rpc = render_binding(&compiled.model, &import, options)?;

    Ok(GeneratedModules { messages, rpc })
}

/// Compiles `source` and renders both modules with [`RuntimeCodec`].
pub fn generate(source: &str, options: &GeneratorOptions) -> Result<GeneratedModules, GeneratorError> {
    generate_with(source, options, &RuntimeCodec)
}

/// Writes both modules, codec module first.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] if either file cannot be written.
pub fn write_modules(modules: &GeneratedModules, options: &GeneratorOptions) -> Result<(), GeneratorError> {
    write_atomic(&options.messages_path, &modules.messages)?;
    write_atomic(&options.rpc_path, &modules.rpc)?;
    info!(
        rpc = %options.rpc_path.display(),
        messages = %options.messages_path.display(),
        "wrote binding"
    );
    Ok(())
}

/// Compiles, renders and writes (or prints, when `dry_run` is set).
///
/// This is the entry point used by the `hrpc` binary.
///
/// ## Examples
///
/// ```no_run
/// use hrpc_gen::options::GeneratorOptions;
/// use hrpc_gen::output::{generate_and_write, read_schema};
///
/// let source = read_schema("schema.proto".as_ref()).unwrap();
/// generate_and_write(&source, &GeneratorOptions::default(), false).unwrap();
/// ```
pub fn generate_and_write(
    source: &str,
    options: &GeneratorOptions,
    dry_run: bool,
) -> Result<GeneratedModules, GeneratorError> {
    let modules = generate(source, options)?;

    if dry_run {
        println!("=== {} ===\n{}", options.messages_path.display(), modules.messages);
        println!("=== {} ===\n{}", options.rpc_path.display(), modules.rpc);
    } else {
        write_modules(&modules, options)?;
    }

    Ok(modules)
}

/// Writes `content` to `path` atomically, creating parent directories.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] naming the path that failed.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    let write_error = |path: &Path, source: std::io::Error| GeneratorError::WriteError {
        path: path.display().to_string(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;

    debug!(path = %path.display(), "writing to temporary file");
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| write_error(parent, e))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| write_error(temp_file.path(), e))?;

    temp_file
        .persist(path)
        .map_err(|e| write_error(path, e.error))?;

    Ok(())
}

/// Module specifier the binding at `rpc` uses to require the codec module at
/// `messages`.
///
/// Relative inputs are taken relative to the current directory. The result
/// always uses `/`, drops a trailing `.js` and starts with `./` or `../`.
///
/// ## Examples
///
/// ```
/// use std::path::Path;
/// use hrpc_gen::output::import_path;
///
/// assert_eq!(import_path(Path::new("rpc.js"), Path::new("rpc-messages.js")), "./rpc-messages");
/// assert_eq!(import_path(Path::new("lib/rpc.js"), Path::new("gen/messages.js")), "../gen/messages");
/// ```
pub fn import_path(rpc: &Path, messages: &Path) -> String {
    let base = std::env::current_dir().unwrap_or_default();
    import_path_from(&base, rpc, messages)
}

/// [`import_path`] with an explicit base directory for relative inputs.
pub fn import_path_from(base: &Path, rpc: &Path, messages: &Path) -> String {
    let rpc_dir = normalize(&base.join(rpc));
    let rpc_dir = &rpc_dir[..rpc_dir.len().saturating_sub(1)];
    let target = normalize(&base.join(messages));

    let relative = match relative_components(rpc_dir, &target) {
        Some(parts) => parts.join("/"),
        // No common root (different drives): fall back to the target itself.
        None => target.join("/"),
    };

    let relative = relative.replace('\\', "/");
    let relative = relative.strip_suffix(".js").unwrap_or(&relative);

    if relative.starts_with("./") || relative.starts_with("../") {
        relative.to_string()
    } else {
        format!("./{}", relative)
    }
}

/// Lexically normalized path components, as strings.
///
/// The root (and any drive prefix) is kept as the first component so paths
/// on different roots never share a prefix.
fn normalize(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut rooted = 0;

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                parts.push(prefix.as_os_str().to_string_lossy().into_owned());
                rooted = parts.len();
            }
            Component::RootDir => {
                parts.push(String::new());
                rooted = parts.len();
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.len() > rooted && parts.last().is_some_and(|p| p != "..") {
                    parts.pop();
                } else if rooted == 0 {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }

    parts
}

fn relative_components(from: &[String], to: &[String]) -> Option<Vec<String>> {
    let common = from.iter().zip(to).take_while(|(a, b)| a == b).count();

    let from_rooted = from.first().is_some_and(|p| p.is_empty() || p.ends_with(':'));
    let to_rooted = to.first().is_some_and(|p| p.is_empty() || p.ends_with(':'));
    if (from_rooted || to_rooted) && common == 0 {
        return None;
    }

    let mut parts: Vec<String> = from[common..].iter().map(|_| "..".to_string()).collect();
    parts.extend(to[common..].iter().cloned());
    Some(parts)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::TEST_SCHEMA;

    fn rel(rpc: &str, messages: &str) -> String {
        import_path_from(Path::new("/work/project"), Path::new(rpc), Path::new(messages))
    }

    #[test]
    fn import_path_defaults() {
        assert_eq!(rel("rpc.js", "rpc-messages.js"), "./rpc-messages");
    }

    #[test]
    fn import_path_subdirectories() {
        assert_eq!(rel("out/rpc.js", "out/msgs/m.js"), "./msgs/m");
        assert_eq!(rel("a/b/rpc.js", "c/m.js"), "../../c/m");
        assert_eq!(rel("lib/rpc.js", "messages.js"), "../messages");
    }

    #[test]
    fn import_path_normalizes_dots() {
        assert_eq!(rel("./lib/../rpc.js", "./x/./m.js"), "./x/m");
        assert_eq!(rel("rpc.js", "../shared/m.js"), "../shared/m");
    }

    #[test]
    fn import_path_mixes_absolute_and_relative() {
        assert_eq!(rel("/work/project/lib/rpc.js", "gen/m.js"), "../gen/m");
        assert_eq!(rel("rpc.js", "/work/other/m.js"), "../other/m");
    }

    #[test]
    fn import_path_only_strips_js() {
        assert_eq!(rel("rpc.js", "messages.cjs"), "./messages.cjs");
        assert_eq!(rel("rpc.js", "messages"), "./messages");
        assert_eq!(rel("rpc.js", "messages.js.js"), "./messages.js");
    }

    #[test]
    fn import_path_prefixes_hidden_files() {
        assert_eq!(rel("rpc.js", ".messages.js"), "./.messages");
    }

    #[test]
    fn normalize_clamps_at_root() {
        assert_eq!(normalize(Path::new("/../a")), vec!["", "a"]);
        assert_eq!(normalize(Path::new("../a")), vec!["..", "a"]);
        assert_eq!(normalize(Path::new("a/../../b")), vec!["..", "b"]);
    }

    #[test]
    fn write_atomic_creates_file_and_parents() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested/dir/rpc.js");

        write_atomic(&file_path, "hello").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "hello");
    }

    #[test]
    fn write_atomic_overwrites_and_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("rpc.js");

        write_atomic(&file_path, "first").unwrap();
        write_atomic(&file_path, "second").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "second");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_atomic_reports_path_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = write_atomic(&blocker.join("rpc.js"), "content").unwrap_err();
        assert!(matches!(err, GeneratorError::WriteError { .. }));
    }

    #[test]
    fn generate_renders_both_modules() {
        let modules = generate(TEST_SCHEMA, &GeneratorOptions::default()).unwrap();
        assert!(modules.messages.contains("message RPCError"));
        assert!(modules.rpc.contains("const messages = require('./rpc-messages')"));
    }

    #[test]
    fn nothing_is_written_when_compilation_fails() {
        let temp_dir = TempDir::new().unwrap();
        let options = GeneratorOptions {
            rpc_path: temp_dir.path().join("rpc.js"),
            messages_path: temp_dir.path().join("rpc-messages.js"),
            ..GeneratorOptions::default()
        };

        let result = generate_and_write("service S { rpc m (Nope) returns (Void); }", &options, false);
        assert!(result.is_err());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn writes_both_modules() {
        let temp_dir = TempDir::new().unwrap();
        let options = GeneratorOptions {
            rpc_path: temp_dir.path().join("rpc.js"),
            messages_path: temp_dir.path().join("lib/messages.js"),
            ..GeneratorOptions::default()
        };

        let modules = generate_and_write(TEST_SCHEMA, &options, false).unwrap();

        assert_eq!(fs::read_to_string(&options.rpc_path).unwrap(), modules.rpc);
        assert_eq!(fs::read_to_string(&options.messages_path).unwrap(), modules.messages);
        assert!(modules.rpc.contains("require('./lib/messages')"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let options = GeneratorOptions {
            rpc_path: temp_dir.path().join("rpc.js"),
            messages_path: temp_dir.path().join("rpc-messages.js"),
            ..GeneratorOptions::default()
        };

        generate_and_write(TEST_SCHEMA, &options, true).unwrap();
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
