//! The top-level schema value.
//!
//! A [`Schema`] is everything declared in one schema file, in declaration
//! order. Declaration order matters: it drives id allocation in the compiler.

use crate::service::ServiceDefinition;
use crate::types::{EnumType, MessageType, Options};

/// A parsed schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// `2` or `3` when a `syntax` statement is present.
    pub syntax: Option<u32>,
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub options: Options,
    pub messages: Vec<MessageType>,
    pub enums: Vec<EnumType>,
    pub services: Vec<ServiceDefinition>,
}

impl Schema {
    /// Resolves a message reference.
    ///
    /// Accepts top-level names, dotted paths into nested messages
    /// (`Outer.Inner`), a leading `.`, and a leading package qualifier.
    ///
    /// ## Examples
    ///
    /// ```
    /// use hrpc_define::parse_schema;
    ///
    /// let schema = parse_schema(r#"
    ///     package demo;
    ///     message Outer { message Inner {} }
    /// "#).unwrap();
    ///
    /// assert!(schema.message("Outer").is_some());
    /// assert!(schema.message("Outer.Inner").is_some());
    /// assert!(schema.message("demo.Outer.Inner").is_some());
    /// assert!(schema.message(".demo.Outer").is_some());
    /// assert!(schema.message("Inner").is_none());
    /// ```
    pub fn message(&self, name: &str) -> Option<&MessageType> {
        let path = self.local_path(name)?;
        self.find_path(path)
    }

    /// Returns the package-relative path `name` resolves to.
    ///
    /// ```
    /// use hrpc_define::parse_schema;
    ///
    /// let schema = parse_schema("package demo; message Outer { message Inner {} }").unwrap();
    /// assert_eq!(schema.local_path(".demo.Outer.Inner"), Some("Outer.Inner"));
    /// assert_eq!(schema.local_path("Outer"), Some("Outer"));
    /// assert_eq!(schema.local_path("demo.Missing"), None);
    /// ```
    pub fn local_path<'a>(&self, name: &'a str) -> Option<&'a str> {
        let name = name.strip_prefix('.').unwrap_or(name);

        if self.find_path(name).is_some() {
            return Some(name);
        }

        let package = self.package.as_deref()?;
        let rest = name.strip_prefix(package)?.strip_prefix('.')?;
        self.find_path(rest).map(|_| rest)
    }

    /// Returns `true` if `name` resolves to a declared message.
    pub fn has_message(&self, name: &str) -> bool {
        self.message(name).is_some()
    }

    /// Names of the top-level messages, in declaration order.
    pub fn message_names(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.name.as_str())
    }

    pub fn service(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|s| s.name == name)
    }

    fn find_path(&self, path: &str) -> Option<&MessageType> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.messages.iter().find(|m| m.name == first)?;

        for segment in segments {
            current = current.messages.iter().find(|m| m.name == segment)?;
        }

        Some(current)
    }
}
