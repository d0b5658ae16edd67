//! Message, field and enum types.
//!
//! These types are opaque to the compiler core: it only ever asks whether a
//! message of a given name exists. They are kept complete so that the schema
//! can be inspected and tested independently.

use std::str::FromStr;

use strum::{Display, EnumString};

/// Qualifier written in front of a message field.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use hrpc_define::FieldLabel;
///
/// assert_eq!(FieldLabel::from_str("required").unwrap(), FieldLabel::Required);
/// assert_eq!(FieldLabel::Repeated.to_string(), "repeated");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FieldLabel {
    /// `required` - must be present on the wire (proto2).
    Required,
    /// `optional` - may be absent.
    Optional,
    /// `repeated` - zero or more values.
    Repeated,
    /// No qualifier (proto3 singular field).
    Singular,
}

impl FieldLabel {
    /// Parses a label keyword, returning `None` for anything else.
    ///
    /// `singular` is not a keyword: it is the label of an unqualified field.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::from_str(word)
            .ok()
            .filter(|label| *label != Self::Singular)
    }
}

/// Ordered `option` assignments.
///
/// Keys are stored without the parentheses used for custom options, so
/// `option (hrpc.service) = 2;` is stored under `hrpc.service`. When a key is
/// assigned more than once the last assignment wins.
///
/// ## Examples
///
/// ```
/// use hrpc_define::Options;
///
/// let mut options = Options::default();
/// options.insert("id", "3");
/// options.insert("id", "5");
/// assert_eq!(options.get("id"), Some("5"));
/// assert_eq!(options.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    entries: Vec<(String, String)>,
}

impl Options {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Returns the value most recently assigned to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A single field of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Scalar type, message reference, or `map<K,V>` as written.
    pub type_name: String,
    pub tag: u32,
    pub label: FieldLabel,
    /// Bracketed field options, e.g. `[packed = true]`.
    pub options: Options,
}

/// A `message` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageType {
    pub name: String,
    pub fields: Vec<Field>,
    /// Messages declared inside this one, addressable as `Outer.Inner`.
    pub messages: Vec<MessageType>,
    pub enums: Vec<EnumType>,
    pub options: Options,
}

impl MessageType {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One constant of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: i32,
}

/// An `enum` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<EnumValue>,
    pub options: Options,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_label_parses_keywords() {
        assert_eq!(FieldLabel::from_keyword("required"), Some(FieldLabel::Required));
        assert_eq!(FieldLabel::from_keyword("optional"), Some(FieldLabel::Optional));
        assert_eq!(FieldLabel::from_keyword("repeated"), Some(FieldLabel::Repeated));
    }

    #[test]
    fn field_label_rejects_non_keywords() {
        assert_eq!(FieldLabel::from_keyword("singular"), None);
        assert_eq!(FieldLabel::from_keyword("Required"), None);
        assert_eq!(FieldLabel::from_keyword("string"), None);
    }

    #[test]
    fn options_keep_declaration_order() {
        let mut options = Options::default();
        options.insert("a", "1");
        options.insert("b", "2");

        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn message_field_lookup() {
        let message = MessageType {
            name: "Point".to_string(),
            fields: vec![Field {
                name: "x".to_string(),
                type_name: "int32".to_string(),
                tag: 1,
                label: FieldLabel::Optional,
                options: Options::default(),
            }],
            ..MessageType::default()
        };

        assert_eq!(message.field("x").map(|f| f.tag), Some(1));
        assert!(message.field("y").is_none());
    }
}
