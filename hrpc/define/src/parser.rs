//! Schema text parser.
//!
//! Parses the protobuf-style schema language into a [`Schema`]. The grammar
//! is deliberately lax: statements the compiler has no use for (`reserved`,
//! `extensions`, `extend`, `edition`) are accepted and skipped rather than
//! validated.
//!
//! ## Supported Declarations
//!
//! ```text
//! syntax = "proto2";
//! package demo.v1;
//! import "other.proto";
//! option some_option = true;
//!
//! message Name {
//!   required string a = 1;
//!   repeated Other b = 2 [packed = true];
//!   map<string, int32> c = 3;
//!   oneof choice { string d = 4; int32 e = 5; }
//!   message Nested { ... }
//!   enum Kind { ... }
//! }
//!
//! enum Kind { A = 0; B = 1; }
//!
//! service Name {
//!   option id = 1;
//!   rpc Method (Request) returns (Response);
//!   rpc Other (Void) returns (Void) { option id = 4; }
//! }
//! ```

use tracing::{debug, trace};

use crate::errors::ParseError;
use crate::schema::Schema;
use crate::service::{MethodDefinition, ServiceDefinition};
use crate::types::{EnumType, EnumValue, Field, FieldLabel, MessageType, Options};

/// Parses schema text into a [`Schema`].
///
/// ## Examples
///
/// ```
/// use hrpc_define::{parse_schema, FieldLabel};
///
/// let schema = parse_schema(r#"
///     syntax = "proto2";
///     message TestRequest { required string name = 1; }
///     message TestResponse { optional string res = 1; }
///     service Test {
///         rpc test (TestRequest) returns (TestResponse);
///         rpc boring (Void) returns (Void);
///     }
/// "#).unwrap();
///
/// assert_eq!(schema.syntax, Some(2));
/// assert_eq!(schema.messages[0].fields[0].label, FieldLabel::Required);
/// assert_eq!(schema.services[0].methods[1].input_type, "Void");
/// ```
///
/// ## Errors
///
/// Returns a [`ParseError`] pointing at the first token that does not fit
/// the grammar.
pub fn parse_schema(source: &str) -> Result<Schema, ParseError> {
    let tokens = tokenize(source)?;
    trace!(tokens = tokens.len(), "tokenized schema");

    let schema = Parser::new(tokens).parse_file()?;
    debug!(
        messages = schema.messages.len(),
        enums = schema.enums.len(),
        services = schema.services.len(),
        "parsed schema"
    );
    Ok(schema)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Number(String),
    Str(String),
    Symbol(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    line: usize,
    column: usize,
}

impl Token {
    fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(word) => format!("`{}`", word),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Symbol(c) => format!("'{}'", c),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;
    let mut column = 1;

    // Advances past `n` characters, keeping line/column in step.
    let advance = |i: &mut usize, line: &mut usize, column: &mut usize, n: usize| {
        for _ in 0..n {
            if chars.get(*i) == Some(&'\n') {
                *line += 1;
                *column = 1;
            } else {
                *column += 1;
            }
            *i += 1;
        }
    };

    while i < chars.len() {
        let c = chars[i];
        let (start_line, start_column) = (line, column);

        if c.is_whitespace() {
            advance(&mut i, &mut line, &mut column, 1);
            continue;
        }

        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                advance(&mut i, &mut line, &mut column, 1);
            }
            continue;
        }

        if c == '/' && chars.get(i + 1) == Some(&'*') {
            advance(&mut i, &mut line, &mut column, 2);
            loop {
                if i >= chars.len() {
                    return Err(ParseError::UnterminatedComment {
                        line: start_line,
                        column: start_column,
                    });
                }
                if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    advance(&mut i, &mut line, &mut column, 2);
                    break;
                }
                advance(&mut i, &mut line, &mut column, 1);
            }
            continue;
        }

        let starts_ident = c.is_alphabetic()
            || c == '_'
            || (c == '.' && chars.get(i + 1).is_some_and(|n| n.is_alphabetic() || *n == '_'));

        let kind = if starts_ident {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.')
            {
                advance(&mut i, &mut line, &mut column, 1);
            }
            TokenKind::Ident(chars[start..i].iter().collect())
        } else if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() {
                let d = chars[i];
                let exponent_sign = (d == '-' || d == '+')
                    && matches!(chars.get(i.wrapping_sub(1)), Some('e' | 'E'))
                    && !chars[start..i].iter().any(|x| *x == 'x' || *x == 'X');
                if d.is_ascii_alphanumeric() || d == '.' || exponent_sign {
                    advance(&mut i, &mut line, &mut column, 1);
                } else {
                    break;
                }
            }
            TokenKind::Number(chars[start..i].iter().collect())
        } else if c == '"' || c == '\'' {
            let quote = c;
            advance(&mut i, &mut line, &mut column, 1);
            let mut value = String::new();
            loop {
                let Some(&ch) = chars.get(i) else {
                    return Err(ParseError::UnterminatedString {
                        line: start_line,
                        column: start_column,
                    });
                };
                if ch == '\n' {
                    return Err(ParseError::UnterminatedString {
                        line: start_line,
                        column: start_column,
                    });
                }
                advance(&mut i, &mut line, &mut column, 1);
                if ch == quote {
                    break;
                }
                if ch == '\\' {
                    let Some(&escaped) = chars.get(i) else {
                        continue;
                    };
                    advance(&mut i, &mut line, &mut column, 1);
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                } else {
                    value.push(ch);
                }
            }
            TokenKind::Str(value)
        } else if "{}()[]<>;=,-+:".contains(c) {
            advance(&mut i, &mut line, &mut column, 1);
            TokenKind::Symbol(c)
        } else {
            return Err(ParseError::UnexpectedChar {
                found: c,
                line: start_line,
                column: start_column,
            });
        };

        tokens.push(Token {
            kind,
            line: start_line,
            column: start_column,
        });
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::Unexpected {
                expected: expected.to_string(),
                found: token.describe(),
                line: token.line,
                column: token.column,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn peek_is_symbol(&self, symbol: char) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Symbol(c), .. }) if *c == symbol)
    }

    fn peek_is_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Ident(w), .. }) if w == word)
    }

    fn eat_symbol(&mut self, symbol: char) -> bool {
        if self.peek_is_symbol(symbol) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), ParseError> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", symbol)))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Ident(word),
                ..
            }) => {
                let word = word.clone();
                self.pos += 1;
                Ok(word)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        if self.peek_is_word(word) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", word)))
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Str(value),
                ..
            }) => {
                let value = value.clone();
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn parse_file(mut self) -> Result<Schema, ParseError> {
        let mut schema = Schema::default();

        while let Some(token) = self.peek() {
            let word = match &token.kind {
                TokenKind::Symbol(';') => {
                    self.pos += 1;
                    continue;
                }
                TokenKind::Ident(word) => word.clone(),
                _ => return Err(self.unexpected("top-level declaration")),
            };

            match word.as_str() {
                "syntax" => {
                    self.pos += 1;
                    self.expect_symbol('=')?;
                    let value = self.expect_string("syntax string")?;
                    schema.syntax = match value.as_str() {
                        "proto2" => Some(2),
                        "proto3" => Some(3),
                        _ => None,
                    };
                    self.expect_symbol(';')?;
                }
                "edition" => {
                    self.pos += 1;
                    self.skip_statement()?;
                }
                "package" => {
                    self.pos += 1;
                    schema.package = Some(self.expect_ident("package name")?);
                    self.expect_symbol(';')?;
                }
                "import" => {
                    self.pos += 1;
                    if self.peek_is_word("public") || self.peek_is_word("weak") {
                        self.pos += 1;
                    }
                    schema.imports.push(self.expect_string("import path")?);
                    self.expect_symbol(';')?;
                }
                "option" => {
                    self.pos += 1;
                    self.parse_option_statement(&mut schema.options)?;
                }
                "message" => {
                    self.pos += 1;
                    let message = self.parse_message()?;
                    schema.messages.push(message);
                }
                "enum" => {
                    self.pos += 1;
                    let declared = self.parse_enum()?;
                    schema.enums.push(declared);
                }
                "service" => {
                    self.pos += 1;
                    let service = self.parse_service()?;
                    schema.services.push(service);
                }
                "extend" => {
                    self.pos += 1;
                    self.skip_block()?;
                }
                _ => return Err(self.unexpected("top-level declaration")),
            }
        }

        Ok(schema)
    }

    /// Parses `name = value ;` after the `option` keyword.
    fn parse_option_statement(&mut self, options: &mut Options) -> Result<(), ParseError> {
        let (key, value) = self.parse_option_assignment()?;
        self.expect_symbol(';')?;
        options.insert(key, value);
        Ok(())
    }

    fn parse_option_assignment(&mut self) -> Result<(String, String), ParseError> {
        let key = self.parse_option_name()?;
        self.expect_symbol('=')?;
        let value = self.parse_constant()?;
        Ok((key, value))
    }

    /// Option names are `ident`, `(full.ident)` or `(full.ident).suffix`.
    fn parse_option_name(&mut self) -> Result<String, ParseError> {
        let mut name = if self.eat_symbol('(') {
            let inner = self.expect_ident("option name")?;
            self.expect_symbol(')')?;
            inner.trim_start_matches('.').to_string()
        } else {
            self.expect_ident("option name")?
        };

        while let Some(Token {
            kind: TokenKind::Ident(suffix),
            ..
        }) = self.peek()
        {
            if !suffix.starts_with('.') {
                break;
            }
            name.push_str(suffix);
            self.pos += 1;
        }

        Ok(name)
    }

    fn parse_constant(&mut self) -> Result<String, ParseError> {
        let Some(token) = self.bump() else {
            return Err(self.unexpected("option value"));
        };

        match token.kind {
            TokenKind::Str(value) | TokenKind::Ident(value) | TokenKind::Number(value) => Ok(value),
            TokenKind::Symbol(sign @ ('-' | '+')) => match self.bump() {
                Some(Token {
                    kind: TokenKind::Number(n) | TokenKind::Ident(n),
                    ..
                }) => Ok(if sign == '-' { format!("-{}", n) } else { n }),
                _ => {
                    self.pos -= 1;
                    Err(self.unexpected("number"))
                }
            },
            TokenKind::Symbol('{') => {
                // Aggregate value: keep the raw token text.
                let mut depth = 1;
                let mut parts = Vec::new();
                while depth > 0 {
                    let Some(inner) = self.bump() else {
                        return Err(self.unexpected("'}'"));
                    };
                    match &inner.kind {
                        TokenKind::Symbol('{') => depth += 1,
                        TokenKind::Symbol('}') => depth -= 1,
                        _ => {}
                    }
                    if depth > 0 {
                        parts.push(match inner.kind {
                            TokenKind::Str(s) => format!("{:?}", s),
                            TokenKind::Ident(s) | TokenKind::Number(s) => s,
                            TokenKind::Symbol(c) => c.to_string(),
                        });
                    }
                }
                Ok(format!("{{{}}}", parts.join(" ")))
            }
            TokenKind::Symbol(_) => {
                self.pos -= 1;
                Err(self.unexpected("option value"))
            }
        }
    }

    /// Parses `[a = 1, (b) = "x"]` if present.
    fn parse_field_options(&mut self) -> Result<Options, ParseError> {
        let mut options = Options::default();
        if !self.eat_symbol('[') {
            return Ok(options);
        }

        loop {
            let (key, value) = self.parse_option_assignment()?;
            options.insert(key, value);
            if self.eat_symbol(']') {
                break;
            }
            self.expect_symbol(',')?;
        }

        Ok(options)
    }

    fn parse_message(&mut self) -> Result<MessageType, ParseError> {
        let name = self.expect_ident("message name")?;
        self.expect_symbol('{')?;

        let mut message = MessageType {
            name,
            ..MessageType::default()
        };

        loop {
            if self.eat_symbol('}') {
                break;
            }
            if self.eat_symbol(';') {
                continue;
            }

            let word = match self.peek() {
                Some(Token {
                    kind: TokenKind::Ident(word),
                    ..
                }) => word.clone(),
                _ => return Err(self.unexpected("field or '}'")),
            };

            match word.as_str() {
                "message" => {
                    self.pos += 1;
                    let nested = self.parse_message()?;
                    message.messages.push(nested);
                }
                "enum" => {
                    self.pos += 1;
                    let nested = self.parse_enum()?;
                    message.enums.push(nested);
                }
                "option" => {
                    self.pos += 1;
                    self.parse_option_statement(&mut message.options)?;
                }
                "oneof" => {
                    self.pos += 1;
                    self.parse_oneof(&mut message)?;
                }
                "reserved" | "extensions" => {
                    self.pos += 1;
                    self.skip_statement()?;
                }
                "extend" => {
                    self.pos += 1;
                    self.skip_block()?;
                }
                _ => {
                    let field = self.parse_field(None)?;
                    message.fields.push(field);
                }
            }
        }

        Ok(message)
    }

    fn parse_oneof(&mut self, message: &mut MessageType) -> Result<(), ParseError> {
        self.expect_ident("oneof name")?;
        self.expect_symbol('{')?;

        loop {
            if self.eat_symbol('}') {
                break;
            }
            if self.eat_symbol(';') {
                continue;
            }
            if self.peek_is_word("option") {
                self.pos += 1;
                self.parse_option_statement(&mut message.options)?;
                continue;
            }
            let field = self.parse_field(Some(FieldLabel::Optional))?;
            message.fields.push(field);
        }

        Ok(())
    }

    /// Parses `[label] type name = tag [options];`.
    fn parse_field(&mut self, forced_label: Option<FieldLabel>) -> Result<Field, ParseError> {
        let mut label = forced_label.unwrap_or(FieldLabel::Singular);

        if let Some(Token {
            kind: TokenKind::Ident(word),
            ..
        }) = self.peek()
            && let Some(keyword) = FieldLabel::from_keyword(word)
            && matches!(self.peek_at(1), Some(Token { kind: TokenKind::Ident(_), .. }))
        {
            label = keyword;
            self.pos += 1;
        }

        let type_name = self.parse_field_type()?;
        let name = self.expect_ident("field name")?;
        self.expect_symbol('=')?;
        let tag = self.parse_tag()?;
        let options = self.parse_field_options()?;
        self.expect_symbol(';')?;

        Ok(Field {
            name,
            type_name,
            tag,
            label,
            options,
        })
    }

    fn parse_field_type(&mut self) -> Result<String, ParseError> {
        let type_name = self.expect_ident("field type")?;
        if type_name != "map" || !self.peek_is_symbol('<') {
            return Ok(type_name);
        }

        self.expect_symbol('<')?;
        let key = self.expect_ident("map key type")?;
        self.expect_symbol(',')?;
        let value = self.expect_ident("map value type")?;
        self.expect_symbol('>')?;
        Ok(format!("map<{},{}>", key, value))
    }

    fn parse_tag(&mut self) -> Result<u32, ParseError> {
        match self.peek().cloned() {
            Some(Token {
                kind: TokenKind::Number(raw),
                line,
                column,
            }) => {
                self.pos += 1;
                parse_int(&raw)
                    .and_then(|n| u32::try_from(n).ok())
                    .filter(|n| *n > 0)
                    .ok_or(ParseError::InvalidTag {
                        value: raw,
                        line,
                        column,
                    })
            }
            _ => Err(self.unexpected("field tag")),
        }
    }

    fn parse_enum(&mut self) -> Result<EnumType, ParseError> {
        let name = self.expect_ident("enum name")?;
        self.expect_symbol('{')?;

        let mut declared = EnumType {
            name,
            ..EnumType::default()
        };

        loop {
            if self.eat_symbol('}') {
                break;
            }
            if self.eat_symbol(';') {
                continue;
            }
            if self.peek_is_word("option") {
                self.pos += 1;
                self.parse_option_statement(&mut declared.options)?;
                continue;
            }
            if self.peek_is_word("reserved") {
                self.pos += 1;
                self.skip_statement()?;
                continue;
            }

            let value_name = self.expect_ident("enum value name")?;
            self.expect_symbol('=')?;
            let negative = self.eat_symbol('-');
            let value = match self.peek() {
                Some(Token {
                    kind: TokenKind::Number(raw),
                    ..
                }) => parse_int(raw)
                    .map(|n| if negative { -n } else { n })
                    .and_then(|n| i32::try_from(n).ok()),
                _ => None,
            };
            let Some(value) = value else {
                return Err(self.unexpected("enum value"));
            };
            self.pos += 1;
            self.parse_field_options()?;
            self.expect_symbol(';')?;

            declared.values.push(EnumValue {
                name: value_name,
                value,
            });
        }

        Ok(declared)
    }

    fn parse_service(&mut self) -> Result<ServiceDefinition, ParseError> {
        let name = self.expect_ident("service name")?;
        self.expect_symbol('{')?;

        let mut service = ServiceDefinition {
            name,
            ..ServiceDefinition::default()
        };

        loop {
            if self.eat_symbol('}') {
                break;
            }
            if self.eat_symbol(';') {
                continue;
            }
            if self.peek_is_word("option") {
                self.pos += 1;
                self.parse_option_statement(&mut service.options)?;
                continue;
            }
            if self.peek_is_word("rpc") {
                self.pos += 1;
                let method = self.parse_rpc()?;
                service.methods.push(method);
                continue;
            }
            return Err(self.unexpected("`rpc`, `option` or '}'"));
        }

        Ok(service)
    }

    fn parse_rpc(&mut self) -> Result<MethodDefinition, ParseError> {
        let (line, column) = self.peek().map(|t| (t.line, t.column)).unwrap_or((0, 0));
        let name = self.expect_ident("rpc name")?;

        let input_type = self.parse_rpc_type(&name, line, column)?;
        self.expect_word("returns")?;
        let output_type = self.parse_rpc_type(&name, line, column)?;

        let mut options = Options::default();
        if self.eat_symbol('{') {
            loop {
                if self.eat_symbol('}') {
                    break;
                }
                if self.eat_symbol(';') {
                    continue;
                }
                self.expect_word("option")?;
                self.parse_option_statement(&mut options)?;
            }
            self.eat_symbol(';');
        } else {
            self.expect_symbol(';')?;
        }

        Ok(MethodDefinition {
            name,
            input_type,
            output_type,
            options,
        })
    }

    /// Parses `( [stream] Type )`.
    fn parse_rpc_type(&mut self, method: &str, line: usize, column: usize) -> Result<String, ParseError> {
        self.expect_symbol('(')?;
        if self.peek_is_word("stream")
            && matches!(self.peek_at(1), Some(Token { kind: TokenKind::Ident(_), .. }))
        {
            return Err(ParseError::StreamingUnsupported {
                method: method.to_string(),
                line,
                column,
            });
        }
        let type_name = self.expect_ident("message type")?;
        self.expect_symbol(')')?;
        Ok(type_name)
    }

    /// Skips tokens up to and including the next `;` outside of brackets.
    fn skip_statement(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            let Some(token) = self.bump() else {
                return Err(self.unexpected("';'"));
            };
            match token.kind {
                TokenKind::Symbol('[' | '{' | '(') => depth += 1,
                TokenKind::Symbol(']' | '}' | ')') => depth = depth.saturating_sub(1),
                TokenKind::Symbol(';') if depth == 0 => return Ok(()),
                _ => {}
            }
        }
    }

    /// Skips a `header { ... }` block, including nested braces.
    fn skip_block(&mut self) -> Result<(), ParseError> {
        while !self.peek_is_symbol('{') {
            if self.bump().is_none() {
                return Err(self.unexpected("'{'"));
            }
        }
        self.pos += 1;

        let mut depth = 1usize;
        while depth > 0 {
            let Some(token) = self.bump() else {
                return Err(self.unexpected("'}'"));
            };
            match token.kind {
                TokenKind::Symbol('{') => depth += 1,
                TokenKind::Symbol('}') => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        raw.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SCHEMA: &str = r#"
        message TestRequest {
          required string name = 1;
        }

        message TestResponse {
          optional string res = 1;
        }

        service Test {
          option id = 1;

          rpc test (TestRequest) returns (TestResponse) {
            option id = 1;
          }

          rpc boring (Void) returns (Void) {
            option id = 2;
          }
        }
    "#;

    #[test]
    fn parses_messages_and_services() {
        let schema = parse_schema(TEST_SCHEMA).unwrap();

        assert_eq!(
            schema.message_names().collect::<Vec<_>>(),
            vec!["TestRequest", "TestResponse"]
        );
        let request = schema.message("TestRequest").unwrap();
        assert_eq!(request.fields[0].name, "name");
        assert_eq!(request.fields[0].type_name, "string");
        assert_eq!(request.fields[0].tag, 1);
        assert_eq!(request.fields[0].label, FieldLabel::Required);

        let service = schema.service("Test").unwrap();
        assert_eq!(service.options.get("id"), Some("1"));
        assert_eq!(service.methods.len(), 2);
        assert_eq!(service.methods[0].input_type, "TestRequest");
        assert_eq!(service.methods[0].output_type, "TestResponse");
        assert_eq!(service.methods[1].options.get("id"), Some("2"));
    }

    #[test]
    fn parses_header_statements() {
        let schema = parse_schema(
            r#"
            syntax = "proto3";
            package acme.files;
            import public "common.proto";
            import "other.proto";
            option optimize_for = SPEED;
            "#,
        )
        .unwrap();

        assert_eq!(schema.syntax, Some(3));
        assert_eq!(schema.package.as_deref(), Some("acme.files"));
        assert_eq!(schema.imports, vec!["common.proto", "other.proto"]);
        assert_eq!(schema.options.get("optimize_for"), Some("SPEED"));
    }

    #[test]
    fn custom_option_names_drop_parentheses() {
        let schema = parse_schema(
            r#"
            service S {
              option (hrpc.service) = 9;
              rpc M (A) returns (B) { option (hrpc.method) = 3; }
            }
            "#,
        )
        .unwrap();

        let service = &schema.services[0];
        assert_eq!(service.options.get("hrpc.service"), Some("9"));
        assert_eq!(service.methods[0].options.get("hrpc.method"), Some("3"));
    }

    #[test]
    fn rpc_with_empty_body_and_trailing_semicolon() {
        let schema = parse_schema("service S { rpc M (A) returns (B) {}; rpc N (A) returns (B); }")
            .unwrap();
        assert_eq!(schema.services[0].methods.len(), 2);
        assert!(schema.services[0].methods[0].options.is_empty());
    }

    #[test]
    fn proto3_fields_without_label_are_singular() {
        let schema = parse_schema("message M { string a = 1; repeated int32 b = 2; }").unwrap();
        let fields = &schema.messages[0].fields;
        assert_eq!(fields[0].label, FieldLabel::Singular);
        assert_eq!(fields[1].label, FieldLabel::Repeated);
    }

    #[test]
    fn map_fields_and_field_options() {
        let schema = parse_schema(
            "message M { map<string, int32> counts = 1; repeated int32 xs = 2 [packed = true, (custom.opt) = \"v\"]; }",
        )
        .unwrap();
        let fields = &schema.messages[0].fields;
        assert_eq!(fields[0].type_name, "map<string,int32>");
        assert_eq!(fields[1].options.get("packed"), Some("true"));
        assert_eq!(fields[1].options.get("custom.opt"), Some("v"));
    }

    #[test]
    fn oneof_fields_are_flattened_as_optional() {
        let schema =
            parse_schema("message M { oneof pick { string a = 1; int32 b = 2; } int32 c = 3; }")
                .unwrap();
        let fields = &schema.messages[0].fields;
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].label, FieldLabel::Optional);
        assert_eq!(fields[1].label, FieldLabel::Optional);
        assert_eq!(fields[2].label, FieldLabel::Singular);
    }

    #[test]
    fn nested_messages_and_enums() {
        let schema = parse_schema(
            r#"
            message Outer {
              message Inner { optional int32 x = 1; }
              enum Kind { A = 0; B = 1; NEG = -1; }
              optional Inner inner = 1;
            }
            enum Top { X = 0; Y = 0x10; }
            "#,
        )
        .unwrap();

        let outer = &schema.messages[0];
        assert_eq!(outer.messages[0].name, "Inner");
        assert_eq!(outer.enums[0].values[2].value, -1);
        assert_eq!(schema.enums[0].values[1].value, 16);
        assert!(schema.has_message("Outer.Inner"));
    }

    #[test]
    fn skips_reserved_extensions_and_extend() {
        let schema = parse_schema(
            r#"
            message M {
              reserved 2, 15, 9 to 11;
              reserved "foo", "bar";
              extensions 100 to 199;
              optional int32 a = 1;
            }
            extend M { optional int32 b = 100; }
            "#,
        )
        .unwrap();
        assert_eq!(schema.messages[0].fields.len(), 1);
    }

    #[test]
    fn comments_are_ignored() {
        let schema = parse_schema(
            r#"
            // line comment
            message /* inline */ M {
              /* block
                 comment */
              optional int32 a = 1; // trailing
            }
            "#,
        )
        .unwrap();
        assert_eq!(schema.messages[0].name, "M");
    }

    #[test]
    fn aggregate_and_signed_option_values() {
        let schema = parse_schema(
            r#"
            option (my.agg) = { a: 1 b: "x" };
            message M { optional int32 a = 1 [default = -5]; }
            "#,
        )
        .unwrap();
        assert_eq!(schema.options.get("my.agg"), Some("{a : 1 b : \"x\"}"));
        assert_eq!(schema.messages[0].fields[0].options.get("default"), Some("-5"));
    }

    #[test]
    fn streaming_rpc_is_rejected() {
        let err = parse_schema("service S { rpc Watch (stream A) returns (B); }").unwrap_err();
        assert!(matches!(
            err,
            ParseError::StreamingUnsupported { ref method, .. } if method == "Watch"
        ));
    }

    #[test]
    fn message_type_named_stream_is_not_streaming() {
        let schema = parse_schema("service S { rpc M (stream) returns (B); }").unwrap();
        assert_eq!(schema.services[0].methods[0].input_type, "stream");
    }

    #[test]
    fn reports_position_of_unexpected_token() {
        let err = parse_schema("message M {\n  optional int32 a 1;\n}").unwrap_err();
        assert_eq!(
            err,
            ParseError::Unexpected {
                expected: "'='".to_string(),
                found: "number 1".to_string(),
                line: 2,
                column: 20,
            }
        );
    }

    #[test]
    fn reports_unexpected_end_of_input() {
        let err = parse_schema("message M {").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn rejects_zero_field_tag() {
        let err = parse_schema("message M { optional int32 a = 0; }").unwrap_err();
        assert!(matches!(err, ParseError::InvalidTag { ref value, .. } if value == "0"));
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = parse_schema("syntax = \"proto2;\nmessage M {}").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedString { line: 1, column: 10 });
    }

    #[test]
    fn rejects_unterminated_comment() {
        let err = parse_schema("/* never closed").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedComment { line: 1, column: 1 });
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = parse_schema("message M { @ }").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedChar { found: '@', .. }));
    }

    #[test]
    fn empty_input_is_an_empty_schema() {
        assert_eq!(parse_schema("").unwrap(), Schema::default());
        assert_eq!(parse_schema("  ;\n// nothing\n").unwrap(), Schema::default());
    }
}
