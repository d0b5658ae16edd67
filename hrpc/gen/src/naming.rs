//! Binding member names.

/// Converts a schema identifier into the name used on the generated binding.
///
/// Names that are entirely upper case (acronyms such as `RPC` or `DHT`) are
/// kept as written; anything else has only its first character lower-cased.
///
/// ## Examples
///
/// ```
/// use hrpc_gen::naming::binding_name;
///
/// assert_eq!(binding_name("Test"), "test");
/// assert_eq!(binding_name("GetUserById"), "getUserById");
/// assert_eq!(binding_name("RPC"), "RPC");
/// assert_eq!(binding_name("boring"), "boring");
/// ```
pub fn binding_name(name: &str) -> String {
    if name == name.to_uppercase() {
        return name.to_string();
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_character_changes() {
        assert_eq!(binding_name("HTTPServer"), "hTTPServer");
        assert_eq!(binding_name("Files_v2"), "files_v2");
    }

    #[test]
    fn upper_case_with_digits_and_underscores_is_kept() {
        assert_eq!(binding_name("DHT"), "DHT");
        assert_eq!(binding_name("API_V2"), "API_V2");
        assert_eq!(binding_name("_"), "_");
    }

    #[test]
    fn empty_name() {
        assert_eq!(binding_name(""), "");
    }

    #[test]
    fn non_ascii_first_character() {
        assert_eq!(binding_name("Émit"), "émit");
    }
}
