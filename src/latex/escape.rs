use std::fmt;

/// A string that is safe to substitute into a LaTeX document.
///
/// The only way to obtain one is [`latex_escape`], so every template
/// substitution point that accepts an `Escaped` is safe by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped(String);

impl Escaped {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escapes every LaTeX-significant character in `input`.
///
/// Replacement is a single pass over the input, so an inserted escape
/// sequence is never re-read by a later rule.
pub fn latex_escape(input: &str) -> Escaped {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    Escaped(out)
}

#[cfg(test)]
mod tests {
    use super::latex_escape;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(latex_escape("Alice").as_str(), "Alice");
        assert_eq!(latex_escape("a@example.com").as_str(), "a@example.com");
    }

    #[test]
    fn test_each_special_character_is_escaped() {
        assert_eq!(latex_escape("&").as_str(), "\\&");
        assert_eq!(latex_escape("%").as_str(), "\\%");
        assert_eq!(latex_escape("$").as_str(), "\\$");
        assert_eq!(latex_escape("#").as_str(), "\\#");
        assert_eq!(latex_escape("_").as_str(), "\\_");
        assert_eq!(latex_escape("{").as_str(), "\\{");
        assert_eq!(latex_escape("}").as_str(), "\\}");
        assert_eq!(latex_escape("~").as_str(), "\\textasciitilde{}");
        assert_eq!(latex_escape("^").as_str(), "\\textasciicircum{}");
        assert_eq!(latex_escape("\\").as_str(), "\\textbackslash{}");
    }

    #[test]
    fn test_backslash_escape_is_not_reprocessed() {
        // A backslash followed by a special character must produce two
        // independent escapes, not a re-escaped escape sequence.
        assert_eq!(latex_escape("\\&").as_str(), "\\textbackslash{}\\&");
    }

    #[test]
    fn test_environment_terminator_is_neutralized() {
        let escaped = latex_escape("\\end{document}");
        assert_eq!(escaped.as_str(), "\\textbackslash{}end\\{document\\}");
        assert!(!escaped.as_str().contains("\\end{document}"));
    }

    #[test]
    fn test_escaped_output_has_no_bare_specials() {
        let escaped = latex_escape("100% of $5 & #1_{x}~^\\");
        // Strip the escape sequences the function emits; nothing
        // markup-significant may remain.
        let residue = escaped
            .as_str()
            .replace("\\textbackslash{}", "")
            .replace("\\textasciitilde{}", "")
            .replace("\\textasciicircum{}", "")
            .replace("\\&", "")
            .replace("\\%", "")
            .replace("\\$", "")
            .replace("\\#", "")
            .replace("\\_", "")
            .replace("\\{", "")
            .replace("\\}", "");
        for ch in ['\\', '&', '%', '$', '#', '_', '{', '}', '~', '^'] {
            assert!(
                !residue.contains(ch),
                "unescaped '{}' left in {:?}",
                ch,
                escaped.as_str()
            );
        }
    }

    #[test]
    fn test_message_with_ampersand() {
        assert_eq!(
            latex_escape("Hello & welcome").as_str(),
            "Hello \\& welcome"
        );
    }
}
