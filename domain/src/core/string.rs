//! String utilities for the domain layer.

/// First line of a (possibly multi-line) description.
///
/// Returns `-` for empty text so listings never show a blank column.
pub fn first_line(s: &str) -> &str {
    let line = s.split('\n').next().unwrap_or_default();
    if line.is_empty() { "-" } else { line }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("List issues.\n\nLonger text"), "List issues.");
        assert_eq!(first_line("single"), "single");
    }

    #[test]
    fn test_first_line_empty() {
        assert_eq!(first_line(""), "-");
        assert_eq!(first_line("\nsecond"), "-");
    }
}
