//! Text matching utilities for assertions

use regex::Regex;

/// How a node's source text is checked
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Exact text match
    Exact(String),
    /// Text starts with prefix
    StartsWith(String),
    /// Text contains substring
    Contains(String),
    /// Text matches a regular expression somewhere
    Pattern(Regex),
}

impl TextMatch {
    /// Build a [`TextMatch::Pattern`]; panics on an invalid expression
    pub fn pattern(expression: &str) -> Self {
        match Regex::new(expression) {
            Ok(regex) => TextMatch::Pattern(regex),
            Err(error) => panic!("Invalid pattern {:?}: {}", expression, error),
        }
    }

    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::StartsWith(prefix) => actual.starts_with(prefix),
            TextMatch::Contains(substring) => actual.contains(substring),
            TextMatch::Pattern(regex) => regex.is_match(actual),
        }
    }

    fn describe(&self) -> String {
        match self {
            TextMatch::Exact(expected) => format!("be {:?}", expected),
            TextMatch::StartsWith(prefix) => format!("start with {:?}", prefix),
            TextMatch::Contains(substring) => format!("contain {:?}", substring),
            TextMatch::Pattern(regex) => format!("match /{}/", regex.as_str()),
        }
    }

    /// Panics with `context` in the message when `actual` does not match
    pub fn assert(&self, actual: &str, context: &str) {
        if !self.matches(actual) {
            panic!(
                "{}: expected source text to {}, got {:?}",
                context,
                self.describe(),
                actual
            );
        }
    }
}

/// Assert that two strings are equal, with a line-by-line diff on failure
pub fn assert_text_eq(expected: &str, actual: &str) {
    if let Some(report) = diff_text(expected, actual) {
        panic!(
            "\ntext differs (- expected, + actual):\n{}\n\nexpected:\n{}\nactual:\n{}",
            report, expected, actual
        );
    }
}

/// `None` if the strings are equal, otherwise the differing lines
pub fn diff_text(expected: &str, actual: &str) -> Option<String> {
    if expected == actual {
        return None;
    }

    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let actual_lines: Vec<&str> = actual.split('\n').collect();
    let mut report = Vec::new();

    for line in 0..expected_lines.len().max(actual_lines.len()) {
        let (want, got) = (expected_lines.get(line), actual_lines.get(line));
        if want == got {
            continue;
        }
        report.push(format!(
            "{:>4} - {}",
            line + 1,
            want.map_or("<missing>".to_string(), |text| format!("{:?}", text))
        ));
        report.push(format!(
            "{:>4} + {}",
            line + 1,
            got.map_or("<missing>".to_string(), |text| format!("{:?}", text))
        ));
    }
    Some(report.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        assert!(TextMatch::Exact("a".into()).matches("a"));
        assert!(TextMatch::StartsWith("ab".into()).matches("abc"));
        assert!(TextMatch::Contains("b".into()).matches("abc"));
        assert!(TextMatch::pattern(r"^\d+:\d+$").matches("3:14"));
        assert!(!TextMatch::pattern(r"^\d+$").matches("x1"));
    }

    #[test]
    fn test_diff_text() {
        assert_eq!(diff_text("a\nb", "a\nb"), None);
        let report = diff_text("a\nb\n", "a\nc\n").unwrap();
        assert_eq!(report, "   2 - \"b\"\n   2 + \"c\"");
        let report = diff_text("a\n", "a").unwrap();
        assert!(report.ends_with("2 + <missing>"));
    }

    #[test]
    #[should_panic(expected = "root: expected source text to be")]
    fn test_assert_exact_fails() {
        TextMatch::Exact("a".into()).assert("b", "root");
    }
}
