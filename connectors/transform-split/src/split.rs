//! Delimiter matching and fragment extraction.

use regex::Regex;

use crate::config::DelimiterMode;

/// A compiled delimiter.
#[derive(Debug, Clone)]
pub struct Delimiter {
    pattern: Regex,
    mode: DelimiterMode,
}

impl Delimiter {
    pub fn new(delimiter: &str, mode: DelimiterMode) -> Result<Self, regex::Error> {
        let pattern = match mode {
            DelimiterMode::Regex => Regex::new(delimiter)?,
            DelimiterMode::Literal => Regex::new(&regex::escape(delimiter))?,
        };
        Ok(Self { pattern, mode })
    }

    pub fn mode(&self) -> DelimiterMode {
        self.mode
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Split `value` around every delimiter match.
    ///
    /// - a value with no match yields itself as the only fragment
    /// - an empty match at offset 0 never produces a leading empty fragment
    /// - an empty match may directly follow a non-empty one; after an empty
    ///   match the search resumes one character later
    /// - trailing empty fragments are dropped, so a value made only of
    ///   delimiters yields nothing
    ///
    /// Fragments are returned untrimmed.
    pub fn split<'a>(&self, value: &'a str) -> Vec<&'a str> {
        let mut fragments = Vec::new();
        let mut last = 0;
        let mut search = 0;
        let mut matched = false;

        while let Some(m) = self.pattern.find_at(value, search) {
            if m.end() != 0 {
                matched = true;
                fragments.push(&value[last..m.start()]);
                last = m.end();
            }
            if m.start() != m.end() {
                search = m.end();
                continue;
            }
            match value[m.end()..].chars().next() {
                Some(c) => search = m.end() + c.len_utf8(),
                None => break,
            }
        }

        if !matched {
            return vec![value];
        }

        fragments.push(&value[last..]);
        while fragments.last().is_some_and(|f| f.is_empty()) {
            fragments.pop();
        }
        fragments
    }
}

/// Strip leading and trailing characters at or below U+0020: spaces, tabs,
/// line breaks and other control characters. Wider Unicode whitespace such
/// as U+00A0 is kept.
pub fn trim_fragment(fragment: &str) -> &str {
    fragment.trim_matches(|c: char| c <= ' ')
}
