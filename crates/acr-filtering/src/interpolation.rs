//! Token interpolation.

use crate::{FilteringError, FilteringResult};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Supplies values for expressions found between delimiters.
pub trait ValueSource {
    /// Look up the raw value of an expression.
    fn value(&self, expression: &str) -> Option<String>;
}

impl ValueSource for BTreeMap<String, String> {
    fn value(&self, expression: &str) -> Option<String> {
        self.get(expression).cloned()
    }
}

impl ValueSource for HashMap<String, String> {
    fn value(&self, expression: &str) -> Option<String> {
        self.get(expression).cloned()
    }
}

/// A pair of start/end token delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    pub start: String,
    pub end: String,
}

impl Delimiter {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Parse the `start*end` form; a value without `*` uses the same string for both.
    pub fn parse(value: &str) -> Self {
        match value.split_once('*') {
            Some((start, end)) => Self::new(start, end),
            None => Self::new(value, value),
        }
    }
}

/// Options controlling interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationOptions {
    /// A token preceded by this string is emitted literally, without the escape.
    pub escape_string: Option<String>,
    /// Double single backslashes in values that look like Windows paths.
    pub escape_windows_paths: bool,
    /// Token delimiters, tried in order.
    pub delimiters: Vec<Delimiter>,
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self {
            escape_string: None,
            escape_windows_paths: false,
            delimiters: vec![Delimiter::parse("${*}"), Delimiter::parse("@")],
        }
    }
}

/// Replaces delimited expressions with values from a [`ValueSource`].
///
/// Values are themselves interpolated, so `${a}` → `${b}` → `x` resolves to
/// `x`. Unknown expressions are left untouched.
#[derive(Debug, Clone)]
pub struct Interpolator {
    options: InterpolationOptions,
    pattern: Regex,
}

impl Interpolator {
    pub fn new(options: InterpolationOptions) -> FilteringResult<Self> {
        let pattern = build_pattern(&options)?;
        Ok(Self { options, pattern })
    }

    #[must_use]
    pub fn options(&self) -> &InterpolationOptions {
        &self.options
    }

    /// Interpolate all expressions in `text`.
    pub fn interpolate(&self, text: &str, source: &dyn ValueSource) -> FilteringResult<String> {
        let mut stack = Vec::new();
        self.interpolate_with(text, source, &mut stack)
    }

    fn interpolate_with(
        &self,
        text: &str,
        source: &dyn ValueSource,
        stack: &mut Vec<String>,
    ) -> FilteringResult<String> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            last = whole.end();

            if let Some(escape) = caps.name("esc") {
                // Escaped token: drop the escape, keep the token verbatim.
                out.push_str(&text[escape.end()..whole.end()]);
                continue;
            }

            let expression = (0..self.options.delimiters.len())
                .find_map(|i| caps.name(&format!("k{i}")))
                .map(|m| m.as_str());

            match expression {
                Some(expression) => match self.resolve(expression, source, stack)? {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(whole.as_str()),
                },
                None => out.push_str(whole.as_str()),
            }
        }

        out.push_str(&text[last..]);
        Ok(out)
    }

    fn resolve(
        &self,
        expression: &str,
        source: &dyn ValueSource,
        stack: &mut Vec<String>,
    ) -> FilteringResult<Option<String>> {
        if stack.iter().any(|seen| seen == expression) {
            let mut chain = stack.clone();
            chain.push(expression.to_string());
            return Err(FilteringError::ExpressionCycle(chain.join(" -> ")));
        }
        let Some(raw) = source.value(expression) else {
            return Ok(None);
        };

        stack.push(expression.to_string());
        let resolved = self.interpolate_with(&raw, source, stack);
        stack.pop();
        let resolved = resolved?;

        if self.options.escape_windows_paths {
            Ok(Some(escape_windows_path(&resolved)))
        } else {
            Ok(Some(resolved))
        }
    }
}

/// Double single backslashes when the value contains a drive-letter path.
///
/// `c:\foo\bar` becomes `c:\\foo\\bar`; already doubled backslashes are kept.
pub fn escape_windows_path(value: &str) -> String {
    static DRIVE: OnceLock<Option<Regex>> = OnceLock::new();
    let looks_like_path = DRIVE
        .get_or_init(|| Regex::new(r"[a-zA-Z]:\\").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value));
    if !looks_like_path {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 8);
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if chars.peek() == Some(&'\\') {
                chars.next();
            }
            out.push_str("\\\\");
        } else {
            out.push(ch);
        }
    }
    out
}

fn build_pattern(options: &InterpolationOptions) -> FilteringResult<Regex> {
    let alternatives: Vec<String> = options
        .delimiters
        .iter()
        .enumerate()
        .filter(|(_, d)| !d.start.is_empty() && !d.end.is_empty())
        .map(|(i, d)| {
            let mut excluded = String::from(r"\s");
            if let Some(first) = d.end.chars().next() {
                excluded.push_str(&regex::escape(&first.to_string()));
            }
            format!(
                "{}(?P<k{i}>[^{excluded}]+){}",
                regex::escape(&d.start),
                regex::escape(&d.end)
            )
        })
        .collect();

    let escape = options
        .escape_string
        .as_deref()
        .filter(|e| !e.is_empty())
        .map(|e| format!("(?P<esc>{})?", regex::escape(e)))
        .unwrap_or_default();

    Ok(Regex::new(&format!("{escape}(?:{})", alternatives.join("|")))?)
}
