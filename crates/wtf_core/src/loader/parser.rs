//! Line grammar for acronym definition files.

use once_cell::sync::Lazy;
use regex::Regex;

// Acronym: run of non-blank chars. Translation: rest of the line, starting at
// the first non-blank char after the separator.
static ACRONYM_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<acronym>[^ \t]+)[ \t]+(?P<translation>[^ \t].*)$")
        .expect("valid acronym line regex")
});

/// One definition line split into its two fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub acronym: &'a str,
    pub translation: &'a str,
}

/// Splits a definition line; returns `None` for lines to skip.
///
/// Skipped: blank lines, lines starting with a blank, and lines without a
/// space/tab separator. Any other leading character, `#` included, belongs
/// to the acronym. The translation is returned verbatim,
/// trailing whitespace included; only a line terminator is dropped.
pub fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    let captures = ACRONYM_LINE_RE.captures(line)?;
    Some(ParsedLine {
        acronym: captures.name("acronym")?.as_str(),
        translation: captures.name("translation")?.as_str(),
    })
}
