use std::borrow::Cow;

use regex::Regex;

use lazy_static::lazy_static;

lazy_static! {

    /// Bracketed integer citation markers, e.g. `[12]`.
    pub(crate) static ref RE_CITATION: Regex = Regex::new(r"\[\d+\]").unwrap();

    /// Lines that consist of a bare link, including the line break.
    pub(crate) static ref RE_URL_LINE: Regex = Regex::new(r"(?m)^https?://.*[\r\n]*").unwrap();

    /// The first parenthetical group of a title, e.g. `(Earth-616)`.
    pub(crate) static ref RE_PARENTHETICAL: Regex = Regex::new(r"\(.*?\)").unwrap();

    /// A merge separator that ended up in front of a space.
    pub(crate) static ref RE_DANGLING_SEPARATOR: Regex = Regex::new(r"_ ").unwrap();

    /// An isolated period left over between two tokens.
    pub(crate) static ref RE_STRAY_PERIOD: Regex = Regex::new(r" \. ").unwrap();

    /// An isolated period at the end of a line.
    pub(crate) static ref RE_TRAILING_PERIOD: Regex = Regex::new(r"(?m) \.$").unwrap();

    /// Whitespace in front of a hyphenated word part.
    pub(crate) static ref RE_SPLIT_HYPHEN: Regex = Regex::new(r"\s-(\w)").unwrap();

}

/// Remove every bracketed integer citation marker from the content.
pub fn strip_citations(content: &str) -> Cow<str> {
    RE_CITATION.replace_all(content, "")
}

/// Remove every line that starts with `http://` or `https://`.
pub fn strip_url_lines(content: &str) -> Cow<str> {
    RE_URL_LINE.replace_all(content, "")
}

/// Remove the first parenthetical group of a title and trim the remainder.
pub fn strip_parenthetical(title: &str) -> String {
    RE_PARENTHETICAL.replace(title, "").trim().to_string()
}

/// Repair artifacts the tokenization leaves behind: dangling merge
/// separators, isolated sentence-final periods and hyphenated words that got
/// split from their leading part.
pub fn repair_tokenization(content: &str) -> String {
    let content = RE_DANGLING_SEPARATOR.replace_all(content, " ");
    let content = RE_STRAY_PERIOD.replace_all(&content, " ");
    let content = RE_TRAILING_PERIOD.replace_all(&content, "");
    RE_SPLIT_HYPHEN.replace_all(&content, "-$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citations_removed() {
        assert_eq!(
            strip_citations("He was born in Queens.[1] Later[23] he moved."),
            "He was born in Queens. Later he moved."
        );
        assert_eq!(strip_citations("[note 1] stays"), "[note 1] stays");
    }

    #[test]
    fn url_lines_removed() {
        let content = "First paragraph.\nhttp://example.com/source\nSecond paragraph.\n";
        assert_eq!(strip_url_lines(content), "First paragraph.\nSecond paragraph.\n");

        let content = "https://example.com only line";
        assert_eq!(strip_url_lines(content), "");
    }

    #[test]
    fn url_mid_line_kept() {
        let content = "See https://example.com for more.";
        assert_eq!(strip_url_lines(content), content);
    }

    #[test]
    fn parenthetical_stripped() {
        assert_eq!(strip_parenthetical("Anthony Stark (Earth-616)"), "Anthony Stark");
        assert_eq!(strip_parenthetical("Avengers"), "Avengers");
        assert_eq!(strip_parenthetical("(Earth-616)"), "");
    }

    #[test]
    fn repairs_applied_in_order() {
        assert_eq!(repair_tokenization("Iron_Man_ flew"), "Iron_Man flew");
        assert_eq!(repair_tokenization("one . two"), "one two");
        assert_eq!(repair_tokenization("He is Iron_Man .\nHe fights ."), "He is Iron_Man\nHe fights");
        assert_eq!(repair_tokenization("spider -sense"), "spider-sense");
    }
}
