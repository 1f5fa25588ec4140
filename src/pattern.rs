//! Wildcard search-term compilation.

use crate::error::ScoutError;
use regex::{Regex, RegexBuilder};

/// How a compiled pattern is anchored against a candidate file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The pattern must cover the whole file name: `report?.pdf` matches
    /// `report1.pdf` but not `old-report1.pdf`.
    #[default]
    WholeName,
    /// The pattern may match anywhere inside the file name.
    Substring,
}

/// A compiled, case-insensitive predicate over file names.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    regex: Regex,
}

impl NameMatcher {
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Compile a search term with the default whole-name anchoring.
pub fn compile(term: &str) -> Result<NameMatcher, ScoutError> {
    compile_with_mode(term, MatchMode::WholeName)
}

/// Compile a search term containing optional `*`/`?` wildcards.
///
/// `*` matches any run of characters (including none) and `?` matches exactly
/// one. Every other character matches itself, so `report[1].pdf` only matches
/// a file literally named that. Matching is case-insensitive. Terms that are
/// empty or whitespace-only are rejected before compilation.
pub fn compile_with_mode(term: &str, mode: MatchMode) -> Result<NameMatcher, ScoutError> {
    if term.trim().is_empty() {
        return Err(ScoutError::InvalidPattern(term.to_string()));
    }

    let mut pattern = String::with_capacity(term.len() + 4);
    if mode == MatchMode::WholeName {
        pattern.push('^');
    }
    let mut literal = String::new();
    for ch in term.chars() {
        match ch {
            '*' | '?' => {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();
                pattern.push_str(if ch == '*' { ".*" } else { "." });
            }
            _ => literal.push(ch),
        }
    }
    pattern.push_str(&regex::escape(&literal));
    if mode == MatchMode::WholeName {
        pattern.push('$');
    }

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|_| ScoutError::InvalidPattern(term.to_string()))?;
    Ok(NameMatcher { regex })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_name_requires_full_match() {
        let matcher = compile("report.pdf").unwrap();
        assert!(matcher.is_match("report.pdf"));
        assert!(matcher.is_match("REPORT.PDF"));
        assert!(!matcher.is_match("old-report.pdf"));
        assert!(!matcher.is_match("report.pdf.bak"));
    }

    #[test]
    fn star_matches_any_run() {
        let matcher = compile("*.pdf").unwrap();
        assert!(matcher.is_match("a.pdf"));
        assert!(matcher.is_match("x.y.pdf"));
        assert!(!matcher.is_match("a.pdfx"));

        let matcher = compile("*pdf*").unwrap();
        assert!(matcher.is_match("x.pdf"));
        assert!(matcher.is_match("pdf"));
        assert!(!matcher.is_match("x.txt"));
    }

    #[test]
    fn question_mark_matches_exactly_one() {
        let matcher = compile("report?.pdf").unwrap();
        assert!(matcher.is_match("report1.pdf"));
        assert!(matcher.is_match("reportA.pdf"));
        assert!(!matcher.is_match("report.pdf"));
        assert!(!matcher.is_match("report12.pdf"));
    }

    #[test]
    fn metacharacters_match_literally() {
        let matcher = compile("report[1].pdf").unwrap();
        assert!(matcher.is_match("report[1].pdf"));
        assert!(!matcher.is_match("report1.pdf"));

        let matcher = compile("a+b.txt").unwrap();
        assert!(matcher.is_match("a+b.txt"));
        assert!(!matcher.is_match("aab.txt"));

        let matcher = compile("notes.txt").unwrap();
        assert!(!matcher.is_match("notesXtxt"));
    }

    #[test]
    fn substring_mode_matches_inside_names() {
        let matcher = compile_with_mode("report", MatchMode::Substring).unwrap();
        assert!(matcher.is_match("REPORT.PDF"));
        assert!(matcher.is_match("quarterly-report.txt"));
        assert!(!matcher.is_match("summary.pdf"));

        let anchored = compile("report").unwrap();
        assert!(!anchored.is_match("report.pdf"));
        assert!(anchored.is_match("Report"));
    }

    #[test]
    fn wildcards_work_in_substring_mode() {
        let matcher = compile_with_mode("rep*rt", MatchMode::Substring).unwrap();
        assert!(matcher.is_match("annual-report.pdf"));
        assert!(matcher.is_match("repart"));
        assert!(!matcher.is_match("retort"));
    }

    #[test]
    fn blank_terms_are_rejected() {
        assert!(matches!(compile(""), Err(ScoutError::InvalidPattern(_))));
        assert!(matches!(compile("   "), Err(ScoutError::InvalidPattern(_))));
        assert!(matches!(compile("\t\n"), Err(ScoutError::InvalidPattern(_))));
    }

    #[test]
    fn lone_star_matches_everything() {
        let matcher = compile("*").unwrap();
        assert!(matcher.is_match("anything.at.all"));
        assert!(matcher.is_match("x"));
    }
}
