//! Line-oriented record source.
//!
//! ```text
//! # who paid, how much, for whom[, comment]
//! D, 20.00, MK
//! D, 20.0 + 15.50, mK, groceries
//! H, -250, DH, rent from the subtenant
//! ```
//!
//! Lines starting with `#` are comments and empty lines are blank; both
//! are kept as placeholders so diagnostics can name the source line.

use crate::core::expense::{RawRecord, SourceLine};
use thiserror::Error;

/// Errors arising from splitting source lines into fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("line {line}: expected at least 3 comma-separated fields, found {found}: {content}")]
    MissingFields {
        line: usize,
        found: usize,
        content: String,
    },
}

/// Split a record source into lines.
pub fn parse_source(text: &str) -> Result<Vec<SourceLine>, SourceError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

/// Split one source line. `line` is the 1-based line number for errors.
pub fn parse_line(line: usize, content: &str) -> Result<SourceLine, SourceError> {
    if content.starts_with('#') {
        return Ok(SourceLine::Comment);
    }
    if content.trim().is_empty() {
        return Ok(SourceLine::Blank);
    }

    let mut fields = content.splitn(4, ',');
    let (Some(payer), Some(amount), Some(beneficiaries)) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(SourceError::MissingFields {
            line,
            found: content.split(',').count(),
            content: content.trim_end().to_string(),
        });
    };

    let comment = fields
        .next()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(SourceLine::Record(RawRecord {
        payer: payer.trim().to_string(),
        amount: amount.trim().to_string(),
        beneficiaries: beneficiaries.trim().to_string(),
        comment,
    }))
}

/// Write records back in the source line format.
pub fn render_source(records: &[RawRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let line = parse_line(1, "D, 20.0 + 15.50, mK").unwrap();
        assert_eq!(line, SourceLine::Record(RawRecord::new("D", "20.0 + 15.50", "mK")));
    }

    #[test]
    fn test_comment_field_may_contain_commas() {
        let line = parse_line(1, "H, -250, DH, rent, March").unwrap();
        assert_eq!(
            line,
            SourceLine::Record(RawRecord::new("H", "-250", "DH").with_comment("rent, March"))
        );
    }

    #[test]
    fn test_comments_and_blanks() {
        let lines = parse_source("# header\n\nD, 10, DK\n   \r\n").unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], SourceLine::Comment);
        assert_eq!(lines[1], SourceLine::Blank);
        assert!(matches!(lines[2], SourceLine::Record(_)));
        assert_eq!(lines[3], SourceLine::Blank);
    }

    #[test]
    fn test_missing_fields() {
        let err = parse_source("D, 10, DK\nK, 5").unwrap_err();
        assert_eq!(
            err,
            SourceError::MissingFields {
                line: 2,
                found: 2,
                content: "K, 5".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_comment_is_absent() {
        let line = parse_line(1, "D, 10, DK,  ").unwrap();
        assert_eq!(line, SourceLine::Record(RawRecord::new("D", "10", "DK")));
    }

    #[test]
    fn test_render_parses_back() {
        let records = vec![
            RawRecord::new("D", "10", "DK"),
            RawRecord::new("K", "2.5 + 2.5", "KH").with_comment("bakery"),
        ];
        let text = render_source(&records);
        let parsed = parse_source(&text).unwrap();
        let expected: Vec<SourceLine> = records.into_iter().map(SourceLine::from).collect();
        assert_eq!(parsed, expected);
    }
}
