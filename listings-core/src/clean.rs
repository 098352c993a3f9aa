//! Listing cleanup: drop test issues, derive the company name, reorder.

use crate::config::PipelineConfig;
use crate::table::{ParseError, Table};

/// Company name derived from a security name: everything before the first
/// separator, or the whole name when there is none. No trimming is applied.
pub fn company_name(security_name: &str, separator: char) -> &str {
    match security_name.find(separator) {
        Some(pos) => &security_name[..pos],
        None => security_name,
    }
}

/// Clean a raw listing table.
///
/// 1. keep rows whose test-issue flag equals the non-test marker exactly
/// 2. append the derived company-name column
/// 3. move that column to index 1
///
/// The all-other listings carry no separator in most security names, so the
/// company name there is usually the full security name.
pub fn clean(raw: Table, config: &PipelineConfig) -> Result<Table, ParseError> {
    let test_idx = raw.require_column(&config.test_issue_column)?;
    let name_idx = raw.require_column(&config.security_name_column)?;
    let marker = config.non_test_marker.as_str();
    let sep = config.name_separator;

    let cleaned = raw
        .filter(|row| row[test_idx] == marker)
        .with_column(&config.company_name_column, |row| {
            company_name(&row[name_idx], sep).to_string()
        })?;

    let last = cleaned.columns().len() - 1;
    Ok(cleaned.move_column(last, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_listing;

    fn raw(text: &str) -> Table {
        parse_listing(text, '|').unwrap()
    }

    #[test]
    fn company_name_truncates_at_first_separator() {
        assert_eq!(company_name("Agilent-Common", '-'), "Agilent");
        assert_eq!(company_name("A-B-C", '-'), "A");
        assert_eq!(company_name("No Separator Inc.", '-'), "No Separator Inc.");
        assert_eq!(company_name("-Leading", '-'), "");
        assert_eq!(company_name("Brookfield Corp - Class A", '-'), "Brookfield Corp ");
    }

    #[test]
    fn drops_everything_but_exact_non_test_marker() {
        let t = raw("Symbol|Security Name|Exchange|Test Issue\n\
                     A|Alpha|N|N\n\
                     B|Beta|N|Y\n\
                     C|Gamma|N|n\n\
                     D|Delta|N| N\n\
                     E|Epsilon|N|\n");
        let cleaned = clean(t, &PipelineConfig::default()).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.rows()[0][0], "A");
    }

    #[test]
    fn company_name_lands_in_second_column() {
        let t = raw("ACT Symbol|Security Name|Exchange|Test Issue\n\
                     AB|AllianceBernstein-Units|N|N\n");
        let cleaned = clean(t, &PipelineConfig::default()).unwrap();
        assert_eq!(
            cleaned.columns(),
            ["ACT Symbol", "Company Name", "Security Name", "Exchange", "Test Issue"]
        );
        assert_eq!(
            cleaned.rows()[0],
            ["AB", "AllianceBernstein", "AllianceBernstein-Units", "N", "N"]
        );
    }

    #[test]
    fn missing_test_issue_column_is_a_parse_error() {
        let t = raw("Symbol|Security Name|Exchange\nA|Alpha|N\n");
        let err = clean(t, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn(c) if c == "Test Issue"));
    }

    #[test]
    fn existing_company_name_column_is_rejected() {
        let t = raw("Symbol|Company Name|Security Name|Test Issue\nA|x|Alpha|N\n");
        assert!(matches!(
            clean(t, &PipelineConfig::default()),
            Err(ParseError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn trailer_row_is_filtered_out() {
        let t = raw("ACT Symbol|Security Name|Exchange|Test Issue\n\
                     A|Agilent|N|N\n\
                     File Creation Time: 0611202517:32|||\n");
        let cleaned = clean(t, &PipelineConfig::default()).unwrap();
        assert_eq!(cleaned.len(), 1);
    }
}
