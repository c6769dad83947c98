use crate::error::{Result, ShellError};
use crate::printable::printable;

/// A line split into its command keyword and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub keyword: String,
    pub args: Vec<String>,
}

/// Parse a raw input line.
///
/// Non-printable characters are removed first, then the text is split on
/// runs of whitespace. Arguments are passed through as-is; converting them
/// is left to the handler.
pub fn parse_line(raw: &str) -> Result<ParsedLine> {
    let filtered = printable(raw);
    let mut tokens = filtered.split_whitespace().map(str::to_string);
    let keyword = tokens.next().ok_or(ShellError::EmptyLine)?;
    Ok(ParsedLine {
        keyword,
        args: tokens.collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_and_args() {
        let parsed = parse_line("roll 3 4").unwrap();
        assert_eq!(parsed.keyword, "roll");
        assert_eq!(parsed.args, vec!["3", "4"]);
    }

    #[test]
    fn keyword_only() {
        let parsed = parse_line("help").unwrap();
        assert_eq!(parsed.keyword, "help");
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn runs_of_spaces_collapse() {
        let parsed = parse_line("  seed    42  ").unwrap();
        assert_eq!(parsed.keyword, "seed");
        assert_eq!(parsed.args, vec!["42"]);
    }

    #[test]
    fn blank_line_is_empty() {
        assert!(matches!(parse_line("   "), Err(ShellError::EmptyLine)));
        assert!(matches!(parse_line(""), Err(ShellError::EmptyLine)));
        assert!(matches!(parse_line("\t\u{7}"), Err(ShellError::EmptyLine)));
    }

    #[test]
    fn filter_runs_before_split() {
        // Tabs are stripped, not treated as separators.
        let parsed = parse_line("roll\t3").unwrap();
        assert_eq!(parsed.keyword, "roll3");
        assert!(parsed.args.is_empty());
    }
}
