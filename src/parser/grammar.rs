//! Header grammars and their compilation to regex matchers.
//!
//! A header grammar describes one known dialect of the line that opens every
//! message in a chat export, e.g. `"1/2/21, 09:00 - Alice: hello"`. Grammars
//! are written in a compact symbolic syntax where `%`-tokens stand for
//! timestamp components and the sender name:
//!
//! | token        | matches                         |
//! |--------------|---------------------------------|
//! | `%y` / `%Y`  | 2- or 4-digit year              |
//! | `%m`         | month                           |
//! | `%d`         | day                             |
//! | `%H` / `%I`  | hour (24h / 12h)                |
//! | `%M`         | minutes                         |
//! | `%S`         | seconds                         |
//! | `%p` / `%P`  | am/pm marker                    |
//! | `%name`      | sender name (anything up to `:`)|

use regex::Regex;

use crate::error::{ExtractError, Result};

/// Known header dialects, in trial order. The first grammar that extracts at
/// least one message from a file wins.
pub const HEADER_FORMATS: &[&str] = &[
    "%m/%d/%y, %H:%M - %name:",
    "[%d/%m/%y, %H:%M:%S] %name:",
    "%d-%m-%y %H:%M - %name:",
];

/// Regex source for the sender capture group. The sender is everything up to
/// the colon that closes the header.
const SENDER_GROUP: &str = "(?P<sender>[^:]*)";

/// A header grammar compiled to regex matchers.
#[derive(Debug, Clone)]
pub struct CompiledGrammar {
    /// Matches one full header, capture groups named after the tokens.
    header: Regex,
    /// Matches the header prefix up to (excluding) the sender name. App-injected
    /// alert lines inside a message body start with this same prefix, so it
    /// doubles as the alert pattern during normalization.
    sender_boundary: Regex,
}

impl CompiledGrammar {
    /// The header matcher.
    pub fn header(&self) -> &Regex {
        &self.header
    }

    /// The sender boundary marker (header prefix before the sender name).
    pub fn sender_boundary(&self) -> &Regex {
        &self.sender_boundary
    }
}

/// Compile a symbolic header pattern into matchers.
///
/// Fails with [`ExtractError::UnknownToken`] when the pattern contains a
/// `%`-token outside the recognized set; the caller skips that grammar and
/// tries the next one. Compilation is pure: the same pattern always yields an
/// equivalent matcher.
pub fn compile(header_pattern: &str) -> Result<CompiledGrammar> {
    // Brackets are regex metacharacters but literal text in header patterns.
    let escaped = header_pattern.replace('[', r"\[").replace(']', r"\]");

    let mut compiled = String::with_capacity(escaped.len() * 4);
    let mut rest = escaped.as_str();
    while let Some(pos) = rest.find('%') {
        compiled.push_str(&rest[..pos]);
        let token_end = rest[pos + 1..]
            .find(|c: char| !c.is_ascii_alphanumeric())
            .map(|i| pos + 1 + i)
            .unwrap_or(rest.len());
        let token = &rest[pos..token_end];
        compiled.push_str(token_regex(token)?);
        rest = &rest[token_end..];
    }
    compiled.push_str(rest);

    // Headers end "...%name:" and match through the following space.
    compiled.push(' ');

    // Everything before the sender group bounds where a header (or an
    // injected alert line) can start.
    let boundary_src = compiled
        .split(SENDER_GROUP)
        .next()
        .unwrap_or(&compiled)
        .to_string();

    let header = Regex::new(&compiled).map_err(|_| ExtractError::UnknownToken {
        token: header_pattern.to_string(),
    })?;
    let sender_boundary = Regex::new(&boundary_src).map_err(|_| ExtractError::UnknownToken {
        token: header_pattern.to_string(),
    })?;

    Ok(CompiledGrammar {
        header,
        sender_boundary,
    })
}

/// Map one symbolic token to its capture-group regex.
fn token_regex(token: &str) -> Result<&'static str> {
    Ok(match token {
        "%Y" | "%y" => r"(?P<year>\d{2,4})",
        "%m" => r"(?P<month>\d{1,2})",
        "%d" => r"(?P<day>\d{1,2})",
        "%H" | "%I" => r"(?P<hour>\d{1,2})",
        "%M" => r"(?P<minutes>\d{2})",
        "%S" => r"(?P<seconds>\d{2})",
        "%P" | "%p" => r"(?P<ampm>[AaPp].? ?[Mm].?)",
        "%name" => SENDER_GROUP,
        _ => {
            return Err(ExtractError::UnknownToken {
                token: token.to_string(),
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_builtin_formats() {
        for pattern in HEADER_FORMATS {
            assert!(compile(pattern).is_ok(), "failed to compile: {pattern}");
        }
    }

    #[test]
    fn test_compiled_matches_plain_header() {
        let g = compile("%m/%d/%y, %H:%M - %name:").unwrap();
        let caps = g.header().captures("1/2/21, 09:00 - Alice: hello").unwrap();
        assert_eq!(&caps["month"], "1");
        assert_eq!(&caps["day"], "2");
        assert_eq!(&caps["year"], "21");
        assert_eq!(&caps["hour"], "09");
        assert_eq!(&caps["minutes"], "00");
        assert_eq!(&caps["sender"], "Alice");
    }

    #[test]
    fn test_compiled_matches_bracketed_header() {
        let g = compile("[%d/%m/%y, %H:%M:%S] %name:").unwrap();
        let caps = g
            .header()
            .captures("[02/01/21, 09:00:13] Bob: hi there")
            .unwrap();
        assert_eq!(&caps["day"], "02");
        assert_eq!(&caps["seconds"], "13");
        assert_eq!(&caps["sender"], "Bob");
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let err = compile("%m/%d/%y %Q - %name:").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnknownToken { ref token } if token == "%Q"
        ));
    }

    #[test]
    fn test_sender_boundary_excludes_sender() {
        let g = compile("%m/%d/%y, %H:%M - %name:").unwrap();
        // The boundary matches the timestamp prefix but not the sender name.
        let text = "1/2/21, 09:00 - Alice: hello";
        let m = g.sender_boundary().find(text).unwrap();
        assert_eq!(m.start(), 0);
        assert_eq!(&text[m.range()], "1/2/21, 09:00 - ");
    }

    #[test]
    fn test_ampm_token() {
        let g = compile("%m/%d/%y, %I:%M %p - %name:").unwrap();
        let caps = g
            .header()
            .captures("1/2/21, 9:05 PM - Alice: evening")
            .unwrap();
        assert_eq!(&caps["ampm"], "PM");
        let caps = g
            .header()
            .captures("1/2/21, 9:05 a.m. - Alice: morning")
            .unwrap();
        assert_eq!(&caps["ampm"], "a.m.");
    }

    #[test]
    fn test_compile_is_deterministic() {
        let a = compile(HEADER_FORMATS[0]).unwrap();
        let b = compile(HEADER_FORMATS[0]).unwrap();
        assert_eq!(a.header().as_str(), b.header().as_str());
        assert_eq!(a.sender_boundary().as_str(), b.sender_boundary().as_str());
    }
}
