//! Line tokenizer for the filter file.
//!
//! A metadata line is `!<keyword>[ <value>]`. Blank lines and lines whose
//! first token does not start with `!` carry nothing.

/// Marks a metadata keyword.
pub const DIRECTIVE_SENTINEL: char = '!';

/// Recognized filter directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Starts a new record.
    Url,
    Host,
    LastMod,
    Title,
    Description,
    RwtTitle,
    RwtKicker,
    BestWords,
    SnrGrade,
    SnrScore,
    Keywords,
    Topwords,
}

impl Directive {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let directive = match keyword {
            "!url" => Directive::Url,
            "!host" => Directive::Host,
            "!lastmod" => Directive::LastMod,
            "!title" => Directive::Title,
            "!description" => Directive::Description,
            "!rwt:title" => Directive::RwtTitle,
            "!rwt:kicker" => Directive::RwtKicker,
            "!bestwords" => Directive::BestWords,
            "!snr:grade" => Directive::SnrGrade,
            "!snrScore" => Directive::SnrScore,
            "!keywords" => Directive::Keywords,
            "!topwords" => Directive::Topwords,
            _ => return None,
        };
        Some(directive)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Directive::Url => "!url",
            Directive::Host => "!host",
            Directive::LastMod => "!lastmod",
            Directive::Title => "!title",
            Directive::Description => "!description",
            Directive::RwtTitle => "!rwt:title",
            Directive::RwtKicker => "!rwt:kicker",
            Directive::BestWords => "!bestwords",
            Directive::SnrGrade => "!snr:grade",
            Directive::SnrScore => "!snrScore",
            Directive::Keywords => "!keywords",
            Directive::Topwords => "!topwords",
        }
    }

    /// Directives after which the current record may become eligible.
    pub fn decides_eligibility(self) -> bool {
        matches!(self, Directive::Host | Directive::SnrGrade | Directive::SnrScore)
    }
}

/// One tokenized metadata line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterLine<'a> {
    Directive { directive: Directive, value: &'a str },
    Unknown { keyword: &'a str, value: &'a str },
}

/// Tokenize one line of the filter file.
///
/// Splits on the first space; the value is empty when there is none.
pub fn parse_line(line: &str) -> Option<FilterLine<'_>> {
    if line.trim().is_empty() {
        return None;
    }

    let (keyword, value) = line.split_once(' ').unwrap_or((line, ""));

    if !keyword.starts_with(DIRECTIVE_SENTINEL) {
        return None;
    }

    Some(match Directive::from_keyword(keyword) {
        Some(directive) => FilterLine::Directive { directive, value },
        None => FilterLine::Unknown { keyword, value },
    })
}
