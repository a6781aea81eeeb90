use std::{fmt, str::FromStr};
use thiserror::Error;

/// A "chapter.verse" reference. Ordering is chapter first, then verse,
/// both numeric, so `7.2 < 7.14`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseRef {
    pub chapter: u32,
    pub verse: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid verse reference: {0:?}")]
pub struct ParseVerseRefError(pub String);

impl VerseRef {
    pub fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse }
    }
}

impl FromStr for VerseRef {
    type Err = ParseVerseRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVerseRefError(s.to_string());
        let (chapter, verse) = match s.split_once('.') {
            Some((chapter, verse)) => (chapter, Some(verse)),
            None => (s, None),
        };

        let chapter = parse_part(chapter).ok_or_else(invalid)?;
        let verse = match verse {
            Some(verse) => parse_part(verse).ok_or_else(invalid)?,
            None => 0,
        };

        Ok(Self { chapter, verse })
    }
}

// u32::from_str accepts a leading '+', so check the digits first.
fn parse_part(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chapter, self.verse)
    }
}
