use crate::chapter::Chapter;
use crate::error::{ChapterError, ChapterResult};

/**
    Selects chapters for removal by title.

    A chapter matches when any pattern occurs in its title. Unless the
    filter is case sensitive both sides are compared in lowercase.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFilter {
    patterns: Vec<String>,
    case_sensitive: bool,
}

impl ChapterFilter {
    pub fn new<I, S>(patterns: I, case_sensitive: bool) -> ChapterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| {
                let p: String = p.into();
                if case_sensitive { p } else { p.to_lowercase() }
            })
            .collect();

        if patterns.is_empty() || patterns.iter().any(String::is_empty) {
            return Err(ChapterError::EmptyPattern);
        }

        Ok(Self {
            patterns,
            case_sensitive,
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, chapter: &Chapter) -> bool {
        if self.case_sensitive {
            self.patterns.iter().any(|p| chapter.title.contains(p.as_str()))
        } else {
            let title = chapter.title.to_lowercase();
            self.patterns.iter().any(|p| title.contains(p.as_str()))
        }
    }
}
