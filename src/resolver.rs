use crate::prelude::*;
use crate::{
    CurrentDate, DefaultDate, DefinedDates, KEYWORD_CURRENT, KEYWORD_DEFAULT, KEYWORD_FIRST, KEYWORD_LAST, Result,
    TimelineDate, TimelineError,
};

/// A symbolic date reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Keyword {
    /// The visitor's current date
    #[display(fmt = "current")]
    Current,
    /// The site-wide default date
    #[display(fmt = "default")]
    Default,
    /// The earliest defined date
    #[display(fmt = "first")]
    First,
    /// The latest defined date
    #[display(fmt = "last")]
    Last,
}

impl Keyword {
    /// Recognises a keyword token; anything else is treated as a literal date.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            KEYWORD_CURRENT => Some(Self::Current),
            KEYWORD_DEFAULT => Some(Self::Default),
            KEYWORD_FIRST => Some(Self::First),
            KEYWORD_LAST => Some(Self::Last),
            _ => None,
        }
    }

    /// Whether the keyword depends on the published/unpublished choice
    pub const fn is_defined_date(self) -> bool {
        matches!(self, Self::First | Self::Last)
    }
}

/// Either an unresolved token (a keyword or a storage-format date string) or
/// an already-resolved date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateRef {
    Token(String),
    Resolved(TimelineDate),
}

impl Default for DateRef {
    fn default() -> Self {
        Self::Token(KEYWORD_CURRENT.to_owned())
    }
}

impl From<&str> for DateRef {
    fn from(token: &str) -> Self {
        Self::Token(token.to_owned())
    }
}

impl From<String> for DateRef {
    fn from(token: String) -> Self {
        Self::Token(token)
    }
}

impl From<&String> for DateRef {
    fn from(token: &String) -> Self {
        Self::Token(token.clone())
    }
}

impl From<TimelineDate> for DateRef {
    fn from(date: TimelineDate) -> Self {
        Self::Resolved(date)
    }
}

impl From<Keyword> for DateRef {
    fn from(keyword: Keyword) -> Self {
        Self::Token(keyword.to_string())
    }
}

impl DateRef {
    pub fn keyword(&self) -> Option<Keyword> {
        match self {
            Self::Token(token) => Keyword::from_token(token),
            Self::Resolved(_) => None,
        }
    }

    /// An empty token, meaning "no date given"
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Token(token) if token.is_empty())
    }
}

/// Turns [`DateRef`]s into concrete dates for one unit of work.
pub struct DateResolver<'a> {
    defined: DefinedDates<'a>,
    default: DefaultDate<'a>,
    current: CurrentDate<'a>,
}

impl<'a> DateResolver<'a> {
    pub fn new(defined: DefinedDates<'a>, default: DefaultDate<'a>, current: CurrentDate<'a>) -> Self {
        Self {
            defined,
            default,
            current,
        }
    }

    /// Resolves a keyword or date string.
    ///
    /// `include_unpublished` only matters for `first` and `last`; the current
    /// and default dates are not qualified by publication state.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidArgument` for a token that is neither a
    /// keyword nor a storage-format date, and propagates the failures of the
    /// holder or cache a keyword delegates to.
    pub fn resolve(&mut self, date: impl Into<DateRef>, include_unpublished: bool) -> Result<TimelineDate> {
        let token = match date.into() {
            DateRef::Resolved(date) => return Ok(date),
            DateRef::Token(token) => token,
        };

        let stored = match Keyword::from_token(&token) {
            Some(Keyword::Current) => return self.current.get(&mut self.default),
            Some(Keyword::Default) => return self.default.get(),
            Some(Keyword::First) => self.defined.first(include_unpublished)?,
            Some(Keyword::Last) => self.defined.last(include_unpublished)?,
            None => token,
        };
        TimelineDate::parse(&stored).map_err(|e| TimelineError::invalid_argument(&stored, e))
    }

    pub fn defined_dates(&mut self) -> &mut DefinedDates<'a> {
        &mut self.defined
    }

    pub fn default_date(&mut self) -> &mut DefaultDate<'a> {
        &mut self.default
    }

    pub fn current_date(&mut self) -> &mut CurrentDate<'a> {
        &mut self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Fixture, date};

    #[test]
    fn test_keyword_tokens() {
        assert_eq!(Keyword::from_token("current"), Some(Keyword::Current));
        assert_eq!(Keyword::from_token("default"), Some(Keyword::Default));
        assert_eq!(Keyword::from_token("first"), Some(Keyword::First));
        assert_eq!(Keyword::from_token("last"), Some(Keyword::Last));
        assert_eq!(Keyword::from_token("First"), None);
        assert_eq!(Keyword::from_token("2049-10-01"), None);

        for keyword in [Keyword::Current, Keyword::Default, Keyword::First, Keyword::Last] {
            assert_eq!(Keyword::from_token(&keyword.to_string()), Some(keyword));
        }
    }

    #[test]
    fn test_date_ref_conversions() {
        assert_eq!(DateRef::default(), DateRef::Token("current".to_owned()));
        assert_eq!(DateRef::from(Keyword::Last).keyword(), Some(Keyword::Last));
        assert_eq!(DateRef::from("2049-10-01").keyword(), None);
        assert_eq!(DateRef::from(date("2049-10-01")).keyword(), None);
        assert!(DateRef::from("").is_empty());
        assert!(!DateRef::from("first").is_empty());
    }

    #[test]
    fn test_resolve_literal_and_resolved() {
        let fixture = Fixture::new();
        let mut resolver = fixture.resolver();

        assert_eq!(resolver.resolve("2049-10-05", false).unwrap(), date("2049-10-05"));
        assert_eq!(resolver.resolve(date("2049-10-06"), false).unwrap(), date("2049-10-06"));
    }

    #[test]
    fn test_resolve_invalid_token() {
        let fixture = Fixture::new();
        let mut resolver = fixture.resolver();

        for token in ["2049-13-40", "tomorrow", "", "Last"] {
            assert!(
                matches!(
                    resolver.resolve(token, false),
                    Err(TimelineError::InvalidArgument { token: t, .. }) if t == token
                ),
                "{token:?} should not resolve"
            );
        }
    }

    #[test]
    fn test_resolve_first_and_last() {
        let fixture = Fixture::new();
        let mut resolver = fixture.resolver();

        assert_eq!(resolver.resolve("first", false).unwrap(), date("2049-09-29"));
        assert_eq!(resolver.resolve("first", true).unwrap(), date("2049-09-28"));
        assert_eq!(resolver.resolve("last", true).unwrap(), date("2049-09-29"));
        assert_eq!(resolver.resolve(Keyword::Last, false).unwrap(), date("2049-09-29"));
    }

    #[test]
    fn test_resolve_first_with_no_published_dates() {
        let fixture = Fixture::unpublished_only();
        let mut resolver = fixture.resolver();

        assert!(matches!(
            resolver.resolve("first", false),
            Err(TimelineError::Empty { first: true, .. })
        ));
        assert_eq!(resolver.resolve("first", true).unwrap(), date("2049-09-28"));
    }

    #[test]
    fn test_resolve_default_and_current() {
        let fixture = Fixture::new();
        let mut resolver = fixture.resolver();

        // The fixture's front page is dated 2049-09-29.
        assert_eq!(resolver.resolve("default", false).unwrap(), date("2049-09-29"));
        assert_eq!(resolver.resolve("current", true).unwrap(), date("2049-09-29"));

        resolver.current_date().set("2049-09-28").unwrap();
        assert_eq!(resolver.resolve("current", false).unwrap(), date("2049-09-28"));
        assert_eq!(resolver.resolve("default", false).unwrap(), date("2049-09-29"));
    }

    #[test]
    fn test_include_unpublished_ignored_for_current_and_default() {
        let fixture = Fixture::new();
        let mut resolver = fixture.resolver();
        resolver.default_date().set("2049-09-28").unwrap();

        assert_eq!(
            resolver.resolve("default", false).unwrap(),
            resolver.resolve("default", true).unwrap()
        );
        assert_eq!(
            resolver.resolve("current", false).unwrap(),
            resolver.resolve("current", true).unwrap()
        );
    }
}
