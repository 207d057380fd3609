//! The match outcome and its no-match sentinel.

/// Result of a producer or a match.
///
/// `NoMatch` is the sentinel: as a rule's result it means "this branch
/// declined, keep looking"; as a matcher's final result it means nothing
/// applied. Because it is a separate variant it cannot be confused with any
/// legitimate `R`, including `R` values that look empty or default.
///
/// # Examples
///
/// ```
/// use u_matcher::Outcome;
///
/// let hit: Outcome<&str> = Outcome::Matched("starts with a");
/// assert_eq!(hit.into_option(), Some("starts with a"));
///
/// let miss: Outcome<&str> = Outcome::NoMatch;
/// assert_eq!(miss.unwrap_or("fallback"), "fallback");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<R> {
    /// A rule (or default) produced a value.
    Matched(R),
    /// No applicable rule.
    NoMatch,
}

impl<R> Outcome<R> {
    pub fn is_matched(&self) -> bool {
        matches!(self, Outcome::Matched(_))
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, Outcome::NoMatch)
    }

    /// Converts into an `Option`, mapping the sentinel to `None`.
    pub fn into_option(self) -> Option<R> {
        match self {
            Outcome::Matched(r) => Some(r),
            Outcome::NoMatch => None,
        }
    }

    /// Borrows the matched value, if any.
    pub fn matched(&self) -> Option<&R> {
        match self {
            Outcome::Matched(r) => Some(r),
            Outcome::NoMatch => None,
        }
    }

    pub fn as_ref(&self) -> Outcome<&R> {
        match self {
            Outcome::Matched(r) => Outcome::Matched(r),
            Outcome::NoMatch => Outcome::NoMatch,
        }
    }

    pub fn map<U, F: FnOnce(R) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Matched(r) => Outcome::Matched(f(r)),
            Outcome::NoMatch => Outcome::NoMatch,
        }
    }

    pub fn unwrap_or(self, fallback: R) -> R {
        self.into_option().unwrap_or(fallback)
    }

    pub fn unwrap_or_else<F: FnOnce() -> R>(self, fallback: F) -> R {
        self.into_option().unwrap_or_else(fallback)
    }
}

impl<R> From<Option<R>> for Outcome<R> {
    fn from(value: Option<R>) -> Self {
        match value {
            Some(r) => Outcome::Matched(r),
            None => Outcome::NoMatch,
        }
    }
}

impl<R> From<Outcome<R>> for Option<R> {
    fn from(outcome: Outcome<R>) -> Self {
        outcome.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_distinct_from_empty_value() {
        let empty: Outcome<String> = Outcome::Matched(String::new());
        let none: Outcome<String> = Outcome::NoMatch;
        assert_ne!(empty, none);
        assert!(empty.is_matched());
        assert!(none.is_no_match());
    }

    #[test]
    fn test_option_round_trip() {
        assert_eq!(Outcome::from(Some(3)), Outcome::Matched(3));
        assert_eq!(Outcome::<i32>::from(None), Outcome::NoMatch);
        let opt: Option<i32> = Outcome::Matched(5).into();
        assert_eq!(opt, Some(5));
    }

    #[test]
    fn test_map_and_ref() {
        let outcome = Outcome::Matched(2).map(|x| x * 10);
        assert_eq!(outcome, Outcome::Matched(20));
        assert_eq!(outcome.as_ref().matched(), Some(&&20));
        assert_eq!(Outcome::<i32>::NoMatch.map(|x| x + 1), Outcome::NoMatch);
        assert_eq!(Outcome::<i32>::NoMatch.unwrap_or_else(|| 7), 7);
    }
}
