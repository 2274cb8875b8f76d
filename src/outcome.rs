/// Result of trying one layout against an archive.
///
/// `NoMatch` means "this layout does not apply, try the next one".
/// `Conflict` means "this layout applies but the content is wrong" and stops
/// the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    NoMatch,
    Conflict(String),
}

impl<T> Outcome<T> {
    pub fn is_no_match(&self) -> bool {
        matches!(self, Outcome::NoMatch)
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::NoMatch => Outcome::NoMatch,
            Outcome::Conflict(reason) => Outcome::Conflict(reason),
        }
    }

    /// Falls through to `next` only on `NoMatch`.
    pub fn or_else<F>(self, next: F) -> Outcome<T>
    where
        F: FnOnce() -> Outcome<T>,
    {
        match self {
            Outcome::NoMatch => next(),
            decided => decided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_else_only_falls_through_on_no_match() {
        let tried = Outcome::<u8>::NoMatch.or_else(|| Outcome::Success(2));
        assert_eq!(tried, Outcome::Success(2));

        let stopped = Outcome::<u8>::Conflict("mixed".into()).or_else(|| Outcome::Success(2));
        assert_eq!(stopped, Outcome::Conflict("mixed".into()));

        let kept = Outcome::Success(1).or_else(|| Outcome::Success(2));
        assert_eq!(kept, Outcome::Success(1));
    }

    #[test]
    fn test_map_keeps_conflict_reason() {
        let out = Outcome::<u8>::Conflict("bad".into()).map(|v| v + 1);
        assert_eq!(out, Outcome::Conflict("bad".into()));
        assert_eq!(Outcome::Success(1).map(|v| v * 10), Outcome::Success(10));
        assert!(Outcome::<u8>::NoMatch.map(|v| v + 1).is_no_match());
    }
}
