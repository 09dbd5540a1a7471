//! The result of running a chain.

/// What a chain (or a single layer) resolved to.
///
/// `NoMatch` is not an error: it means no registered layer produced a value
/// for the request. The terminal request handler turns it into the
/// not-found fallback; mounted routers turn it into "advance to the next
/// sibling layer".
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<V> {
    /// A handler produced this value.
    Value(V),
    /// Every matching layer passed the request on and none produced a value.
    NoMatch,
}

impl<V> Outcome<V> {
    /// Returns `true` for [`Outcome::NoMatch`].
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Outcome::NoMatch)
    }

    /// Returns `true` for [`Outcome::Value`].
    pub const fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    /// Borrow the produced value, if any.
    pub const fn value(&self) -> Option<&V> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::NoMatch => None,
        }
    }

    /// Take the produced value, if any.
    pub fn into_value(self) -> Option<V> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::NoMatch => None,
        }
    }

    /// Transform the produced value, leaving `NoMatch` as is.
    pub fn map<U, F: FnOnce(V) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Value(v) => Outcome::Value(f(v)),
            Outcome::NoMatch => Outcome::NoMatch,
        }
    }

    /// Return the value or `default` when nothing matched.
    pub fn unwrap_or(self, default: V) -> V {
        match self {
            Outcome::Value(v) => v,
            Outcome::NoMatch => default,
        }
    }
}

impl<V> From<V> for Outcome<V> {
    fn from(value: V) -> Self {
        Outcome::Value(value)
    }
}
