use std::error;
use std::fmt;

/// An error of some kind `T` together with the stack of things the compiler was doing when it
/// happened, innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error<T> {
    pub kind: T,
    contexts: Vec<&'static str>,
}

impl<T> Error<T> {
    pub const fn new(kind: T) -> Self {
        Self {
            kind,
            contexts: Vec::new(),
        }
    }
    pub fn map_kind<F, U>(self, mapper: F) -> Error<U>
    where
        F: Fn(T) -> U,
    {
        Error {
            kind: mapper(self.kind),
            contexts: self.contexts,
        }
    }
    #[must_use]
    pub fn add_context(mut self, ctx: &'static str) -> Self {
        self.contexts.push(ctx);
        self
    }
    pub fn contexts(&self) -> &[&'static str] {
        &self.contexts
    }
}

impl<T> From<T> for Error<T> {
    fn from(kind: T) -> Self {
        Self::new(kind)
    }
}

impl<T: error::Error + 'static> error::Error for Error<T> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<T: fmt::Display> fmt::Display for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let whiles = self
            .contexts
            .iter()
            .copied()
            .fold(String::new(), |acc, next| acc + "\nwhile " + next);
        write!(f, "{}{}", self.kind, whiles)
    }
}
