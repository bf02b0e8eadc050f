use super::{ParseErrorKind, ParseRes};
use crate::error::Error;

/// Read position over an ordered sequence of tokens. One token of look-ahead is done by
/// consuming it and pushing it back.
#[derive(Debug, Clone)]
pub struct TokenCursor<'source> {
    tokens: Vec<&'source str>,
    position: usize,
}

impl<'source> TokenCursor<'source> {
    pub fn new(tokens: Vec<&'source str>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.tokens.len() > self.position
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> ParseRes<&'source str> {
        let token = self
            .tokens
            .get(self.position)
            .copied()
            .ok_or_else(|| Error::new(ParseErrorKind::ExhaustedInput))?;
        self.position += 1;
        Ok(token)
    }

    /// Rewinds one token.
    ///
    /// # Panics
    /// When nothing has been consumed yet. The parser only pushes back the token it just read.
    pub fn push_back(&mut self) {
        self.position = self
            .position
            .checked_sub(1)
            .expect("push_back called before any token was consumed");
    }

    pub const fn position(&self) -> usize {
        self.position
    }
}

impl<'source> FromIterator<&'source str> for TokenCursor<'source> {
    fn from_iter<I: IntoIterator<Item = &'source str>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
