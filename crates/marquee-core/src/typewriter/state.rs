/// Cursor over the text being typed
///
/// `cursor` always equals the number of characters revealed so far, and the
/// revealed text is always a prefix of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypewriterState {
    source: Vec<char>,
    cursor: usize,
}

impl TypewriterState {
    pub fn new(text: &str) -> Self {
        Self {
            source: text.chars().collect(),
            cursor: 0,
        }
    }

    /// Advance by one character, returning it
    ///
    /// Returns `None` once every character has been revealed.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.source.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(ch)
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.cursor == self.source.len()
    }

    pub fn revealed(&self) -> String {
        self.source[..self.cursor].iter().collect()
    }

    pub fn source(&self) -> String {
        self.source.iter().collect()
    }
}
