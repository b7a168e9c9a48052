use std::str::SplitWhitespace;

/// `Tokens` is the lazy sequence of `(word, 1)` pairs produced by `tokenize`.
///
/// Tokens are split on any run of whitespace and are never empty. No normalisation is applied,
/// so "Hello" and "hello" are different words.
pub struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (&'a str, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|token| (token, 1))
    }
}

/// `tokenize` splits a line of text into `(word, 1)` pairs.
pub fn tokenize(line: &str) -> Tokens {
    Tokens { inner: line.split_whitespace() }
}
