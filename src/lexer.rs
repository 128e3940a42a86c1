use crate::Result;
use crate::error::Error;

/// A raw segment of template source.
///
/// Marker tokens carry the untrimmed inner text between the delimiters plus
/// the byte offset of the opening delimiter, for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Text(&'a str),
    Interp { inner: &'a str, pos: usize },
    Block { inner: &'a str, pos: usize },
}

/// Lazy scanner over template source.
///
/// Recognizes `{{ ... }}` interpolation markers and `{% ... %}` block
/// directive markers; everything else is emitted verbatim as text, including
/// lone `{`, `}`, `%` and `|` characters — no escaping is required. A marker
/// opened without a matching close before end of input fails the scan.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

const INTERP_OPEN: &str = "{{";
const INTERP_CLOSE: &str = "}}";
const BLOCK_OPEN: &str = "{%";
const BLOCK_CLOSE: &str = "%}";

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn marker(&mut self, close: &str) -> Result<(&'a str, usize)> {
        let start = self.pos;
        let body = &self.src[start + 2..];
        match body.find(close) {
            Some(end) => {
                self.pos = start + 2 + end + 2;
                Ok((&body[..end], start))
            }
            None => Err(Error::UnterminatedMarker(format!(
                "'{}' at byte {}",
                &self.src[start..],
                start
            ))),
        }
    }

    fn text(&mut self) -> &'a str {
        let remaining = &self.src[self.pos..];
        let next_interp = remaining.find(INTERP_OPEN).unwrap_or(remaining.len());
        let next_block = remaining.find(BLOCK_OPEN).unwrap_or(remaining.len());
        let stop = std::cmp::min(next_interp, next_block).max(1);
        self.pos += stop;
        &remaining[..stop]
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.src.len() {
            return None;
        }

        let remaining = &self.src[self.pos..];
        if remaining.starts_with(INTERP_OPEN) {
            return Some(
                self.marker(INTERP_CLOSE)
                    .map(|(inner, pos)| Token::Interp { inner, pos }),
            );
        }
        if remaining.starts_with(BLOCK_OPEN) {
            return Some(
                self.marker(BLOCK_CLOSE)
                    .map(|(inner, pos)| Token::Block { inner, pos }),
            );
        }

        Some(Ok(Token::Text(self.text())))
    }
}
