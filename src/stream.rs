//! Lazy, pull-based streams of [`Token`]s.
//!
//! A [`TokenStream`] has a single operation: pull the next token, or learn
//! that the stream has ended. Streams cannot be rewound, to traverse a
//! document again a new stream must be made. Once a stream reports its end it
//! keeps doing so.
//!
//! Two combinators build bigger streams out of smaller ones without buffering
//! any tokens: [`Flatten`] concatenates a sequence of streams, and
//! [`Surround`] puts a token either side of a stream. Together they are enough
//! to express any tree as a stream, see [`ToTokens`][crate::ToTokens].
//!
//! ```
//! use nbtstream::stream::{self, Flatten, Surround, Tokens, TokenStream};
//! use nbtstream::Token;
//!
//! # fn main() -> nbtstream::error::Result<()> {
//! let inner = Flatten::new(vec![
//!     Tokens::from(vec![Token::Int(1), Token::Int(2)]),
//!     Tokens::from(vec![]),
//!     Tokens::from(vec![Token::Int(3)]),
//! ]);
//! let list = Surround::new(
//!     Token::ListStart { size: 3, element_kind: nbtstream::TagKind::Int },
//!     inner,
//!     Token::ListEnd,
//! );
//!
//! let tokens = stream::collect_tokens(list)?;
//! assert_eq!(tokens.len(), 5);
//! # Ok(())
//! # }
//! ```
//!
//! Streams are single-consumer. Nothing here locks, a stream shared between
//! threads must be synchronised by the caller.

use crate::error::{Error, Result};
use crate::Token;

/// A stream of tokens that is pulled one token at a time.
pub trait TokenStream {
    /// Pull the next token. `Ok(None)` marks the end of the stream, and every
    /// later call returns `Ok(None)` as well.
    fn next_token(&mut self) -> Result<Option<Token>>;

    /// Adapt this stream into an [`Iterator`] of results. The iterator stops
    /// after the first error.
    fn iter_tokens(self) -> IterTokens<Self>
    where
        Self: Sized,
    {
        IterTokens {
            stream: self,
            done: false,
        }
    }
}

/// An owned, type erased stream.
pub type BoxStream<'a> = Box<dyn TokenStream + 'a>;

impl<S: TokenStream + ?Sized> TokenStream for &mut S {
    fn next_token(&mut self) -> Result<Option<Token>> {
        (**self).next_token()
    }
}

impl<S: TokenStream + ?Sized> TokenStream for Box<S> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        (**self).next_token()
    }
}

#[derive(Debug)]
enum State {
    NeedNext,
    Ready(Token),
    Ended,
}

/// Wraps a stream with a single token of lookahead.
///
/// The next token is only computed when asked for, either by
/// [`has_next`][Lookahead::has_next], [`peek`][Lookahead::peek] or
/// [`next_token`][TokenStream::next_token], and is computed at most once.
#[derive(Debug)]
pub struct Lookahead<S> {
    inner: S,
    state: State,
}

impl<S: TokenStream> Lookahead<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: State::NeedNext,
        }
    }

    /// Whether another token is available.
    pub fn has_next(&mut self) -> Result<bool> {
        self.fill()?;
        Ok(matches!(self.state, State::Ready(_)))
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Result<Option<&Token>> {
        self.fill()?;
        Ok(match &self.state {
            State::Ready(token) => Some(token),
            _ => None,
        })
    }

    /// Consumes the lookahead, returning the wrapped stream. A token that has
    /// been peeked but not consumed is lost.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn fill(&mut self) -> Result<()> {
        if let State::NeedNext = self.state {
            self.state = match self.inner.next_token()? {
                Some(token) => State::Ready(token),
                None => State::Ended,
            };
        }
        Ok(())
    }
}

impl<S: TokenStream> TokenStream for Lookahead<S> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.fill()?;
        match std::mem::replace(&mut self.state, State::NeedNext) {
            State::Ready(token) => Ok(Some(token)),
            // fill never leaves us in NeedNext, so this is the end.
            _ => {
                self.state = State::Ended;
                Ok(None)
            }
        }
    }
}

/// Concatenates streams. Each sub-stream is pulled to exhaustion before the
/// next one is started, and empty sub-streams contribute nothing.
pub struct Flatten<I: Iterator> {
    streams: std::iter::Fuse<I>,
    current: Option<Lookahead<I::Item>>,
}

impl<I> Flatten<I>
where
    I: Iterator,
    I::Item: TokenStream,
{
    pub fn new(streams: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            streams: streams.into_iter().fuse(),
            current: None,
        }
    }
}

impl<I> TokenStream for Flatten<I>
where
    I: Iterator,
    I::Item: TokenStream,
{
    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            if let Some(current) = &mut self.current {
                if current.has_next()? {
                    return current.next_token();
                }
                self.current = None;
            }

            match self.streams.next() {
                Some(stream) => self.current = Some(Lookahead::new(stream)),
                None => return Ok(None),
            }
        }
    }
}

/// Emits an optional prefix token, then every token of the wrapped stream,
/// then an optional suffix token once the wrapped stream has ended.
pub struct Surround<S> {
    prefix: Option<Token>,
    inner: Lookahead<S>,
    suffix: Option<Token>,
}

impl<S: TokenStream> Surround<S> {
    pub fn new(prefix: Token, inner: S, suffix: Token) -> Self {
        Self::with(Some(prefix), inner, Some(suffix))
    }

    pub fn prefix(prefix: Token, inner: S) -> Self {
        Self::with(Some(prefix), inner, None)
    }

    pub fn suffix(inner: S, suffix: Token) -> Self {
        Self::with(None, inner, Some(suffix))
    }

    pub fn with(prefix: Option<Token>, inner: S, suffix: Option<Token>) -> Self {
        Self {
            prefix,
            inner: Lookahead::new(inner),
            suffix,
        }
    }
}

impl<S: TokenStream> TokenStream for Surround<S> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(prefix) = self.prefix.take() {
            return Ok(Some(prefix));
        }
        if self.inner.has_next()? {
            return self.inner.next_token();
        }
        Ok(self.suffix.take())
    }
}

/// A stream over tokens that are already in memory.
#[derive(Debug, Clone)]
pub struct Tokens {
    tokens: std::vec::IntoIter<Token>,
}

impl From<Vec<Token>> for Tokens {
    fn from(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }
}

impl TokenStream for Tokens {
    fn next_token(&mut self) -> Result<Option<Token>> {
        Ok(self.tokens.next())
    }
}

/// A stream with no tokens.
pub fn empty() -> Tokens {
    Tokens::from(vec![])
}

/// A stream of exactly one token.
pub fn once(token: Token) -> Tokens {
    Tokens::from(vec![token])
}

/// Iterator adapter returned by [`TokenStream::iter_tokens`].
pub struct IterTokens<S> {
    stream: S,
    done: bool,
}

impl<S: TokenStream> Iterator for IterTokens<S> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Pull every remaining token into a `Vec`.
pub fn collect_tokens<S: TokenStream>(mut stream: S) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    while let Some(token) = stream.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Pull tokens until the compound we are currently inside is complete. Inner
/// compounds are skipped as well.
pub fn skip_compound<S: TokenStream>(mut stream: S) -> Result<()> {
    let mut depth = 1;

    while depth != 0 {
        match stream.next_token()? {
            Some(Token::CompoundEnd) => depth -= 1,
            Some(Token::CompoundStart) => depth += 1,
            Some(_) => {}
            None => return Err(Error::unexpected_end("compound end")),
        }
    }
    Ok(())
}
