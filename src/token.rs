//! Token kinds and the emitter boundary.
//!
//! `TokenKind` is a small hierarchical taxonomy in the Pygments tradition:
//! every kind has an optional parent (`Keyword.Declaration` is a `Keyword`),
//! and its dotted `name()` is what renderers key their styles on.
//!
//! Tokens are never collected by the engine. They are pushed, in order, into
//! an [`Emitter`] supplied by the caller.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    /// Fallback for input no rule covers (lenient scans only).
    Error,

    Keyword,
    KeywordConstant,
    KeywordDeclaration,
    KeywordNamespace,
    KeywordType,

    Name,
    NameAttribute,
    NameClass,
    NameDecorator,
    NameFunction,
    NameLabel,
    NameNamespace,

    Literal,
    LiteralString,
    LiteralStringChar,
    LiteralNumber,
    LiteralNumberHex,
    LiteralNumberInteger,

    Comment,
    CommentSingle,
    CommentMultiline,

    Operator,
    Punctuation,
}

impl TokenKind {
    /// The next more generic kind, or `None` for a top-level kind.
    pub fn parent(self) -> Option<TokenKind> {
        use TokenKind::*;
        match self {
            Text | Error | Keyword | Name | Literal | Comment | Operator | Punctuation => None,
            KeywordConstant | KeywordDeclaration | KeywordNamespace | KeywordType => Some(Keyword),
            NameAttribute | NameClass | NameDecorator | NameFunction | NameLabel | NameNamespace => Some(Name),
            LiteralString | LiteralNumber => Some(Literal),
            LiteralStringChar => Some(LiteralString),
            LiteralNumberHex | LiteralNumberInteger => Some(LiteralNumber),
            CommentSingle | CommentMultiline => Some(Comment),
        }
    }

    /// Returns true when `self` is `ancestor` or one of its descendants.
    pub fn is_a(self, ancestor: TokenKind) -> bool {
        let mut kind = Some(self);
        while let Some(k) = kind {
            if k == ancestor {
                return true;
            }
            kind = k.parent();
        }
        false
    }

    /// Last segment of the dotted name.
    fn leaf(self) -> &'static str {
        use TokenKind::*;
        match self {
            Text => "Text",
            Error => "Error",
            Keyword => "Keyword",
            KeywordConstant => "Constant",
            KeywordDeclaration => "Declaration",
            KeywordNamespace | NameNamespace => "Namespace",
            KeywordType => "Type",
            Name => "Name",
            NameAttribute => "Attribute",
            NameClass => "Class",
            NameDecorator => "Decorator",
            NameFunction => "Function",
            NameLabel => "Label",
            Literal => "Literal",
            LiteralString => "String",
            LiteralStringChar => "Char",
            LiteralNumber => "Number",
            LiteralNumberHex => "Hex",
            LiteralNumberInteger => "Integer",
            Comment => "Comment",
            CommentSingle => "Single",
            CommentMultiline => "Multiline",
            Operator => "Operator",
            Punctuation => "Punctuation",
        }
    }

    /// Dotted name, e.g. `"Literal.Number.Hex"`.
    pub fn name(self) -> String {
        match self.parent() {
            Some(parent) => format!("{}.{}", parent.name(), self.leaf()),
            None => self.leaf().to_string(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A classified lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token { kind, text: text.into() }
    }
}

/// Failure reported by an [`Emitter`].
///
/// The sink's own error is boxed and handed back untouched through
/// [`EmitError::into_inner`], so callers can downcast to what they produced.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct EmitError(Box<dyn Error + Send + Sync>);

impl EmitError {
    pub fn new(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        EmitError(err.into())
    }

    pub fn into_inner(self) -> Box<dyn Error + Send + Sync> {
        self.0
    }
}

/// Sink for the ordered token stream.
///
/// Returning an error aborts the scan immediately; tokens already emitted
/// stay emitted.
pub trait Emitter {
    fn emit(&mut self, kind: TokenKind, text: &str) -> Result<(), EmitError>;
}

impl Emitter for Vec<Token> {
    fn emit(&mut self, kind: TokenKind, text: &str) -> Result<(), EmitError> {
        self.push(Token::new(kind, text));
        Ok(())
    }
}

impl<E: Emitter + ?Sized> Emitter for &mut E {
    fn emit(&mut self, kind: TokenKind, text: &str) -> Result<(), EmitError> {
        (**self).emit(kind, text)
    }
}

/// Adapts a closure into an [`Emitter`].
pub struct FnEmitter<F>(pub F);

impl<F> Emitter for FnEmitter<F>
where
    F: FnMut(TokenKind, &str) -> Result<(), EmitError>,
{
    fn emit(&mut self, kind: TokenKind, text: &str) -> Result<(), EmitError> {
        (self.0)(kind, text)
    }
}
