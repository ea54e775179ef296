//! # Lexer
//!
//! This module provides the lexical analysis (tokenization) functionality
//! for FQL queries.

use chumsky::{extra, prelude::*};

/// Represents a token in the FQL query language.
///
/// Keywords are uppercase and case-sensitive; any other word is an
/// identifier. String literals carry their unquoted content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// The SELECT keyword.
    Select,
    /// The EDIT keyword.
    Edit,
    /// The ADD keyword.
    Add,
    /// The APPEND keyword.
    Append,
    /// The PREPEND keyword.
    Prepend,
    /// The DELETE keyword.
    Delete,
    /// The MERGE keyword.
    Merge,
    /// The SPLIT keyword.
    Split,
    /// The DECLARE keyword.
    Declare,
    /// The OF keyword.
    Of,
    /// The ID keyword.
    Id,
    /// The WHERE keyword.
    Where,
    /// The WITH keyword.
    With,
    /// The FOR keyword.
    For,
    /// The IN keyword.
    In,
    /// The SPAN keyword.
    Span,
    /// The RESPAN keyword.
    Respan,
    /// The AS keyword.
    As,
    /// The ALTERNATIVE keyword.
    Alternative,
    /// The BARE keyword.
    Bare,
    /// The CORRECTION keyword.
    Correction,
    /// The SUGGESTION keyword.
    Suggestion,
    /// The HAS keyword.
    Has,
    /// The NOT keyword.
    Not,
    /// The AND keyword.
    And,
    /// The OR keyword.
    Or,
    /// The NEXT keyword.
    Next,
    /// The PREVIOUS keyword.
    Previous,
    /// The PARENT keyword.
    Parent,
    /// The CHILD keyword.
    Child,
    /// The ANCESTOR keyword.
    Ancestor,
    /// The LEFTCONTEXT keyword.
    LeftContext,
    /// The RIGHTCONTEXT keyword.
    RightContext,
    /// The CONTEXT keyword.
    Context,
    /// The CONTAINS operator keyword.
    Contains,
    /// The MATCHES operator keyword.
    Matches,
    /// The RETURN keyword.
    Return,
    /// The FORMAT keyword.
    Format,
    /// The REQUEST keyword.
    Request,
    /// The `=` / `==` operator.
    Equals,
    /// The `!=` operator.
    NotEquals,
    /// The `>` operator.
    Greater,
    /// The `<` operator.
    Less,
    /// The `>=` operator.
    GreaterEquals,
    /// The `<=` operator.
    LessEquals,
    /// An opening parenthesis.
    OpenParen,
    /// A closing parenthesis.
    CloseParen,
    /// A comma separating targets.
    Comma,
    /// An ampersand joining span members.
    Ampersand,
    /// An identifier (element tag, attribute name, set, id, ...).
    Ident(String),
    /// A double-quoted string literal, unquoted.
    StringLit(String),
    /// A numeric literal, kept as written.
    Number(String),
    /// The `:tag` shorthand for a HAS class filter.
    Shorthand(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Select => write!(f, "SELECT"),
            Token::Edit => write!(f, "EDIT"),
            Token::Add => write!(f, "ADD"),
            Token::Append => write!(f, "APPEND"),
            Token::Prepend => write!(f, "PREPEND"),
            Token::Delete => write!(f, "DELETE"),
            Token::Merge => write!(f, "MERGE"),
            Token::Split => write!(f, "SPLIT"),
            Token::Declare => write!(f, "DECLARE"),
            Token::Of => write!(f, "OF"),
            Token::Id => write!(f, "ID"),
            Token::Where => write!(f, "WHERE"),
            Token::With => write!(f, "WITH"),
            Token::For => write!(f, "FOR"),
            Token::In => write!(f, "IN"),
            Token::Span => write!(f, "SPAN"),
            Token::Respan => write!(f, "RESPAN"),
            Token::As => write!(f, "AS"),
            Token::Alternative => write!(f, "ALTERNATIVE"),
            Token::Bare => write!(f, "BARE"),
            Token::Correction => write!(f, "CORRECTION"),
            Token::Suggestion => write!(f, "SUGGESTION"),
            Token::Has => write!(f, "HAS"),
            Token::Not => write!(f, "NOT"),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Next => write!(f, "NEXT"),
            Token::Previous => write!(f, "PREVIOUS"),
            Token::Parent => write!(f, "PARENT"),
            Token::Child => write!(f, "CHILD"),
            Token::Ancestor => write!(f, "ANCESTOR"),
            Token::LeftContext => write!(f, "LEFTCONTEXT"),
            Token::RightContext => write!(f, "RIGHTCONTEXT"),
            Token::Context => write!(f, "CONTEXT"),
            Token::Contains => write!(f, "CONTAINS"),
            Token::Matches => write!(f, "MATCHES"),
            Token::Return => write!(f, "RETURN"),
            Token::Format => write!(f, "FORMAT"),
            Token::Request => write!(f, "REQUEST"),
            Token::Equals => write!(f, "="),
            Token::NotEquals => write!(f, "!="),
            Token::Greater => write!(f, ">"),
            Token::Less => write!(f, "<"),
            Token::GreaterEquals => write!(f, ">="),
            Token::LessEquals => write!(f, "<="),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Ampersand => write!(f, "&"),
            Token::Ident(s) => write!(f, "{}", s),
            Token::StringLit(s) => write!(f, "\"{}\"", s),
            Token::Number(s) => write!(f, "{}", s),
            Token::Shorthand(s) => write!(f, ":{}", s),
        }
    }
}

/// A span representing a range of positions in the source input.
pub type Span = SimpleSpan<usize>;

/// A value paired with its span in the source input.
pub type Spanned<T> = (T, Span);

/// Maps an exact uppercase keyword to its token.
fn keyword(word: &str) -> Option<Token> {
    match word {
        "SELECT" => Some(Token::Select),
        "EDIT" => Some(Token::Edit),
        "ADD" => Some(Token::Add),
        "APPEND" => Some(Token::Append),
        "PREPEND" => Some(Token::Prepend),
        "DELETE" => Some(Token::Delete),
        "MERGE" => Some(Token::Merge),
        "SPLIT" => Some(Token::Split),
        "DECLARE" => Some(Token::Declare),
        "OF" => Some(Token::Of),
        "ID" => Some(Token::Id),
        "WHERE" => Some(Token::Where),
        "WITH" => Some(Token::With),
        "FOR" => Some(Token::For),
        "IN" => Some(Token::In),
        "SPAN" => Some(Token::Span),
        "RESPAN" => Some(Token::Respan),
        "AS" => Some(Token::As),
        "ALTERNATIVE" => Some(Token::Alternative),
        "BARE" => Some(Token::Bare),
        "CORRECTION" => Some(Token::Correction),
        "SUGGESTION" => Some(Token::Suggestion),
        "HAS" => Some(Token::Has),
        "NOT" => Some(Token::Not),
        "AND" => Some(Token::And),
        "OR" => Some(Token::Or),
        "NEXT" => Some(Token::Next),
        "PREVIOUS" => Some(Token::Previous),
        "PARENT" => Some(Token::Parent),
        "CHILD" => Some(Token::Child),
        "ANCESTOR" => Some(Token::Ancestor),
        "LEFTCONTEXT" => Some(Token::LeftContext),
        "RIGHTCONTEXT" => Some(Token::RightContext),
        "CONTEXT" => Some(Token::Context),
        "CONTAINS" => Some(Token::Contains),
        "MATCHES" => Some(Token::Matches),
        "RETURN" => Some(Token::Return),
        "FORMAT" => Some(Token::Format),
        "REQUEST" => Some(Token::Request),
        _ => None,
    }
}

/// Creates the main lexer for tokenizing FQL query strings.
///
/// The lexer recognizes uppercase keywords, identifiers (which may contain
/// dots and dashes, as element ids do), numbers, quoted string literals
/// with `\"` escapes, the `:tag` shorthand, comparison operators and
/// punctuation.
///
/// ## Returns
///
/// Returns a parser that transforms a string input into a vector of
/// spanned tokens.
pub fn lexer<'src>()
-> impl Parser<'src, &'src str, Vec<Spanned<Token>>, extra::Err<Rich<'src, char, Span>>> {
    let word_start = |c: &char| c.is_ascii_alphabetic() || *c == '_';
    let word_char = |c: &char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');

    let raw_word = any()
        .filter(word_start)
        .then(any().filter(word_char).repeated().collect::<String>())
        .map(|(first, rest): (char, String)| format!("{}{}", first, rest));

    let word = raw_word
        .clone()
        .map(|s| keyword(&s).unwrap_or(Token::Ident(s)))
        .labelled("word");

    let number = any()
        .filter(|c: &char| c.is_ascii_digit())
        .then(
            any()
                .filter(|c: &char| c.is_ascii_digit() || *c == '.')
                .repeated()
                .collect::<String>(),
        )
        .map(|(first, rest): (char, String)| Token::Number(format!("{}{}", first, rest)))
        .labelled("number");

    let string_lit = just('"')
        .ignore_then(
            choice((just("\\\"").to('"'), none_of('"')))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'))
        .map(Token::StringLit)
        .labelled("string literal");

    let shorthand = just(':')
        .ignore_then(raw_word)
        .map(Token::Shorthand)
        .labelled("shorthand");

    let symbol = choice((
        just("==").to(Token::Equals),
        just("!=").to(Token::NotEquals),
        just(">=").to(Token::GreaterEquals),
        just("<=").to(Token::LessEquals),
        just("=").to(Token::Equals),
        just(">").to(Token::Greater),
        just("<").to(Token::Less),
        just("(").to(Token::OpenParen),
        just(")").to(Token::CloseParen),
        just(",").to(Token::Comma),
        just("&").to(Token::Ampersand),
    ));

    let token = choice((string_lit, shorthand, number, word, symbol));

    token
        .map_with(|tok, e| (tok, e.span()))
        .padded()
        .repeated()
        .collect()
        .then_ignore(end())
}
