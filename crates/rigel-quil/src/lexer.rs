//! Lexer for Quil source.
//!
//! Quil is line-oriented, so newlines are significant tokens rather than
//! skipped whitespace.

use logos::Logos;

/// Tokens for Quil.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Keywords
    #[token("DECLARE")]
    Declare,

    #[token("MEASURE")]
    Measure,

    #[token("PRAGMA")]
    Pragma,

    #[token("RESET")]
    Reset,

    #[token("BIT")]
    Bit,

    // Constants
    #[token("pi")]
    Pi,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    // Identifiers (gate and region names)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Punctuation
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("\n")]
    Newline,
}

impl Token {
    /// Short description used in parser error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Declare => "DECLARE".into(),
            Token::Measure => "MEASURE".into(),
            Token::Pragma => "PRAGMA".into(),
            Token::Reset => "RESET".into(),
            Token::Bit => "BIT".into(),
            Token::Pi => "pi".into(),
            Token::FloatLiteral(v) => format!("float {v}"),
            Token::IntLiteral(v) => format!("integer {v}"),
            Token::StringLiteral(s) => format!("string \"{s}\""),
            Token::Identifier(name) => format!("identifier '{name}'"),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::LBracket => "'['".into(),
            Token::RBracket => "']'".into(),
            Token::Comma => "','".into(),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Newline => "newline".into(),
        }
    }
}
