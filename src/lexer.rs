//! Tokenization of one input line.
//!
//! A line is split on whitespace and on the two special symbols, which form
//! tokens of their own whether or not they are surrounded by whitespace:
//! `ls>out` and `ls > out` tokenize identically.

/// One lexical unit of an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A plain word: command name, argument, or redirection target.
    Word(String),
    /// The parallel separator `&`, ending one sub-command.
    Parallel,
    /// The output redirection symbol `>`.
    Redirect,
}

impl Token {
    /// The token as it was spelled on the line.
    pub fn text(&self) -> &str {
        match self {
            Token::Word(word) => word,
            Token::Parallel => "&",
            Token::Redirect => ">",
        }
    }
}

/// Split a raw line into tokens. An empty or all-whitespace line yields no
/// tokens.
pub fn split_into_tokens(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    let flush = |word: &mut String, tokens: &mut Vec<Token>| {
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(word)));
        }
    };

    for ch in line.chars() {
        match ch {
            c if c.is_whitespace() => flush(&mut word, &mut tokens),
            '&' => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::Parallel);
            }
            '>' => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::Redirect);
            }
            c => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);

    tokens
}
