//! Splitting a tokenized line into sub-commands and extracting redirection
//! clauses.

use crate::lexer::Token;

/// One sub-command ready for external dispatch: the argument vector with any
/// redirection clause stripped out, and the clause's target if one was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Arguments in order; argument 0 is the command name.
    pub argv: Vec<String>,
    /// Redirection target for both output streams, if a clause was present.
    pub redirect: Option<String>,
}

/// A malformed redirection clause.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The `>` symbol was the first token of the sub-command.
    RedirectWithoutCommand,
    /// Nothing followed the `>` symbol, or another `>` did.
    MissingRedirectTarget,
    /// More tokens followed the redirection filename.
    TrailingRedirectTokens,
}

/// Cut a token sequence into sub-command groups at each `&`.
///
/// Empty groups (leading, trailing, or doubled separators) dispatch nothing
/// and are dropped here.
pub fn split_commands(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();

    for token in tokens {
        match token {
            Token::Parallel => {
                if !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                }
            }
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Strip and validate the redirection clause of one sub-command group.
///
/// The clause grammar is strict: `>` must not open the group, exactly one
/// filename token must follow it, and nothing may follow the filename.
pub fn parse_command(tokens: &[Token]) -> Result<Command, ParseError> {
    let mut argv = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Redirect => {
                if index == 0 {
                    return Err(ParseError::RedirectWithoutCommand);
                }
                let target = match tokens.get(index + 1) {
                    Some(Token::Word(target)) => target.clone(),
                    _ => return Err(ParseError::MissingRedirectTarget),
                };
                if tokens.len() > index + 2 {
                    return Err(ParseError::TrailingRedirectTokens);
                }
                return Ok(Command {
                    argv,
                    redirect: Some(target),
                });
            }
            other => argv.push(other.text().to_string()),
        }
    }

    Ok(Command {
        argv,
        redirect: None,
    })
}
