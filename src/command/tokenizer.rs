//! Shell-like splitting of the free-text switches and tasks fields.

const DELIMITERS: &[char] = &[' ', '\t', '\n', '\r', '\u{000C}'];

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Between,
    Token,
    Quoted(char),
}

/// Splits `s` on whitespace, keeping single- or double-quoted segments
/// intact.
///
/// Quotes may open in the middle of a token (`-Dmsg="a b"` yields
/// `-Dmsg=a b`). Backslash escapes are only honoured inside quotes, so
/// Windows paths outside quotes pass through unchanged.
pub fn tokenize(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut state = State::Between;
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        match state {
            State::Between | State::Token if DELIMITERS.contains(&c) => {
                if state == State::Token {
                    tokens.push(std::mem::take(&mut token));
                }
                state = State::Between;
            }
            State::Between | State::Token if c == '"' || c == '\'' => {
                state = State::Quoted(c);
            }
            State::Between | State::Token => {
                token.push(c);
                state = State::Token;
            }
            State::Quoted(quote) if c == quote => {
                // An empty quoted string still produces a token.
                state = State::Token;
            }
            State::Quoted(_) if c == '\\' => match chars.next() {
                Some(escaped) => token.push(unescape(escaped)),
                None => token.push('\\'),
            },
            State::Quoted(_) => token.push(c),
        }
    }

    if state != State::Between {
        tokens.push(token);
    }
    tokens
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'f' => '\u{000C}',
        'b' => '\u{0008}',
        other => other,
    }
}
