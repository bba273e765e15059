//! Tokenizer for command argument parsing.
//!
//! Supports:
//! - Quoted strings (single and double quotes)
//! - Escape sequences within quotes
//! - Key=value pairs, also written as `--key=value`
//! - Flags (`--flag` or `-f`)

use crate::error::{LensError, Result};
use crate::options::OptionArgs;

/// A token parsed from command input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A plain word (unquoted argument).
    Word(String),
    /// A key=value pair.
    KeyValue { key: String, value: String },
    /// A long flag (--flag).
    LongFlag(String),
    /// A short flag (-f).
    ShortFlag(char),
}

impl Token {
    /// Returns the token as a word if it is one.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the key-value pair if this is a KeyValue token.
    pub fn as_key_value(&self) -> Option<(&str, &str)> {
        match self {
            Token::KeyValue { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

/// Tokenizes a command argument string.
///
/// - Double-quoted strings: `"hello world"` → `hello world`
/// - Single-quoted strings: `'hello world'` → `hello world`
/// - Escape sequences in quotes: `"say \"hi\""` → `say "hi"`
/// - Key=value pairs: `format=json` → KeyValue { key: "format", value: "json" }
/// - Long options: `--format=json` → KeyValue, `--no-info` → LongFlag("no-info")
/// - Short flags: `-t` → ShortFlag('t')
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '-' {
            chars.next();
            if let Some(&next) = chars.peek() {
                if next == '-' {
                    chars.next();
                    let word = collect_word_or_quoted(&mut chars);
                    match split_key_value(&word) {
                        Some(token) => tokens.push(token),
                        None if !word.is_empty() => tokens.push(Token::LongFlag(word)),
                        None => {}
                    }
                    continue;
                } else if next.is_alphabetic() {
                    chars.next();
                    if chars.peek().map_or(true, |c| c.is_whitespace()) {
                        tokens.push(Token::ShortFlag(next));
                        continue;
                    }
                    // A dash followed by a longer word, like -abc
                    let mut word = format!("-{next}");
                    word.push_str(&collect_word(&mut chars));
                    tokens.push(Token::Word(word));
                    continue;
                }
            }
            // Just a dash, treat as word
            let mut word = String::from("-");
            word.push_str(&collect_word(&mut chars));
            tokens.push(Token::Word(word));
            continue;
        }

        let word = collect_word_or_quoted(&mut chars);
        if word.is_empty() {
            continue;
        }

        match split_key_value(&word) {
            Some(token) => tokens.push(token),
            None => tokens.push(Token::Word(word)),
        }
    }

    tokens
}

/// Splits `key=value` at the first `=`. Values keep any further `=` signs.
fn split_key_value(word: &str) -> Option<Token> {
    let eq_pos = word.find('=')?;
    if eq_pos == 0 {
        return None;
    }
    Some(Token::KeyValue {
        key: word[..eq_pos].to_string(),
        value: word[eq_pos + 1..].to_string(),
    })
}

/// Collects characters until whitespace or end of input.
fn collect_word(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut word = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            break;
        }
        chars.next();
        word.push(c);
    }
    word
}

/// Collects a word, handling quoted strings.
fn collect_word_or_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut result = String::new();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            break;
        }

        if c == '"' || c == '\'' {
            chars.next();
            let quoted = collect_quoted(chars, c);
            result.push_str(&quoted);
            continue;
        }

        chars.next();
        result.push(c);
    }

    result
}

/// Collects characters inside quotes, handling escape sequences.
fn collect_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) -> String {
    let mut result = String::new();
    let mut escaped = false;

    for c in chars.by_ref() {
        if escaped {
            match c {
                'n' => result.push('\n'),
                't' => result.push('\t'),
                'r' => result.push('\r'),
                '\\' => result.push('\\'),
                '"' => result.push('"'),
                '\'' => result.push('\''),
                _ => {
                    // Unknown escape, keep as-is (regex classes like \d)
                    result.push('\\');
                    result.push(c);
                }
            }
            escaped = false;
            continue;
        }

        if c == '\\' {
            escaped = true;
            continue;
        }

        if c == quote {
            break;
        }

        result.push(c);
    }

    result
}

/// Bare words and normalized key/value arguments of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub words: Vec<String>,
    pub args: OptionArgs,
}

/// Tokenizes `input` and sorts the tokens into words and arguments.
///
/// `--flag` becomes `flag=true`. Short flags are rejected.
pub fn parse_args(input: &str) -> Result<ParsedArgs> {
    let mut parsed = ParsedArgs::default();

    for token in tokenize(input) {
        match token {
            Token::Word(word) => parsed.words.push(word),
            Token::KeyValue { key, value } => parsed.args.push(&key, value),
            Token::LongFlag(flag) => parsed.args.push_flag(&flag),
            Token::ShortFlag(c) => {
                return Err(LensError::option(
                    format!("-{c}"),
                    "short flags are not supported; use --name or name=value",
                ))
            }
        }
    }

    Ok(parsed)
}
