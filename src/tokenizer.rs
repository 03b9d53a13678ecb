// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SQL tokenizer.
//!
//! Splits source text into a flat sequence of [`Token`]s terminated by an
//! [`TokenKind::Eof`] token. Token texts are verbatim slices of the input, so
//! concatenating them (with whitespace between) reproduces the source.
//! Comments are emitted as tokens, never discarded; the parser threads them
//! onto AST nodes.

use std::error::Error;
use std::fmt;

use crate::dialect::DialectProfile;

/// Classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// An unquoted word that is not in the dialect's recognition set.
    Identifier,
    /// A `"double quoted"` identifier, quotes included in the text.
    QuotedIdentifier,
    /// An unquoted word in the dialect's recognition set.
    Keyword,
    /// Integer, decimal, or exponent-form numeric literal.
    Number,
    /// A `'single quoted'` string, including any `E`/`B`/`X`/`N` prefix.
    String,
    /// A PostgreSQL `$tag$ ... $tag$` string, verbatim.
    DollarString,
    /// A (possibly multi-character) operator such as `<=` or `->>`.
    Operator,
    /// Structural punctuation: parens, commas, semicolons, brackets.
    Punctuation,
    /// A `-- ...` comment, without the line terminator.
    LineComment,
    /// A `/* ... */` comment, delimiters included.
    BlockComment,
    /// End of input. Always the last token.
    Eof,
}

/// One lexed token. `text` is the verbatim source lexeme; `upper` is the
/// ASCII-uppercased form for word and symbol tokens (string, dollar-string,
/// and comment tokens keep their text verbatim so literals never change
/// case). `offset` is the byte position of the first character in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub upper: String,
    pub offset: usize,
}

impl Token {
    fn new(kind: TokenKind, text: &str, offset: usize) -> Token {
        let upper = match kind {
            TokenKind::String
            | TokenKind::DollarString
            | TokenKind::QuotedIdentifier
            | TokenKind::LineComment
            | TokenKind::BlockComment => text.to_string(),
            _ => text.to_ascii_uppercase(),
        };
        Token {
            kind,
            text: text.to_string(),
            upper,
            offset,
        }
    }

    /// Byte offset one past the last character of the token.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            _ => f.write_str(&self.text),
        }
    }
}

/// Tokenizer error, reported with the byte offset it occurred at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    pub message: String,
    pub offset: usize,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

impl Error for TokenizeError {}

fn tokenize_error<T>(message: impl Into<String>, offset: usize) -> Result<T, TokenizeError> {
    Err(TokenizeError {
        message: message.into(),
        offset,
    })
}

/// A cursor over the source string with lexing convenience methods.
struct LexBuf<'a> {
    buf: &'a str,
    pos: usize,
}

impl<'a> LexBuf<'a> {
    fn new(buf: &'a str) -> LexBuf<'a> {
        LexBuf { buf, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.buf[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.buf[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    /// Advances past `ch` if it is next, reporting whether it did.
    fn consume(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Advances past `s` if the remaining input starts with it.
    fn consume_str(&mut self, s: &str) -> bool {
        if self.buf[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consumes characters while `pred` holds.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if pred(c) {
                self.next();
            } else {
                break;
            }
        }
    }

    fn slice_from(&self, start: usize) -> &'a str {
        &self.buf[start..self.pos]
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

// Multi-character operators, longest first so a linear scan gives longest
// match. Single-character operators are handled by the fallthrough.
const MULTI_CHAR_OPERATORS: &[&str] = &[
    "->>", "#>>", "!~*", "::", "->", "#>", "@>", "<@", "?|", "?&", "||", "!=", "<>", "<=", ">=",
    "&&", "~*", "!~", "<<", ">>", "+=", "-=", "*=", "/=", "%=", "&=", "^=", "|=",
];

const SINGLE_CHAR_OPERATORS: &[char] = &[
    '=', '<', '>', '+', '-', '*', '/', '%', '^', '&', '|', '~', '?', '#', '!',
];

/// A dialect-parameterized tokenizer over a source string.
pub struct Tokenizer<'a> {
    profile: &'a DialectProfile,
    src: &'a str,
    max_tokens: Option<usize>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(profile: &'a DialectProfile, src: &'a str) -> Tokenizer<'a> {
        Tokenizer {
            profile,
            src,
            max_tokens: None,
        }
    }

    /// Caps the number of tokens produced; exceeding the cap fails with a
    /// [`TokenizeError`].
    pub fn with_max_tokens(mut self, max_tokens: Option<usize>) -> Tokenizer<'a> {
        self.max_tokens = max_tokens;
        self
    }

    /// Tokenizes the whole input, appending a final [`TokenKind::Eof`] token.
    pub fn tokenize(&self) -> Result<Vec<Token>, TokenizeError> {
        let mut buf = LexBuf::new(self.src);
        let mut tokens = Vec::new();

        while let Some(ch) = buf.peek() {
            let start = buf.pos;
            let token = match ch {
                c if c.is_whitespace() => {
                    buf.next();
                    buf.take_while(|c| c.is_whitespace());
                    continue;
                }
                '-' if buf.peek_second() == Some('-') => self.lex_line_comment(&mut buf),
                '/' if buf.peek_second() == Some('*') => self.lex_block_comment(&mut buf)?,
                '\'' => self.lex_string(&mut buf)?,
                '"' => self.lex_quoted_identifier(&mut buf)?,
                '$' => self.lex_dollar(&mut buf)?,
                c if c.is_ascii_digit() => self.lex_number(&mut buf),
                '.' if buf.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                    self.lex_number(&mut buf)
                }
                c if is_identifier_start(c) => self.lex_word(&mut buf)?,
                ':' if buf.peek_second() == Some(':') => self.lex_operator(&mut buf),
                '(' | ')' | ',' | ';' | '.' | '[' | ']' | ':' | '{' | '}' => {
                    buf.next();
                    Token::new(TokenKind::Punctuation, buf.slice_from(start), start)
                }
                _ => self.lex_operator(&mut buf),
            };
            tokens.push(token);
            if let Some(cap) = self.max_tokens {
                if tokens.len() > cap {
                    return tokenize_error(format!("token count exceeds the cap of {cap}"), start);
                }
            }
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.src.len()));
        Ok(tokens)
    }

    fn lex_line_comment(&self, buf: &mut LexBuf) -> Token {
        let start = buf.pos;
        buf.take_while(|c| c != '\n');
        let text = buf.slice_from(start);
        // Keep CRLF input from smuggling a carriage return into the token.
        let text = text.strip_suffix('\r').unwrap_or(text);
        Token::new(TokenKind::LineComment, text, start)
    }

    fn lex_block_comment(&self, buf: &mut LexBuf) -> Result<Token, TokenizeError> {
        let start = buf.pos;
        buf.next();
        buf.next();
        let mut depth = 1usize;
        loop {
            if buf.consume_str("*/") {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            } else if buf.consume_str("/*") {
                // PostgreSQL block comments nest.
                depth += 1;
            } else if buf.next().is_none() {
                return tokenize_error("unterminated block comment", start);
            }
        }
        Ok(Token::new(TokenKind::BlockComment, buf.slice_from(start), start))
    }

    fn lex_string(&self, buf: &mut LexBuf) -> Result<Token, TokenizeError> {
        let start = buf.pos;
        buf.next();
        loop {
            match buf.next() {
                Some('\'') => {
                    // A doubled quote is an escaped quote, not a terminator.
                    if !buf.consume('\'') {
                        break;
                    }
                }
                Some(_) => {}
                None => return tokenize_error("unterminated string literal", start),
            }
        }
        Ok(Token::new(TokenKind::String, buf.slice_from(start), start))
    }

    fn lex_quoted_identifier(&self, buf: &mut LexBuf) -> Result<Token, TokenizeError> {
        let start = buf.pos;
        buf.next();
        loop {
            match buf.next() {
                Some('"') => {
                    if !buf.consume('"') {
                        break;
                    }
                }
                Some(_) => {}
                None => return tokenize_error("unterminated quoted identifier", start),
            }
        }
        Ok(Token::new(
            TokenKind::QuotedIdentifier,
            buf.slice_from(start),
            start,
        ))
    }

    /// Lexes `$tag$ ... $tag$` strings and `$1`-style parameters. A bare `$`
    /// falls back to punctuation.
    fn lex_dollar(&self, buf: &mut LexBuf) -> Result<Token, TokenizeError> {
        let start = buf.pos;
        buf.next();

        if buf.peek().is_some_and(|c| c.is_ascii_digit()) {
            buf.take_while(|c| c.is_ascii_digit());
            return Ok(Token::new(TokenKind::Identifier, buf.slice_from(start), start));
        }

        let tag_start = buf.pos;
        buf.take_while(|c| c.is_alphanumeric() || c == '_');
        let tag = &self.src[tag_start..buf.pos];
        if !buf.consume('$') {
            if tag.is_empty() {
                return Ok(Token::new(TokenKind::Punctuation, "$", start));
            }
            return tokenize_error(format!("malformed dollar-quote tag `${tag}`"), start);
        }

        let terminator = format!("${tag}$");
        loop {
            if buf.consume_str(&terminator) {
                break;
            }
            if buf.next().is_none() {
                return tokenize_error("unterminated dollar-quoted string", start);
            }
        }
        Ok(Token::new(TokenKind::DollarString, buf.slice_from(start), start))
    }

    fn lex_number(&self, buf: &mut LexBuf) -> Token {
        let start = buf.pos;
        buf.take_while(|c| c.is_ascii_digit());
        if buf.peek() == Some('.') && buf.peek_second() != Some('.') {
            buf.next();
            buf.take_while(|c| c.is_ascii_digit());
        }
        if buf.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let mark = buf.pos;
            buf.next();
            if buf.peek().is_some_and(|c| c == '+' || c == '-') {
                buf.next();
            }
            if buf.peek().is_some_and(|c| c.is_ascii_digit()) {
                buf.take_while(|c| c.is_ascii_digit());
            } else {
                // `1e` with no exponent digits: the `e` starts a word.
                buf.pos = mark;
            }
        }
        Token::new(TokenKind::Number, buf.slice_from(start), start)
    }

    fn lex_word(&self, buf: &mut LexBuf) -> Result<Token, TokenizeError> {
        let start = buf.pos;
        buf.take_while(is_identifier_part);
        let word = buf.slice_from(start);

        // String literal prefixes: E'...', B'...', X'...', N'...'.
        if word.len() == 1
            && matches!(word.chars().next(), Some('e' | 'E' | 'b' | 'B' | 'x' | 'X' | 'n' | 'N'))
            && buf.peek() == Some('\'')
        {
            let string = self.lex_string(buf)?;
            let text = &self.src[start..string.offset + string.text.len()];
            return Ok(Token::new(TokenKind::String, text, start));
        }

        let upper = word.to_ascii_uppercase();
        let kind = if self.profile.is_keyword(&upper) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Ok(Token::new(kind, word, start))
    }

    fn lex_operator(&self, buf: &mut LexBuf) -> Token {
        let start = buf.pos;
        for op in MULTI_CHAR_OPERATORS {
            if buf.consume_str(op) {
                return Token::new(TokenKind::Operator, op, start);
            }
        }
        let ch = buf.next().expect("caller checked a character is present");
        if SINGLE_CHAR_OPERATORS.contains(&ch) {
            Token::new(TokenKind::Operator, buf.slice_from(start), start)
        } else {
            // Unknown characters (backticks, brackets from other dialects, stray
            // bytes) stay in the stream as punctuation; the parser rejects them
            // and recovery turns the statement into a raw node.
            Token::new(TokenKind::Punctuation, buf.slice_from(start), start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectProfile;

    fn lex(sql: &str) -> Vec<Token> {
        Tokenizer::new(DialectProfile::postgres(), sql)
            .tokenize()
            .unwrap()
    }

    fn kinds(sql: &str) -> Vec<TokenKind> {
        lex(sql).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn words_classify_by_profile() {
        let tokens = lex("select file_hash");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].upper, "SELECT");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "file_hash");
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn mysql_keywords_only_under_mysql() {
        let pg = Tokenizer::new(DialectProfile::postgres(), "auto_increment")
            .tokenize()
            .unwrap();
        assert_eq!(pg[0].kind, TokenKind::Identifier);
        let my = Tokenizer::new(DialectProfile::mysql(), "auto_increment")
            .tokenize()
            .unwrap();
        assert_eq!(my[0].kind, TokenKind::Keyword);
    }

    #[test]
    fn strings_keep_doubled_quotes() {
        let tokens = lex("'it''s'");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "'it''s'");
    }

    #[test]
    fn escape_string_prefix_joins_token() {
        let tokens = lex("E'\\n' x'ff'");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "E'\\n'");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "x'ff'");
    }

    #[test]
    fn unterminated_string_reports_offset() {
        let err = Tokenizer::new(DialectProfile::ansi(), "SELECT 'oops")
            .tokenize()
            .unwrap_err();
        assert_eq!(err.offset, 7);
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn dollar_quoting() {
        let tokens = lex("$fn$ SELECT 'nested' $fn$");
        assert_eq!(tokens[0].kind, TokenKind::DollarString);
        assert_eq!(tokens[0].text, "$fn$ SELECT 'nested' $fn$");

        let tokens = lex("$$body$$");
        assert_eq!(tokens[0].kind, TokenKind::DollarString);

        let err = Tokenizer::new(DialectProfile::postgres(), "$tag$ never closed")
            .tokenize()
            .unwrap_err();
        assert!(err.message.contains("unterminated dollar-quoted"));
    }

    #[test]
    fn dollar_parameters() {
        let tokens = lex("WHERE id = $1");
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].text, "$1");
    }

    #[test]
    fn operators_longest_match() {
        let tokens = lex("a->>'b' #>> c :: d != e");
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ops, vec!["->>", "#>>", "::", "!="]);
    }

    #[test]
    fn numbers() {
        let tokens = lex("1 2.5 .5 1e10 3.14e-2 1.");
        let nums: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(nums, vec!["1", "2.5", ".5", "1e10", "3.14e-2", "1."]);
    }

    #[test]
    fn comments_are_tokens() {
        assert_eq!(
            kinds("-- lead\nSELECT 1 /* mid */"),
            vec![
                TokenKind::LineComment,
                TokenKind::Keyword,
                TokenKind::Number,
                TokenKind::BlockComment,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn nested_block_comments() {
        let tokens = lex("/* outer /* inner */ still outer */ 1");
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[1].kind, TokenKind::Number);
    }

    #[test]
    fn token_cap() {
        let err = Tokenizer::new(DialectProfile::ansi(), "a b c d e")
            .with_max_tokens(Some(3))
            .tokenize()
            .unwrap_err();
        assert!(err.message.contains("cap"));
    }

    #[test]
    fn byte_offsets_reconstruct_source() {
        let sql = "SELECT 'a' FROM \"T\"";
        for token in lex(sql) {
            if token.kind != TokenKind::Eof {
                assert_eq!(&sql[token.offset..token.end()], token.text);
            }
        }
    }

    #[test]
    fn unknown_characters_become_punctuation() {
        let tokens = lex("`col`");
        assert_eq!(tokens[0].kind, TokenKind::Punctuation);
        assert_eq!(tokens[0].text, "`");
    }
}
