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

//! River-aligned SQL formatter.
//!
//! `sqlfmt` reformats SQL so that top-level clause keywords are
//! right-justified against a common "river" of whitespace, keywords are
//! uppercased, and unquoted identifiers are lowercased. ANSI SQL,
//! PostgreSQL, MySQL, and T-SQL are supported through pluggable
//! [`dialect::DialectProfile`]s.
//!
//! Example:
//!
//! ```
//! let sql = "select file_hash from file_system where file_name = '.vimrc';";
//! let formatted = sqlfmt::format(sql, sqlfmt::FormatOptions::default()).unwrap();
//! assert_eq!(
//!     formatted,
//!     "SELECT file_hash\n  FROM file_system\n WHERE file_name = '.vimrc';\n",
//! );
//! ```
//!
//! Statements that fail to parse are preserved verbatim (with the
//! [`FormatOptions::on_recover`] hook observing each recovery), so a single
//! malformed statement never poisons a migration file.

#![warn(clippy::all)]

use std::error::Error;
use std::fmt;

use log::debug;

pub mod ast;
pub mod dialect;
pub mod keywords;
mod layout;
pub mod parser;
pub mod tokenizer;

use ast::{QueryExpr, Raw, Statement};
use dialect::DialectProfile;
use layout::{LayoutEngine, LayoutPolicy};
use parser::{ParseEventKind, Parser, ParserError};
use tokenizer::{TokenizeError, Tokenizer};

/// Progress information passed to the recovery callbacks. Statement indices
/// are 1-based and count every attempted statement, including ones that were
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackContext {
    pub statement_index: usize,
    pub total_statements: usize,
}

/// Observes statements that failed to parse and were captured verbatim.
pub type RecoverHook<'a> = Box<dyn FnMut(&ParserError, Option<&Raw>, &CallbackContext) + 'a>;
/// Observes statements that failed to parse and produced no text at all.
pub type DropHook<'a> = Box<dyn FnMut(&ParserError, &CallbackContext) + 'a>;
/// Observes intentionally unsupported statements passed through verbatim.
pub type PassthroughHook<'a> = Box<dyn FnMut(&Raw, &CallbackContext) + 'a>;

/// Options for [`format`].
pub struct FormatOptions<'a> {
    /// Dialect profile; defaults to ANSI. See [`DialectProfile::by_name`].
    pub dialect: &'a DialectProfile,
    /// Recursion ceiling shared by the parser and the layout engine.
    pub max_depth: usize,
    /// Maximum input size in UTF-8 bytes.
    pub max_input_size: usize,
    /// Target line width; clamped to at least 40 columns.
    pub max_line_length: usize,
    /// Convert parse failures into verbatim passthrough instead of erroring.
    pub recover: bool,
    /// Optional cap on the number of tokens the tokenizer may produce.
    pub max_token_count: Option<usize>,
    pub on_recover: Option<RecoverHook<'a>>,
    pub on_drop_statement: Option<DropHook<'a>>,
    pub on_passthrough: Option<PassthroughHook<'a>>,
}

impl Default for FormatOptions<'_> {
    fn default() -> Self {
        FormatOptions {
            dialect: DialectProfile::ansi(),
            max_depth: 200,
            max_input_size: 10 * 1024 * 1024,
            max_line_length: 80,
            recover: true,
            max_token_count: None,
            on_recover: None,
            on_drop_statement: None,
            on_passthrough: None,
        }
    }
}

impl fmt::Debug for FormatOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FormatOptions")
            .field("dialect", &self.dialect.name())
            .field("max_depth", &self.max_depth)
            .field("max_input_size", &self.max_input_size)
            .field("max_line_length", &self.max_line_length)
            .field("recover", &self.recover)
            .field("max_token_count", &self.max_token_count)
            .finish_non_exhaustive()
    }
}

/// Errors surfaced by [`format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The input exceeded [`FormatOptions::max_input_size`].
    InputTooLarge { size: usize, max: usize },
    /// Lexical failure: unterminated string, bad dollar-quote tag, token
    /// budget exceeded.
    Tokenize(TokenizeError),
    /// Grammar violation; only surfaced when recovery is disabled.
    Parse(ParserError),
    /// The parser's recursion guard tripped.
    MaxDepth,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormatError::InputTooLarge { size, max } => {
                write!(f, "input of {size} bytes exceeds the limit of {max} bytes")
            }
            FormatError::Tokenize(e) => write!(f, "tokenize error: {e}"),
            FormatError::Parse(e) => write!(f, "parse error: {e}"),
            FormatError::MaxDepth => f.write_str("maximum nesting depth exceeded"),
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FormatError::Tokenize(e) => Some(e),
            FormatError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TokenizeError> for FormatError {
    fn from(e: TokenizeError) -> Self {
        FormatError::Tokenize(e)
    }
}

impl From<ParserError> for FormatError {
    fn from(e: ParserError) -> Self {
        match e {
            ParserError::RecursionLimitExceeded => FormatError::MaxDepth,
            other => FormatError::Parse(other),
        }
    }
}

/// Formats SQL source text. Returns the reformatted SQL ending in a single
/// newline, or the empty string for blank input.
pub fn format(input: &str, mut options: FormatOptions<'_>) -> Result<String, FormatError> {
    if input.len() > options.max_input_size {
        return Err(FormatError::InputTooLarge {
            size: input.len(),
            max: options.max_input_size,
        });
    }
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    let tokens = Tokenizer::new(options.dialect, trimmed)
        .with_max_tokens(options.max_token_count)
        .tokenize()?;
    let parser = Parser::new(
        tokens,
        trimmed,
        options.dialect,
        options.max_depth,
        options.recover,
    );
    let (mut statements, events) = parser.parse_statements()?;
    debug!(
        "parsed {} statements ({} recovery events)",
        statements.len(),
        events.len()
    );

    // A WITH statement's main query hands its leading comments to the
    // statement so they are not emitted twice. This is the one mutation the
    // tree sees after parsing.
    for statement in &mut statements {
        if let Statement::Query(QueryExpr::With(with)) = statement {
            let mut moved = std::mem::take(with.body.leading_comments_mut());
            with.leading_comments.append(&mut moved);
        }
    }

    let dropped = events
        .iter()
        .filter(|e| matches!(e.kind, ParseEventKind::Dropped(_)))
        .count();
    let total = statements.len() + dropped;
    for event in &events {
        let context = CallbackContext {
            statement_index: event.statement_index,
            total_statements: total,
        };
        let raw = event.slot.and_then(|slot| match &statements[slot] {
            Statement::Raw(raw) => Some(raw.as_ref()),
            _ => None,
        });
        match &event.kind {
            ParseEventKind::Recovered(error) => {
                if let Some(hook) = options.on_recover.as_mut() {
                    hook(error, raw, &context);
                }
            }
            ParseEventKind::Dropped(error) => {
                if let Some(hook) = options.on_drop_statement.as_mut() {
                    hook(error, &context);
                }
            }
            ParseEventKind::Passthrough => {
                if let (Some(hook), Some(raw)) = (options.on_passthrough.as_mut(), raw) {
                    hook(raw, &context);
                }
            }
        }
    }

    let engine = LayoutEngine::new(
        options.dialect,
        LayoutPolicy::new(options.max_line_length),
        options.max_depth,
    );
    let rendered = engine.format_statements(&statements);

    let mut out = rendered
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    while out.ends_with('\n') {
        out.pop();
    }
    if out.is_empty() {
        return Ok(String::new());
    }
    out.push('\n');
    Ok(out)
}
