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

//! SQL dialect profiles.
//!
//! A [`DialectProfile`] is an immutable record of the word sets that
//! parameterize the tokenizer, the parser, and the layout engine:
//!
//! * `keywords`: the recognition set; a word in it tokenizes as a keyword
//!   and is uppercased on output.
//! * `function_keywords`: names uppercased only when followed by `(`.
//! * `clause_keywords`: words that introduce a clause; they terminate
//!   implicit aliases and act as boundary hints during recovery.
//! * `statement_starters`: words that begin a top-level statement.
//!
//! Four built-ins are provided ([`DialectProfile::ansi`],
//! [`DialectProfile::postgres`], [`DialectProfile::mysql`],
//! [`DialectProfile::tsql`]); all are `&'static` and expose no mutating
//! methods. Custom profiles are made with [`ProfileBuilder`], which snapshots
//! a base profile and hands back a new frozen record.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::keywords;

/// An immutable dialect description. See the module docs for the role of
/// each word set. All lookups expect the word already uppercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectProfile {
    name: String,
    keywords: BTreeSet<String>,
    function_keywords: BTreeSet<String>,
    clause_keywords: BTreeSet<String>,
    statement_starters: BTreeSet<String>,
}

fn word_set(slices: &[&[&str]]) -> BTreeSet<String> {
    slices
        .iter()
        .flat_map(|s| s.iter())
        .map(|w| (*w).to_string())
        .collect()
}

static ANSI: LazyLock<DialectProfile> = LazyLock::new(|| DialectProfile {
    name: "ansi".into(),
    keywords: word_set(&[keywords::ANSI_KEYWORDS]),
    function_keywords: word_set(&[keywords::ANSI_FUNCTION_KEYWORDS]),
    clause_keywords: word_set(&[keywords::CLAUSE_KEYWORDS]),
    statement_starters: word_set(&[keywords::ANSI_STATEMENT_STARTERS]),
});

static POSTGRES: LazyLock<DialectProfile> = LazyLock::new(|| DialectProfile {
    name: "postgres".into(),
    keywords: word_set(&[keywords::ANSI_KEYWORDS, keywords::POSTGRES_KEYWORDS]),
    function_keywords: word_set(&[
        keywords::ANSI_FUNCTION_KEYWORDS,
        keywords::POSTGRES_FUNCTION_KEYWORDS,
    ]),
    clause_keywords: word_set(&[keywords::CLAUSE_KEYWORDS]),
    statement_starters: word_set(&[
        keywords::ANSI_STATEMENT_STARTERS,
        keywords::POSTGRES_STATEMENT_STARTERS,
    ]),
});

static MYSQL: LazyLock<DialectProfile> = LazyLock::new(|| DialectProfile {
    name: "mysql".into(),
    keywords: word_set(&[keywords::ANSI_KEYWORDS, keywords::MYSQL_KEYWORDS]),
    function_keywords: word_set(&[
        keywords::ANSI_FUNCTION_KEYWORDS,
        keywords::MYSQL_FUNCTION_KEYWORDS,
    ]),
    clause_keywords: word_set(&[keywords::CLAUSE_KEYWORDS, keywords::MYSQL_CLAUSE_KEYWORDS]),
    statement_starters: word_set(&[
        keywords::ANSI_STATEMENT_STARTERS,
        keywords::MYSQL_STATEMENT_STARTERS,
    ]),
});

static TSQL: LazyLock<DialectProfile> = LazyLock::new(|| DialectProfile {
    name: "tsql".into(),
    keywords: word_set(&[keywords::ANSI_KEYWORDS, keywords::TSQL_KEYWORDS]),
    function_keywords: word_set(&[
        keywords::ANSI_FUNCTION_KEYWORDS,
        keywords::TSQL_FUNCTION_KEYWORDS,
    ]),
    clause_keywords: word_set(&[keywords::CLAUSE_KEYWORDS]),
    statement_starters: word_set(&[
        keywords::ANSI_STATEMENT_STARTERS,
        keywords::TSQL_STATEMENT_STARTERS,
    ]),
});

impl DialectProfile {
    /// The ANSI SQL profile, the default.
    pub fn ansi() -> &'static DialectProfile {
        &ANSI
    }

    /// The PostgreSQL profile: dollar quoting, `::` casts, JSON and regex
    /// operators, `ILIKE`, `RETURNING`, `ON CONFLICT`.
    pub fn postgres() -> &'static DialectProfile {
        &POSTGRES
    }

    /// The MySQL profile: `AUTO_INCREMENT`, `ENGINE`, `STRAIGHT_JOIN` and
    /// friends uppercase; `DELIMITER` statements pass through verbatim.
    pub fn mysql() -> &'static DialectProfile {
        &MYSQL
    }

    /// The T-SQL profile: `TOP`, `GO`, `DBCC`, `EXEC` and friends.
    pub fn tsql() -> &'static DialectProfile {
        &TSQL
    }

    /// Looks up a built-in profile by name (case-insensitive). Recognised
    /// names: `ansi`, `postgres`/`postgresql`, `mysql`/`mariadb`,
    /// `tsql`/`mssql`.
    pub fn by_name(name: &str) -> Option<&'static DialectProfile> {
        match name.to_ascii_lowercase().as_str() {
            "ansi" => Some(Self::ansi()),
            "postgres" | "postgresql" => Some(Self::postgres()),
            "mysql" | "mariadb" => Some(Self::mysql()),
            "tsql" | "mssql" => Some(Self::tsql()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_keyword(&self, upper: &str) -> bool {
        self.keywords.contains(upper)
    }

    pub fn is_function_keyword(&self, upper: &str) -> bool {
        self.function_keywords.contains(upper)
    }

    pub fn is_clause_keyword(&self, upper: &str) -> bool {
        self.clause_keywords.contains(upper)
    }

    pub fn is_statement_starter(&self, upper: &str) -> bool {
        self.statement_starters.contains(upper)
    }
}

/// Builds a custom [`DialectProfile`] by snapshotting a base profile and
/// extending its word sets. The result is a new owned record; the base is
/// untouched.
///
/// ```
/// use sqlfmt::dialect::{DialectProfile, ProfileBuilder};
///
/// let profile = ProfileBuilder::from(DialectProfile::postgres())
///     .name("warehouse")
///     .keywords(["SHARDED"])
///     .function_keywords(["HLL_UNION"])
///     .build();
/// assert!(profile.is_keyword("SHARDED"));
/// assert!(!DialectProfile::postgres().is_keyword("SHARDED"));
/// ```
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    profile: DialectProfile,
}

impl ProfileBuilder {
    pub fn from(base: &DialectProfile) -> ProfileBuilder {
        ProfileBuilder {
            profile: base.clone(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.profile.name = name.into();
        self
    }

    /// Adds words to the recognition set. Words are uppercased on the way in.
    pub fn keywords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for w in words {
            self.profile.keywords.insert(w.as_ref().to_ascii_uppercase());
        }
        self
    }

    pub fn function_keywords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for w in words {
            self.profile
                .function_keywords
                .insert(w.as_ref().to_ascii_uppercase());
        }
        self
    }

    pub fn clause_keywords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for w in words {
            self.profile
                .clause_keywords
                .insert(w.as_ref().to_ascii_uppercase());
        }
        self
    }

    pub fn statement_starters<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for w in words {
            self.profile
                .statement_starters
                .insert(w.as_ref().to_ascii_uppercase());
        }
        self
    }

    pub fn build(self) -> DialectProfile {
        self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        assert_eq!(DialectProfile::by_name("PostgreSQL").unwrap().name(), "postgres");
        assert_eq!(DialectProfile::by_name("mssql").unwrap().name(), "tsql");
        assert!(DialectProfile::by_name("oracle").is_none());
    }

    #[test]
    fn dialect_keywords_do_not_leak() {
        assert!(DialectProfile::mysql().is_keyword("AUTO_INCREMENT"));
        assert!(!DialectProfile::postgres().is_keyword("AUTO_INCREMENT"));
        assert!(DialectProfile::postgres().is_keyword("ILIKE"));
        assert!(!DialectProfile::ansi().is_keyword("ILIKE"));
    }

    #[test]
    fn custom_profile_snapshots_base() {
        let custom = ProfileBuilder::from(DialectProfile::ansi())
            .name("custom")
            .keywords(["flarp"])
            .build();
        assert!(custom.is_keyword("FLARP"));
        assert!(!DialectProfile::ansi().is_keyword("FLARP"));
        assert_eq!(DialectProfile::ansi().name(), "ansi");
    }

    #[test]
    fn function_keywords_are_separate() {
        let p = DialectProfile::postgres();
        assert!(p.is_function_keyword("JSONB_AGG"));
        assert!(!p.is_keyword("JSONB_AGG"));
        assert!(p.is_keyword("SELECT"));
        assert!(!p.is_function_keyword("SELECT"));
    }
}
