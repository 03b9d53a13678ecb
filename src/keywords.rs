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

//! Keyword tables backing the dialect profiles.
//!
//! This module defines
//! 1) a string constant for every word the formatter may treat as a keyword:
//!    `pub const SELECT = "SELECT"`
//! 2) an `ANSI_KEYWORDS` array holding the base recognition set, plus
//!    per-dialect extension arrays (`POSTGRES_KEYWORDS`, `MYSQL_KEYWORDS`,
//!    `TSQL_KEYWORDS`).
//!
//! These are not lists of *reserved* words: membership only controls which
//! words are uppercased on output and which words terminate alias parsing.
//! New words can be added without affecting what parses.

/// Defines a string constant for a single keyword: `kw_def!(SELECT);`
/// expands to `pub const SELECT = "SELECT";`
macro_rules! kw_def {
    ($ident:ident = $string_keyword:expr) => {
        pub const $ident: &str = $string_keyword;
    };
    ($ident:ident) => {
        kw_def!($ident = stringify!($ident));
    };
}

/// Expands to a list of `kw_def!()` invocations for each keyword
/// and defines an array of the defined constants.
macro_rules! define_keywords {
    ($array:ident => $(
        $ident:ident $(= $string_keyword:expr)?
    ),* $(,)?) => {
        $(kw_def!($ident $(= $string_keyword)?);)*

        pub const $array: &[&str] = &[
            $($ident),*
        ];
    }
}

// The base recognition set shared by every dialect. Sorted so membership can
// be checked with a binary search.
define_keywords!(ANSI_KEYWORDS =>
    ACTION,
    ADD,
    ALL,
    ALTER,
    ALWAYS,
    AND,
    ANY,
    ARRAY,
    AS,
    ASC,
    ASYMMETRIC,
    AT,
    AUTHORIZATION,
    BEGIN,
    BETWEEN,
    BIGINT,
    BINARY,
    BLOB,
    BOOLEAN,
    BOTH,
    BY,
    CASCADE,
    CASCADED,
    CASE,
    CAST,
    CHAR,
    CHARACTER,
    CHECK,
    CLOB,
    COLLATE,
    COLUMN,
    COMMIT,
    CONSTRAINT,
    CONTINUE,
    CREATE,
    CROSS,
    CURRENT,
    CURRENT_DATE,
    CURRENT_ROW,
    CURRENT_TIME,
    CURRENT_TIMESTAMP,
    CURRENT_USER,
    CYCLE,
    DATE,
    DAY,
    DEC,
    DECIMAL,
    DECLARE,
    DEFAULT,
    DELETE,
    DESC,
    DISTINCT,
    DOUBLE,
    DROP,
    ELSE,
    END,
    ESCAPE,
    EXCEPT,
    EXCLUDE,
    EXISTS,
    EXPLAIN,
    EXTRACT,
    FALSE,
    FETCH,
    FILTER,
    FIRST,
    FLOAT,
    FOLLOWING,
    FOR,
    FOREIGN,
    FROM,
    FULL,
    GENERATED,
    GLOBAL,
    GRANT,
    GROUP,
    GROUPING,
    GROUPS,
    HAVING,
    HOUR,
    IDENTITY,
    IF,
    IN,
    INDEX,
    INHERITS,
    INNER,
    INSERT,
    INT,
    INTEGER,
    INTERSECT,
    INTERVAL,
    INTO,
    IS,
    JOIN,
    LAST,
    LATERAL,
    LEADING,
    LEFT,
    LIKE,
    LIMIT,
    LOCAL,
    LOCALTIME,
    LOCALTIMESTAMP,
    MATCHED,
    MATERIALIZED,
    MERGE,
    MINUTE,
    MONTH,
    NATURAL,
    NCHAR,
    NEXT,
    NO,
    NOT,
    NOTHING,
    NULL,
    NULLS,
    NUMERIC,
    OF,
    OFFSET,
    ON,
    ONLY,
    OPTION,
    OR,
    ORDER,
    OUTER,
    OVER,
    OVERLAY,
    PARTITION,
    PLACING,
    POSITION,
    PRECEDING,
    PRECISION,
    PRIMARY,
    PRIVILEGES,
    PUBLIC,
    RANGE,
    READ,
    REAL,
    RECURSIVE,
    REFERENCES,
    RENAME,
    REPLACE,
    RESTART,
    RESTRICT,
    RETURNING,
    REVOKE,
    RIGHT,
    ROLLBACK,
    ROLLUP,
    ROW,
    ROWS,
    SCHEMA,
    SEARCH,
    SECOND,
    SELECT,
    SESSION_USER,
    SET,
    SETS,
    SIMILAR,
    SMALLINT,
    SOME,
    START,
    SYMMETRIC,
    TABLE,
    TABLESAMPLE,
    TEMPORARY,
    THEN,
    TIES,
    TIME,
    TIMESTAMP,
    TO,
    TRAILING,
    TRANSACTION,
    TRIGGER,
    TRIM,
    TRUE,
    TRUNCATE,
    UNBOUNDED,
    UNION,
    UNIQUE,
    UNKNOWN,
    UPDATE,
    USING,
    VALUES,
    VARCHAR,
    VARYING,
    VIEW,
    WHEN,
    WHERE,
    WINDOW,
    WITH,
    WITHIN,
    WITHOUT,
    YEAR,
    ZONE,
);

// Words that are keywords only under the PostgreSQL profile.
define_keywords!(POSTGRES_KEYWORDS =>
    ANALYZE,
    BIGSERIAL,
    BYTEA,
    CLUSTER,
    COMMENT,
    CONCURRENTLY,
    CONFLICT,
    COPY,
    DEALLOCATE,
    DISCARD,
    DO,
    EXTENSION,
    FREEZE,
    ILIKE,
    INCLUDE,
    ISNULL,
    JSON,
    JSONB,
    LISTEN,
    LOCKED,
    LOGGED,
    NOTIFY,
    NOTNULL,
    NOWAIT,
    OVERRIDING,
    PERFORM,
    PERMISSIVE,
    POLICY,
    PREPARE,
    REFRESH,
    REINDEX,
    RESTRICTIVE,
    RETURNS,
    SECURITY,
    SEQUENCE,
    SERIAL,
    SKIP,
    STORED,
    TABLESPACE,
    TEXT,
    UNLISTEN,
    UNLOGGED,
    UUID,
    VACUUM,
    VERBOSE,
);

// Words that are keywords only under the MySQL profile.
define_keywords!(MYSQL_KEYWORDS =>
    AUTO_INCREMENT,
    CHANGE,
    CHARSET,
    DATABASES,
    DELAYED,
    DELIMITER,
    DUPLICATE,
    ENGINE,
    ENUM,
    FULLTEXT,
    HIGH_PRIORITY,
    IGNORE,
    LOCK,
    LOW_PRIORITY,
    MEDIUMINT,
    MEDIUMTEXT,
    MODIFY,
    REGEXP,
    RLIKE,
    SEPARATOR,
    SHOW,
    SPATIAL,
    SQL_CALC_FOUND_ROWS,
    STRAIGHT_JOIN,
    TABLES,
    TINYINT,
    TINYTEXT,
    UNLOCK,
    UNSIGNED,
    USE,
    ZEROFILL,
);

// Words that are keywords only under the T-SQL profile.
define_keywords!(TSQL_KEYWORDS =>
    APPLY,
    BACKUP,
    CLUSTERED,
    DATETIME,
    DATETIME2,
    DBCC,
    EXEC,
    EXECUTE,
    GO,
    HOLDLOCK,
    IDENTITY_INSERT,
    NOLOCK,
    NONCLUSTERED,
    NVARCHAR,
    OUTPUT,
    PERCENT,
    PIVOT,
    PRINT,
    READPAST,
    RESTORE,
    ROWGUIDCOL,
    TOP,
    UNIQUEIDENTIFIER,
    UNPIVOT,
    UPDLOCK,
    WAITFOR,
);

/// Clause keywords: words that introduce a top-level clause. These act as
/// statement-boundary hints during recovery and terminate implicit-alias
/// parsing, so that `FROM table_name alias` parses without lookahead.
pub const CLAUSE_KEYWORDS: &[&str] = &[
    AND, AS, CROSS, ELSE, END, EXCEPT, FETCH, FOR, FROM, FULL, GROUP, HAVING, INNER, INTERSECT,
    INTO, JOIN, LATERAL, LEFT, LIMIT, NATURAL, OFFSET, ON, OR, ORDER, OUTER, RETURNING, RIGHT,
    SELECT, SET, TABLESAMPLE, THEN, UNION, USING, VALUES, WHEN, WHERE, WINDOW, WITH,
];

/// MySQL-only clause keywords layered on top of [`CLAUSE_KEYWORDS`].
pub const MYSQL_CLAUSE_KEYWORDS: &[&str] = &[STRAIGHT_JOIN];

/// Statement starters shared by every dialect. Words here begin a top-level
/// statement; the parser either has a dedicated production for them or passes
/// the statement through verbatim.
pub const ANSI_STATEMENT_STARTERS: &[&str] = &[
    ALTER, BEGIN, COMMIT, CREATE, DECLARE, DELETE, DROP, EXPLAIN, GRANT, INSERT, MERGE, REVOKE,
    ROLLBACK, SELECT, SET, START, TABLE, TRUNCATE, UPDATE, VALUES, WITH,
];

pub const POSTGRES_STATEMENT_STARTERS: &[&str] = &[
    ANALYZE, CLUSTER, COMMENT, COPY, DEALLOCATE, DISCARD, DO, LISTEN, NOTIFY, PREPARE, REFRESH,
    REINDEX, UNLISTEN, VACUUM,
];

pub const MYSQL_STATEMENT_STARTERS: &[&str] = &[DELIMITER, LOCK, RENAME, REPLACE, SHOW, UNLOCK, USE];

pub const TSQL_STATEMENT_STARTERS: &[&str] = &[BACKUP, DBCC, EXEC, EXECUTE, GO, PRINT, RESTORE, USE, WAITFOR];

/// Function keywords: names uppercased only when directly followed by `(`.
/// Kept apart from the general keyword set so `SELECT count FROM t` leaves a
/// column named `count` alone while `COUNT(*)` is uppercased.
pub const ANSI_FUNCTION_KEYWORDS: &[&str] = &[
    "ABS",
    "AVG",
    "CEIL",
    "CEILING",
    "CHAR_LENGTH",
    "CHARACTER_LENGTH",
    "COALESCE",
    "CONCAT",
    "COUNT",
    "CUME_DIST",
    "DENSE_RANK",
    "EVERY",
    "EXP",
    "FIRST_VALUE",
    "FLOOR",
    "GREATEST",
    "GROUPING",
    "LAG",
    "LAST_VALUE",
    "LEAD",
    "LEAST",
    "LEFT",
    "LENGTH",
    "LN",
    "LOWER",
    "MAX",
    "MIN",
    "MOD",
    "NTH_VALUE",
    "NTILE",
    "NULLIF",
    "OCTET_LENGTH",
    "PERCENT_RANK",
    "POWER",
    "RANK",
    "REPLACE",
    "RIGHT",
    "ROUND",
    "ROW_NUMBER",
    "SQRT",
    "STDDEV_POP",
    "STDDEV_SAMP",
    "SUM",
    "UPPER",
    "VAR_POP",
    "VAR_SAMP",
];

pub const POSTGRES_FUNCTION_KEYWORDS: &[&str] = &[
    "AGE",
    "ARRAY_AGG",
    "ARRAY_LENGTH",
    "ARRAY_TO_STRING",
    "BOOL_AND",
    "BOOL_OR",
    "CURRVAL",
    "DATE_PART",
    "DATE_TRUNC",
    "GENERATE_SERIES",
    "JSON_AGG",
    "JSON_BUILD_OBJECT",
    "JSONB_AGG",
    "JSONB_BUILD_OBJECT",
    "JSONB_OBJECT_AGG",
    "JSONB_SET",
    "MODE",
    "NEXTVAL",
    "NOW",
    "PERCENTILE_CONT",
    "PERCENTILE_DISC",
    "REGEXP_MATCHES",
    "REGEXP_REPLACE",
    "SETVAL",
    "SPLIT_PART",
    "STRING_AGG",
    "STRING_TO_ARRAY",
    "TO_CHAR",
    "TO_DATE",
    "TO_NUMBER",
    "TO_TIMESTAMP",
    "UNNEST",
];

pub const MYSQL_FUNCTION_KEYWORDS: &[&str] = &[
    "CURDATE",
    "CURTIME",
    "DATE_ADD",
    "DATE_FORMAT",
    "DATE_SUB",
    "DATEDIFF",
    "FROM_UNIXTIME",
    "GROUP_CONCAT",
    "IFNULL",
    "LAST_INSERT_ID",
    "NOW",
    "RAND",
    "STR_TO_DATE",
    "SUBSTRING_INDEX",
    "UNIX_TIMESTAMP",
];

pub const TSQL_FUNCTION_KEYWORDS: &[&str] = &[
    "CHARINDEX",
    "DATEADD",
    "DATEDIFF",
    "DATENAME",
    "DATEPART",
    "GETDATE",
    "GETUTCDATE",
    "ISNULL",
    "LEN",
    "NEWID",
    "OBJECT_ID",
    "SCOPE_IDENTITY",
    "SYSDATETIME",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_keywords_are_sorted() {
        let mut sorted = ANSI_KEYWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, ANSI_KEYWORDS);
    }

    #[test]
    fn clause_keywords_are_keywords() {
        for kw in CLAUSE_KEYWORDS {
            assert!(
                ANSI_KEYWORDS.binary_search(kw).is_ok(),
                "{kw} missing from the base recognition set"
            );
        }
    }
}
