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

#![warn(clippy::all)]
//! Recovery, passthrough, the callback surface, and the driver's guard
//! rails.

use std::cell::RefCell;

use pretty_assertions::assert_eq;
use sqlfmt::dialect::DialectProfile;
use sqlfmt::{format, FormatError, FormatOptions};

#[test]
fn broken_statement_is_preserved_and_reported() {
    let events: RefCell<Vec<(usize, usize, String)>> = RefCell::new(Vec::new());
    let options = FormatOptions {
        on_recover: Some(Box::new(|_error, raw, context| {
            events.borrow_mut().push((
                context.statement_index,
                context.total_statements,
                raw.map(|r| r.text.clone()).unwrap_or_default(),
            ));
        })),
        ..FormatOptions::default()
    };
    let out = format("SELECT 1; SELECT (; SELECT 2;", options).unwrap();
    assert_eq!(out, "SELECT 1;\n\nSELECT (;\n\nSELECT 2;\n");
    assert_eq!(events.into_inner(), vec![(2, 3, "SELECT (;".to_string())]);
}

#[test]
fn recovery_disabled_propagates_the_error() {
    let options = FormatOptions {
        recover: false,
        ..FormatOptions::default()
    };
    match format("SELECT (;", options) {
        Err(FormatError::Parse(_)) => {}
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn passthrough_fires_its_own_callback() {
    let seen: RefCell<Vec<(usize, usize, String)>> = RefCell::new(Vec::new());
    let options = FormatOptions {
        dialect: DialectProfile::postgres(),
        on_passthrough: Some(Box::new(|raw, context| {
            seen.borrow_mut().push((
                context.statement_index,
                context.total_statements,
                raw.text.clone(),
            ));
        })),
        ..FormatOptions::default()
    };
    let out = format("vacuum full; select 1;", options).unwrap();
    assert_eq!(out, "vacuum full;\n\nSELECT 1;\n");
    assert_eq!(seen.into_inner(), vec![(1, 2, "vacuum full;".to_string())]);
}

#[test]
fn comment_only_input_becomes_a_comment_block() {
    assert_eq!(format("-- nothing to do\n", FormatOptions::default()).unwrap(), "-- nothing to do\n");
}

#[test]
fn blank_input_formats_to_empty() {
    assert_eq!(format("", FormatOptions::default()).unwrap(), "");
    assert_eq!(format("   \n\t  ", FormatOptions::default()).unwrap(), "");
}

#[test]
fn oversized_input_is_rejected() {
    let options = FormatOptions {
        max_input_size: 4,
        ..FormatOptions::default()
    };
    match format("SELECT 1;", options) {
        Err(FormatError::InputTooLarge { size: 9, max: 4 }) => {}
        other => panic!("expected InputTooLarge, got {other:?}"),
    }
}

#[test]
fn token_budget_is_enforced() {
    let options = FormatOptions {
        max_token_count: Some(2),
        ..FormatOptions::default()
    };
    match format("SELECT 1 + 2;", options) {
        Err(FormatError::Tokenize(_)) => {}
        other => panic!("expected a tokenize error, got {other:?}"),
    }
}

#[test]
fn unterminated_string_aborts_even_with_recovery() {
    match format("select 'oops", FormatOptions::default()) {
        Err(FormatError::Tokenize(_)) => {}
        other => panic!("expected a tokenize error, got {other:?}"),
    }
}

#[test]
fn pathological_nesting_trips_the_depth_guard() {
    let mut sql = String::from("SELECT ");
    for _ in 0..300 {
        sql.push('(');
    }
    sql.push('1');
    for _ in 0..300 {
        sql.push(')');
    }
    sql.push(';');
    match format(&sql, FormatOptions::default()) {
        Err(FormatError::MaxDepth) => {}
        other => panic!("expected MaxDepth, got {other:?}"),
    }
}

#[test]
fn unknown_statement_kind_recovers() {
    let out = format("FROB the database; SELECT 1;", FormatOptions::default()).unwrap();
    assert_eq!(out, "FROB the database;\n\nSELECT 1;\n");
}

#[test]
fn drop_hook_not_called_for_ordinary_recovery() {
    let dropped = RefCell::new(0usize);
    let options = FormatOptions {
        on_drop_statement: Some(Box::new(|_error, _context| {
            *dropped.borrow_mut() += 1;
        })),
        ..FormatOptions::default()
    };
    format("SELECT (; SELECT 2;", options).unwrap();
    assert_eq!(dropped.into_inner(), 0);
}

#[test]
fn line_length_is_clamped_to_forty() {
    let options = FormatOptions {
        max_line_length: 10,
        ..FormatOptions::default()
    };
    let out = format(
        "select aaaaaaaaaa, bbbbbbbbbb, cccccccccc from t;",
        options,
    )
    .unwrap();
    // With the clamp at 40 the three 10-column names break one per line.
    assert_eq!(
        out,
        "SELECT aaaaaaaaaa,\n\
         \x20      bbbbbbbbbb,\n\
         \x20      cccccccccc\n\
         \x20 FROM t;\n",
    );
}
