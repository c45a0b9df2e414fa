// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Outer-to-inner join normalization (§4.5): downgrades an outer join to a narrower
//! join type when a predicate inherited from above the join is known to reject the
//! NULLs that an outer join's null-producing side contributes.
//!
//! Built directly on [`crate::interpreter::ExpressionInterpreter::optimize_with_nulls`]:
//! a predicate "rejects NULLs from side S" iff substituting every symbol of S with
//! NULL folds the predicate to FALSE or NULL.

use std::collections::HashSet;

use crate::expr::Expression;
use crate::interpreter::ExpressionInterpreter;
use crate::plan::JoinType;
use crate::symbol::Symbol;

/// Computes the narrowest join type equivalent to `join_type` under `predicate`,
/// where `predicate` is known to be applied to every row the join produces (i.e. an
/// effective predicate inherited from above, not a conjunct already pushed into the
/// join's own filter).
///
/// `left_symbols`/`right_symbols` are the output symbols of the join's two children;
/// the narrowing relies only on which side's columns the NULL-producing half of the
/// outer join would have nulled out.
pub fn try_normalize_to_inner(
    join_type: JoinType,
    left_symbols: &HashSet<Symbol>,
    right_symbols: &HashSet<Symbol>,
    predicate: &Expression,
) -> JoinType {
    match join_type {
        JoinType::Inner => JoinType::Inner,
        JoinType::Left => {
            if rejects_nulls_from(right_symbols, predicate) {
                JoinType::Inner
            } else {
                JoinType::Left
            }
        }
        JoinType::Right => {
            if rejects_nulls_from(left_symbols, predicate) {
                JoinType::Inner
            } else {
                JoinType::Right
            }
        }
        JoinType::Full => {
            let rejects_left = rejects_nulls_from(left_symbols, predicate);
            let rejects_right = rejects_nulls_from(right_symbols, predicate);
            match (rejects_left, rejects_right) {
                (true, true) => JoinType::Inner,
                // Rows where `left_symbols` are null (the right-only rows) are
                // eliminated; what remains has the shape of a left outer join.
                (true, false) => JoinType::Left,
                (false, true) => JoinType::Right,
                (false, false) => JoinType::Full,
            }
        }
    }
}

fn rejects_nulls_from(side_symbols: &HashSet<Symbol>, predicate: &Expression) -> bool {
    if side_symbols.is_empty() {
        return false;
    }
    let folded = ExpressionInterpreter::optimize_with_nulls(predicate, side_symbols);
    ExpressionInterpreter::is_false_or_null(&folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> HashSet<Symbol> {
        names.iter().map(|n| Symbol::new(n)).collect()
    }

    #[test]
    fn left_join_downgrades_to_inner_when_right_side_predicate_rejects_null() {
        let predicate = Expression::cmp(
            crate::expr::ComparisonOp::Gt,
            Expression::symbol("r.y"),
            Expression::lit_int(0),
        );
        let narrowed =
            try_normalize_to_inner(JoinType::Left, &set(&["l.x"]), &set(&["r.y"]), &predicate);
        assert_eq!(narrowed, JoinType::Inner);
    }

    #[test]
    fn left_join_stays_left_when_predicate_tolerates_null() {
        let predicate = Expression::symbol("l.x").eq(Expression::lit_int(1));
        let narrowed =
            try_normalize_to_inner(JoinType::Left, &set(&["l.x"]), &set(&["r.y"]), &predicate);
        assert_eq!(narrowed, JoinType::Left);
    }

    #[test]
    fn full_join_narrows_to_the_non_rejected_side() {
        let predicate = Expression::cmp(
            crate::expr::ComparisonOp::Gt,
            Expression::symbol("r.y"),
            Expression::lit_int(0),
        );
        let narrowed =
            try_normalize_to_inner(JoinType::Full, &set(&["l.x"]), &set(&["r.y"]), &predicate);
        assert_eq!(narrowed, JoinType::Left);
    }

    #[test]
    fn full_join_becomes_inner_when_both_sides_rejected() {
        let predicate = Expression::symbol("l.x")
            .eq(Expression::lit_int(1))
            .and(Expression::symbol("r.y").eq(Expression::lit_int(2)));
        let narrowed =
            try_normalize_to_inner(JoinType::Full, &set(&["l.x"]), &set(&["r.y"]), &predicate);
        assert_eq!(narrowed, JoinType::Inner);
    }
}
