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

//! The expression-interpreter collaborator (§6): constant folding, plus the
//! NULL-substitution helper the join normalizer (§4.5) uses to decide whether an
//! inherited predicate rejects NULLs from a join's null-producing side. Modeled on
//! RisingWave's `fold_boolean_constant` (`expr/utils.rs`), generalized from pure
//! boolean constants to the full literal-comparison folding `canonicalize` already
//! performs.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::expr::{canonicalize, inline_symbols, Expression};
use crate::literal::Literal;
use crate::symbol::Symbol;

pub struct ExpressionInterpreter;

impl ExpressionInterpreter {
    /// Constant-folds `expr`'s deterministic subtrees. Delegates to
    /// [`canonicalize`], which is exactly this crate's constant-folding +
    /// canonical-ordering pass (§9 Design Note (b)).
    pub fn optimize(expr: &Expression) -> Expression {
        canonicalize(expr)
    }

    /// Substitutes every symbol in `symbols` with NULL, then folds. Used by
    /// [`crate::join_normalizer::try_normalize_to_outer_to_inner_join`] to test
    /// whether a predicate rejects NULLs contributed by a join's null-producing
    /// side.
    pub fn optimize_with_nulls(expr: &Expression, symbols: &HashSet<Symbol>) -> Expression {
        let mapping: HashMap<Symbol, Expression> = symbols
            .iter()
            .map(|s| (s.clone(), Expression::Literal(Literal::Null)))
            .collect();
        Self::optimize(&inline_symbols(&mapping, expr))
    }

    /// `true` iff `expr` folds to the literal FALSE or NULL.
    pub fn is_false_or_null(expr: &Expression) -> bool {
        matches!(
            Self::optimize(expr),
            Expression::Literal(Literal::Boolean(false)) | Expression::Literal(Literal::Null)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_substitution_rejects_predicate() {
        let predicate = Expression::symbol("r.y").cmp_gt(Expression::lit_int(0));
        let symbols: HashSet<Symbol> = [Symbol::new("r.y")].into_iter().collect();
        let folded = ExpressionInterpreter::optimize_with_nulls(&predicate, &symbols);
        assert!(ExpressionInterpreter::is_false_or_null(&folded));
    }
}

// Small ergonomic helper kept local to this module's tests: `>` isn't exposed as a
// method on `Expression` elsewhere in this crate since rules construct comparisons
// via `Expression::cmp` directly.
#[cfg(test)]
impl Expression {
    fn cmp_gt(self, other: Expression) -> Expression {
        Expression::cmp(crate::expr::ComparisonOp::Gt, self, other)
    }
}
