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

//! The expression IR and the boolean-algebra utilities of §4.1.
//!
//! Conjunct splitting follows RisingWave's `to_conjunctions`/`fold_boolean_constant`
//! (`expr/utils.rs`); the bottom-up substitution shape for [`inline_symbols`] follows
//! DataFusion's `replace_col`/`normalize_col` (`expr_rewriter/mod.rs`), built on top
//! of the small [`tree_node`] helper in this crate.

pub mod tree_node;

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexSet;

use crate::literal::Literal;
use crate::metadata::{FunctionId, Metadata};
use crate::symbol::Symbol;
use crate::type_system::Type;
use tree_node::Transformed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `IS DISTINCT FROM` — null-safe inequality.
    Distinct,
}

impl ComparisonOp {
    /// The operator obtained by swapping the two operands.
    fn flipped(self) -> Self {
        match self {
            ComparisonOp::Eq => ComparisonOp::Eq,
            ComparisonOp::Ne => ComparisonOp::Ne,
            ComparisonOp::Lt => ComparisonOp::Gt,
            ComparisonOp::Le => ComparisonOp::Ge,
            ComparisonOp::Gt => ComparisonOp::Lt,
            ComparisonOp::Ge => ComparisonOp::Le,
            ComparisonOp::Distinct => ComparisonOp::Distinct,
        }
    }

    /// Operands of these operators may be reordered without flipping the operator,
    /// which is what makes them usable as the commutative ops in [`canonicalize`].
    fn is_symmetric(self) -> bool {
        matches!(self, ComparisonOp::Eq | ComparisonOp::Ne | ComparisonOp::Distinct)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Distinct => "IS DISTINCT FROM",
        };
        write!(f, "{s}")
    }
}

/// The expression IR (§3). Boxed recursion keeps the enum a fixed size; structural
/// sharing of *plan* subtrees (not expression subtrees) is handled one layer up, in
/// [`crate::plan::PlanNode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Symbol(Symbol),
    Literal(Literal),
    Comparison(ComparisonOp, Box<Expression>, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    Call(FunctionId, Vec<Expression>),
    Cast(Box<Expression>, Type),
    /// Opaque to `inline_symbols`/pushdown inlining (§3 invariant). Still traversed by
    /// `canonicalize` and determinism checks, since those never substitute symbols.
    Try(Box<Expression>),
    /// Dynamic-filter probe marker (§6), `DYNAMIC_FILTER(id, probe)`. Opaque to
    /// downstream rewrites; carried only by the probe side of an inner equi-join.
    DynamicFilter(String, Symbol),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Symbol(s) => write!(f, "{s}"),
            Expression::Literal(l) => write!(f, "{l}"),
            Expression::Comparison(op, l, r) => write!(f, "({l} {op} {r})"),
            Expression::And(l, r) => write!(f, "({l} AND {r})"),
            Expression::Or(l, r) => write!(f, "({l} OR {r})"),
            Expression::Not(e) => write!(f, "(NOT {e})"),
            Expression::Call(fun, args) => {
                let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{fun}({})", rendered.join(", "))
            }
            Expression::Cast(e, t) => write!(f, "CAST({e} AS {t:?})"),
            Expression::Try(e) => write!(f, "TRY({e})"),
            Expression::DynamicFilter(id, probe) => write!(f, "DYNAMIC_FILTER({id}, {probe})"),
        }
    }
}

impl Expression {
    pub fn symbol(name: impl Into<Symbol>) -> Expression {
        Expression::Symbol(name.into())
    }

    pub fn lit_true() -> Expression {
        Expression::Literal(Literal::TRUE)
    }

    pub fn lit_false() -> Expression {
        Expression::Literal(Literal::FALSE)
    }

    pub fn lit_int(v: i64) -> Expression {
        Expression::Literal(Literal::Int64(v))
    }

    pub fn lit_float(v: f64) -> Expression {
        Expression::Literal(Literal::Float64(v))
    }

    pub fn is_literal_true(&self) -> bool {
        matches!(self, Expression::Literal(Literal::Boolean(true)))
    }

    pub fn is_literal_false(&self) -> bool {
        matches!(self, Expression::Literal(Literal::Boolean(false)))
    }

    pub fn eq(self, other: Expression) -> Expression {
        Expression::Comparison(ComparisonOp::Eq, Box::new(self), Box::new(other))
    }

    pub fn and(self, other: Expression) -> Expression {
        Expression::And(Box::new(self), Box::new(other))
    }

    pub fn cmp(op: ComparisonOp, left: Expression, right: Expression) -> Expression {
        Expression::Comparison(op, Box::new(left), Box::new(right))
    }
}

/// Flattens nested AND into a list of top-level conjuncts (§4.1).
pub fn extract_conjuncts(expr: &Expression) -> Vec<Expression> {
    let mut leaves = Vec::new();
    flatten(true, expr.clone(), &mut leaves);

    let mut out = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        if leaf.is_literal_true() {
            continue;
        }
        if leaf.is_literal_false() {
            return vec![Expression::lit_false()];
        }
        out.push(leaf);
    }
    out
}

/// Recombines a conjunct list into a single expression (§4.1). Empty -> TRUE,
/// singleton -> itself, any FALSE member -> FALSE, duplicates removed.
pub fn combine_conjuncts(conjuncts: impl IntoIterator<Item = Expression>) -> Expression {
    let mut deduped: Vec<Expression> = Vec::new();
    for c in conjuncts {
        if c.is_literal_true() {
            continue;
        }
        if c.is_literal_false() {
            return Expression::lit_false();
        }
        if !deduped.contains(&c) {
            deduped.push(c);
        }
    }
    match deduped.len() {
        0 => Expression::lit_true(),
        1 => deduped.into_iter().next().unwrap(),
        _ => deduped.into_iter().reduce(Expression::and).unwrap(),
    }
}

fn flatten(is_and: bool, expr: Expression, out: &mut Vec<Expression>) {
    match (&expr, is_and) {
        (Expression::And(_, _), true) => {
            if let Expression::And(l, r) = expr {
                flatten(true, *l, out);
                flatten(true, *r, out);
            }
        }
        (Expression::Or(_, _), false) => {
            if let Expression::Or(l, r) = expr {
                flatten(false, *l, out);
                flatten(false, *r, out);
            }
        }
        _ => out.push(expr),
    }
}

/// TRUE iff no subexpression is a non-deterministic function call; `rand`-like
/// primitives and their ilk are resolved via `metadata`. A `Try` is deterministic iff
/// its body is.
pub fn is_deterministic(expr: &Expression, metadata: &dyn Metadata) -> bool {
    match expr {
        Expression::Symbol(_) | Expression::Literal(_) | Expression::DynamicFilter(_, _) => true,
        Expression::Comparison(_, l, r) | Expression::And(l, r) | Expression::Or(l, r) => {
            is_deterministic(l, metadata) && is_deterministic(r, metadata)
        }
        Expression::Not(e) | Expression::Cast(e, _) | Expression::Try(e) => {
            is_deterministic(e, metadata)
        }
        Expression::Call(function, args) => {
            metadata.is_deterministic(function) && args.iter().all(|a| is_deterministic(a, metadata))
        }
    }
}

/// `combine` of only the deterministic conjuncts of `expr`.
pub fn filter_deterministic_conjuncts(expr: &Expression, metadata: &dyn Metadata) -> Expression {
    combine_conjuncts(
        extract_conjuncts(expr)
            .into_iter()
            .filter(|c| is_deterministic(c, metadata)),
    )
}

/// Splits the conjuncts of `expr` into (deterministic, non_deterministic).
pub fn partition_by_determinism(
    expr: &Expression,
    metadata: &dyn Metadata,
) -> (Vec<Expression>, Vec<Expression>) {
    extract_conjuncts(expr)
        .into_iter()
        .partition(|c| is_deterministic(c, metadata))
}

/// TRUE iff any subexpression is a [`Expression::Try`].
pub fn contains_try(expr: &Expression) -> bool {
    match expr {
        Expression::Try(_) => true,
        Expression::Symbol(_) | Expression::Literal(_) | Expression::DynamicFilter(_, _) => false,
        Expression::Comparison(_, l, r) | Expression::And(l, r) | Expression::Or(l, r) => {
            contains_try(l) || contains_try(r)
        }
        Expression::Not(e) | Expression::Cast(e, _) => contains_try(e),
        Expression::Call(_, args) => args.iter().any(contains_try),
    }
}

/// Free symbols referenced by `expr`, in pre-order traversal order.
pub fn free_symbols(expr: &Expression) -> IndexSet<Symbol> {
    let mut out = IndexSet::new();
    collect_symbols(expr, &mut out);
    out
}

fn collect_symbols(expr: &Expression, out: &mut IndexSet<Symbol>) {
    match expr {
        Expression::Symbol(s) => {
            out.insert(s.clone());
        }
        Expression::Literal(_) => {}
        Expression::Comparison(_, l, r) | Expression::And(l, r) | Expression::Or(l, r) => {
            collect_symbols(l, out);
            collect_symbols(r, out);
        }
        Expression::Not(e) | Expression::Cast(e, _) | Expression::Try(e) => collect_symbols(e, out),
        Expression::Call(_, args) => {
            for a in args {
                collect_symbols(a, out);
            }
        }
        Expression::DynamicFilter(_, probe) => {
            out.insert(probe.clone());
        }
    }
}

/// Recursively rewrites symbol references by `mapping`, never descending into a
/// `Try` body (§3 invariant, §4.1).
pub fn inline_symbols(mapping: &HashMap<Symbol, Expression>, expr: &Expression) -> Expression {
    tree_node::transform(expr, &mut |e| {
        if let Expression::Symbol(s) = &e {
            if let Some(replacement) = mapping.get(s) {
                return Transformed::yes(replacement.clone());
            }
        }
        Transformed::no(e)
    })
}

/// Structural equality after canonicalization (commutative-operand ordering, constant
/// folding of boolean/numeric literals).
pub fn are_equivalent(a: &Expression, b: &Expression) -> bool {
    canonicalize(a) == canonicalize(b)
}

/// Canonicalizes `expr`: orders the operands of symmetric comparisons and of AND/OR
/// deterministically, folds boolean short-circuits and literal-literal comparisons,
/// and deduplicates AND/OR leaves. See Design Note (b) in §9 — this is the single
/// canonical form backing both `are_equivalent` and "did this rewrite change
/// anything" checks throughout the driver.
pub fn canonicalize(expr: &Expression) -> Expression {
    match expr {
        Expression::Symbol(_) | Expression::Literal(_) | Expression::DynamicFilter(_, _) => {
            expr.clone()
        }
        Expression::Not(e) => {
            let inner = canonicalize(e);
            if let Expression::Literal(Literal::Boolean(b)) = inner {
                Expression::Literal(Literal::Boolean(!b))
            } else {
                Expression::Not(Box::new(inner))
            }
        }
        Expression::Cast(e, t) => Expression::Cast(Box::new(canonicalize(e)), *t),
        Expression::Try(e) => Expression::Try(Box::new(canonicalize(e))),
        Expression::Call(function, args) => {
            Expression::Call(function.clone(), args.iter().map(canonicalize).collect())
        }
        Expression::Comparison(op, l, r) => {
            let cl = canonicalize(l);
            let cr = canonicalize(r);
            if let (Expression::Literal(a), Expression::Literal(b)) = (&cl, &cr) {
                if let Some(folded) = fold_comparison(*op, a, b) {
                    return Expression::Literal(folded);
                }
            }
            if op.is_symmetric() && cl.to_string() > cr.to_string() {
                Expression::Comparison(op.flipped(), Box::new(cr), Box::new(cl))
            } else {
                Expression::Comparison(*op, Box::new(cl), Box::new(cr))
            }
        }
        Expression::And(l, r) => combine_canonical_commutative(true, l, r),
        Expression::Or(l, r) => combine_canonical_commutative(false, l, r),
    }
}

fn combine_canonical_commutative(is_and: bool, l: &Expression, r: &Expression) -> Expression {
    let mut leaves = Vec::new();
    flatten(is_and, canonicalize(l), &mut leaves);
    flatten(is_and, canonicalize(r), &mut leaves);

    // AND identity is TRUE (dropped), absorbing is FALSE; OR is the mirror image.
    let identity_val = is_and;
    let absorbing_val = !is_and;

    let mut out: Vec<Expression> = Vec::new();
    for leaf in leaves {
        if let Expression::Literal(Literal::Boolean(b)) = &leaf {
            if *b == absorbing_val {
                return Expression::Literal(Literal::Boolean(absorbing_val));
            }
            if *b == identity_val {
                continue;
            }
        }
        if !out.contains(&leaf) {
            out.push(leaf);
        }
    }
    out.sort_by(|a, b| a.to_string().cmp(&b.to_string()));

    match out.len() {
        0 => Expression::Literal(Literal::Boolean(identity_val)),
        1 => out.into_iter().next().unwrap(),
        _ => out
            .into_iter()
            .reduce(|a, b| {
                if is_and {
                    Expression::And(Box::new(a), Box::new(b))
                } else {
                    Expression::Or(Box::new(a), Box::new(b))
                }
            })
            .unwrap(),
    }
}

fn fold_comparison(op: ComparisonOp, a: &Literal, b: &Literal) -> Option<Literal> {
    if matches!(a, Literal::Null) || matches!(b, Literal::Null) {
        return Some(match op {
            ComparisonOp::Distinct => {
                Literal::Boolean(!matches!((a, b), (Literal::Null, Literal::Null)))
            }
            _ => Literal::Null,
        });
    }

    let ordering = match (a, b) {
        (Literal::Int64(x), Literal::Int64(y)) => x.partial_cmp(y),
        (Literal::Float64(x), Literal::Float64(y)) => x.partial_cmp(y),
        (Literal::Int64(x), Literal::Float64(y)) => (*x as f64).partial_cmp(y),
        (Literal::Float64(x), Literal::Int64(y)) => x.partial_cmp(&(*y as f64)),
        (Literal::Boolean(x), Literal::Boolean(y)) => x.partial_cmp(y),
        _ => None,
    }?;

    use std::cmp::Ordering::*;
    let result = match op {
        ComparisonOp::Eq => ordering == Equal,
        ComparisonOp::Ne => ordering != Equal,
        ComparisonOp::Lt => ordering == Less,
        ComparisonOp::Le => ordering != Greater,
        ComparisonOp::Gt => ordering == Greater,
        ComparisonOp::Ge => ordering != Less,
        ComparisonOp::Distinct => ordering != Equal,
    };
    Some(Literal::Boolean(result))
}

/// Whether `expr`'s free symbols are entirely contained in `scope`.
pub fn is_within_scope(expr: &Expression, scope: &IndexSet<Symbol>) -> bool {
    free_symbols(expr).iter().all(|s| scope.contains(s))
}

/// Removes a `Cast(e, t)` wrapper when `type_provider` reports `e` already has type
/// `t`, bottom-up. Used by the Project rule after inlining assignments (§4.4).
pub fn unwrap_redundant_casts(
    expr: &Expression,
    type_provider: &dyn crate::type_system::TypeProvider,
) -> Expression {
    tree_node::transform(expr, &mut |e| {
        if let Expression::Cast(inner, target) = &e {
            if type_provider.get_type(inner) == *target {
                return Transformed::yes((**inner).clone());
            }
        }
        Transformed::no(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::StaticMetadata;

    fn sym(name: &str) -> Expression {
        Expression::symbol(name)
    }

    #[test]
    fn extract_drops_true_and_short_circuits_on_false() {
        let e = sym("a").eq(Expression::lit_int(1)).and(Expression::lit_true());
        assert_eq!(extract_conjuncts(&e), vec![sym("a").eq(Expression::lit_int(1))]);

        let f = sym("a").eq(Expression::lit_int(1)).and(Expression::lit_false());
        assert_eq!(extract_conjuncts(&f), vec![Expression::lit_false()]);
    }

    #[test]
    fn combine_empty_is_true_and_dedups() {
        assert_eq!(combine_conjuncts(vec![]), Expression::lit_true());
        let c = sym("a").eq(Expression::lit_int(1));
        assert_eq!(combine_conjuncts(vec![c.clone(), c.clone()]), c);
        assert_eq!(
            combine_conjuncts(vec![c.clone(), Expression::lit_false()]),
            Expression::lit_false()
        );
    }

    #[test]
    fn determinism_checks_function_calls() {
        let metadata = StaticMetadata::new();
        let call = Expression::Call(crate::metadata::FunctionId::new("rand"), vec![]);
        assert!(!is_deterministic(&call, &metadata));
        assert!(is_deterministic(&sym("a"), &metadata));

        let wrapped = Expression::Try(Box::new(call.clone()));
        assert!(!is_deterministic(&wrapped, &metadata));
    }

    #[test]
    fn inline_symbols_never_enters_try() {
        let mut mapping = HashMap::new();
        mapping.insert(Symbol::new("a"), Expression::lit_int(99));
        let inside_try = Expression::Try(Box::new(sym("a")));
        assert_eq!(inline_symbols(&mapping, &inside_try), inside_try);

        let outside = sym("a").eq(Expression::lit_int(1));
        assert_eq!(
            inline_symbols(&mapping, &outside),
            Expression::lit_int(99).eq(Expression::lit_int(1))
        );
    }

    #[test]
    fn canonicalize_orders_symmetric_comparisons() {
        let a = sym("b").eq(sym("a"));
        let b = sym("a").eq(sym("b"));
        assert_eq!(canonicalize(&a), canonicalize(&b));
        assert!(are_equivalent(&a, &b));
    }

    #[test]
    fn canonicalize_folds_and_or_short_circuit() {
        let e = sym("a").eq(Expression::lit_int(1)).and(Expression::lit_false());
        assert_eq!(canonicalize(&e), Expression::lit_false());

        let e2 = Expression::Or(Box::new(sym("a").eq(Expression::lit_int(1))), Box::new(Expression::lit_true()));
        assert_eq!(canonicalize(&e2), Expression::lit_true());
    }

    #[test]
    fn null_propagates_through_comparisons_but_not_distinct() {
        assert_eq!(fold_comparison(ComparisonOp::Eq, &Literal::Null, &Literal::Int64(1)), Some(Literal::Null));
        assert_eq!(
            fold_comparison(ComparisonOp::Distinct, &Literal::Null, &Literal::Int64(1)),
            Some(Literal::Boolean(true))
        );
        assert_eq!(
            fold_comparison(ComparisonOp::Distinct, &Literal::Null, &Literal::Null),
            Some(Literal::Boolean(false))
        );
    }
}
