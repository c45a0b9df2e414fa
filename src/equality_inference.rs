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

//! Equality-inference engine (§4.2): builds equivalence classes from deterministic
//! equality conjuncts and rewrites/partitions expressions against a symbol scope.
//!
//! The quadripartite split performed by [`EqualityInference::generate_equalities_partitioned_by`]
//! generalizes the two-way left/right/join/keep split in `optd`'s
//! `filter_pushdown.rs::separate_join_conds` from a single join condition to an
//! arbitrary equivalence-class structure built from several source expressions.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::expr::{canonicalize, extract_conjuncts, free_symbols, is_deterministic, ComparisonOp, Expression};
use crate::metadata::Metadata;
use crate::symbol::Symbol;

/// A scope of symbols an expression must be rewritten into, or checked against.
pub type SymbolScope = IndexSet<Symbol>;

pub fn scope_of(symbols: impl IntoIterator<Item = Symbol>) -> SymbolScope {
    symbols.into_iter().collect()
}

#[derive(Debug, Clone, Default)]
pub struct EqualityPartition {
    /// Equalities among members of a class that all lie in `scope`.
    pub scope_equalities: Vec<Expression>,
    /// Equalities among members that all lie outside `scope`.
    pub scope_complement_equalities: Vec<Expression>,
    /// At most one equality per class bridging an in-scope and out-of-scope member.
    pub scope_straddling_equalities: Vec<Expression>,
}

impl EqualityPartition {
    pub fn is_empty(&self) -> bool {
        self.scope_equalities.is_empty()
            && self.scope_complement_equalities.is_empty()
            && self.scope_straddling_equalities.is_empty()
    }
}

/// An equivalence-class structure over the deterministic top-level equalities found
/// in one or more source expressions (§4.2). Built once per call site; no shared
/// mutable state.
#[derive(Debug, Clone, Default)]
pub struct EqualityInference {
    classes: Vec<Vec<Expression>>,
}

impl EqualityInference {
    /// Builds an inference from the deterministic equality conjuncts found across
    /// `sources`. Non-deterministic equalities and equalities involving a
    /// `Try`-expression side are not absorbed (they remain "non-inferrable" and are
    /// left to [`non_inferrable_conjuncts`]).
    pub fn new<I>(metadata: &dyn Metadata, sources: I) -> Self
    where
        I: IntoIterator<Item = Expression>,
    {
        let mut members: HashMap<Expression, usize> = HashMap::new();
        let mut classes: Vec<Vec<Expression>> = Vec::new();

        for source in sources {
            for conjunct in extract_conjuncts(&source) {
                if !is_deterministic(&conjunct, metadata) {
                    continue;
                }
                if let Expression::Comparison(ComparisonOp::Eq, l, r) = &conjunct {
                    if crate::expr::contains_try(l) || crate::expr::contains_try(r) {
                        continue;
                    }
                    let cl = canonicalize(l);
                    let cr = canonicalize(r);
                    if cl == cr {
                        continue;
                    }
                    let li = find_or_insert(&mut members, &mut classes, cl);
                    let ri = find_or_insert(&mut members, &mut classes, cr);
                    union(&mut members, &mut classes, li, ri);
                }
            }
        }

        classes.retain(|c| c.len() > 1);
        EqualityInference { classes }
    }

    /// Attempts to produce an expression equivalent to `conjunct` whose free symbols
    /// all lie in `scope`, substituting out-of-scope members of an equivalence class
    /// with a deterministically-chosen in-scope representative. `None` if some
    /// out-of-scope symbol has no in-scope representative, or if `conjunct` is
    /// non-deterministic or contains a `Try`.
    pub fn rewrite(
        &self,
        conjunct: &Expression,
        scope: &SymbolScope,
        metadata: &dyn Metadata,
    ) -> Option<Expression> {
        if !is_deterministic(conjunct, metadata) || crate::expr::contains_try(conjunct) {
            return None;
        }

        let free = free_symbols(conjunct);
        if free.iter().all(|s| scope.contains(s)) {
            return Some(conjunct.clone());
        }

        let mut mapping = HashMap::new();
        for sym in &free {
            if scope.contains(sym) {
                continue;
            }
            let sym_expr = Expression::Symbol(sym.clone());
            let representative = self.in_scope_representative(&sym_expr, scope)?;
            mapping.insert(sym.clone(), representative);
        }

        let rewritten = crate::expr::inline_symbols(&mapping, conjunct);
        if free_symbols(&rewritten).iter().all(|s| scope.contains(s)) {
            Some(rewritten)
        } else {
            None
        }
    }

    /// For each equivalence class, partitions its members by containment in `scope`
    /// and emits the corresponding in-scope, out-of-scope, and (at most one)
    /// straddling equality.
    pub fn generate_equalities_partitioned_by(&self, scope: &SymbolScope) -> EqualityPartition {
        let mut partition = EqualityPartition::default();

        for class in &self.classes {
            let (mut in_scope, mut out_scope): (Vec<&Expression>, Vec<&Expression>) = class
                .iter()
                .partition(|m| free_symbols(m).iter().all(|s| scope.contains(s)));

            in_scope.sort_by_key(|m| m.to_string());
            out_scope.sort_by_key(|m| m.to_string());

            for pair in in_scope.windows(2) {
                partition.scope_equalities.push(pair[0].clone().eq(pair[1].clone()));
            }
            for pair in out_scope.windows(2) {
                partition
                    .scope_complement_equalities
                    .push(pair[0].clone().eq(pair[1].clone()));
            }
            if let (Some(i), Some(o)) = (in_scope.first(), out_scope.first()) {
                partition
                    .scope_straddling_equalities
                    .push((*i).clone().eq((*o).clone()));
            }
        }

        partition
    }

    fn in_scope_representative(&self, expr: &Expression, scope: &SymbolScope) -> Option<Expression> {
        let canon = canonicalize(expr);
        let class = self.classes.iter().find(|c| c.contains(&canon))?;
        let mut candidates: Vec<&Expression> = class
            .iter()
            .filter(|m| free_symbols(m).iter().all(|s| scope.contains(s)))
            .collect();
        // Deterministic tie-break: shortest rendered form, then lexicographic (§4.2).
        candidates.sort_by(|a, b| {
            let (ra, rb) = (a.to_string(), b.to_string());
            ra.len().cmp(&rb.len()).then_with(|| ra.cmp(&rb))
        });
        candidates.first().map(|e| (*e).clone())
    }
}

fn find_or_insert(
    members: &mut HashMap<Expression, usize>,
    classes: &mut Vec<Vec<Expression>>,
    expr: Expression,
) -> usize {
    if let Some(&idx) = members.get(&expr) {
        return idx;
    }
    let idx = classes.len();
    members.insert(expr.clone(), idx);
    classes.push(vec![expr]);
    idx
}

fn union(members: &mut HashMap<Expression, usize>, classes: &mut Vec<Vec<Expression>>, a: usize, b: usize) {
    if a == b {
        return;
    }
    let (keep, drop) = if a < b { (a, b) } else { (b, a) };
    let moved = std::mem::take(&mut classes[drop]);
    for member in &moved {
        members.insert(member.clone(), keep);
    }
    classes[keep].extend(moved);
}

/// Conjuncts of `expr` that are not plain deterministic equalities, i.e. were not
/// absorbed into any [`EqualityInference`] built over `expr` (§4.2).
pub fn non_inferrable_conjuncts(expr: &Expression, metadata: &dyn Metadata) -> Vec<Expression> {
    extract_conjuncts(expr)
        .into_iter()
        .filter(|c| {
            let is_plain_equality = matches!(c, Expression::Comparison(ComparisonOp::Eq, l, r)
                if !crate::expr::contains_try(l) && !crate::expr::contains_try(r));
            !(is_deterministic(c, metadata) && is_plain_equality)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::StaticMetadata;

    fn sym(name: &str) -> Expression {
        Expression::symbol(name)
    }

    #[test]
    fn transitive_closure_rewrites_into_scope() {
        let metadata = StaticMetadata::new();
        let inference = EqualityInference::new(&metadata, vec![sym("l.x").eq(sym("r.x"))]);

        let left_scope = scope_of([Symbol::new("l.x")]);
        let rewritten = inference
            .rewrite(&sym("r.x").eq(Expression::lit_int(5)), &left_scope, &metadata)
            .expect("rewrite into left scope should succeed");
        assert!(crate::expr::is_within_scope(&rewritten, &left_scope));
    }

    #[test]
    fn rewrite_fails_without_in_scope_representative() {
        let metadata = StaticMetadata::new();
        let inference = EqualityInference::new(&metadata, vec![sym("l.x").eq(sym("r.x"))]);
        let unrelated_scope = scope_of([Symbol::new("z")]);
        assert!(inference
            .rewrite(&sym("r.x").eq(Expression::lit_int(5)), &unrelated_scope, &metadata)
            .is_none());
    }

    #[test]
    fn partition_emits_straddling_equality_once_per_class() {
        let metadata = StaticMetadata::new();
        let inference = EqualityInference::new(
            &metadata,
            vec![sym("l.x").eq(sym("r.x")), sym("r.x").eq(sym("r.y"))],
        );
        let left_scope = scope_of([Symbol::new("l.x")]);
        let partition = inference.generate_equalities_partitioned_by(&left_scope);
        assert_eq!(partition.scope_straddling_equalities.len(), 1);
        assert_eq!(partition.scope_complement_equalities.len(), 1);
        assert!(partition.scope_equalities.is_empty());
    }

    #[test]
    fn non_inferrable_conjuncts_excludes_plain_equalities() {
        let metadata = StaticMetadata::new();
        let expr = sym("a").eq(sym("b")).and(sym("c").eq(Expression::lit_int(3)).and(
            Expression::Comparison(ComparisonOp::Lt, Box::new(sym("d")), Box::new(Expression::lit_int(1))),
        ));
        let remaining = non_inferrable_conjuncts(&expr, &metadata);
        assert_eq!(remaining.len(), 1);
    }
}
