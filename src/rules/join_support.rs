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

//! Shared machinery for the Join/SemiJoin/SpatialJoin family (§4.4 steps 4-9):
//! equi-clause re-derivation, dynamic-filter synthesis, and the output-symbol
//! contract check every join reconstruction must pass through.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::context::RuleContext;
use crate::dynamic_filter::{dynamic_filter_marker, next_dynamic_filter_id};
use crate::equality_inference::SymbolScope;
use crate::error::{PushdownError, Result};
use crate::expr::{
    combine_conjuncts, extract_conjuncts, free_symbols, is_deterministic, is_within_scope, ComparisonOp, Expression,
};
use crate::plan::{PlanNode, ProjectNode};
use crate::symbol::Symbol;
use crate::type_system::Type;

/// Result of re-scanning a join's combined predicate for equi-clauses (§4.4 step 5).
pub struct DerivedEquiClauses {
    pub left: Arc<PlanNode>,
    pub right: Arc<PlanNode>,
    pub equi_clauses: Vec<(Symbol, Symbol)>,
    pub residual_filter: Expression,
}

/// Scans `predicate` for deterministic equality conjuncts whose two sides partition
/// cleanly across `left_scope`/`right_scope`. A non-symbol equi-clause side is
/// materialized via an identity-plus-one Project over its owning child so the
/// reconstructed join can reference it as a bare symbol.
pub fn derive_equi_clauses(
    ctx: &RuleContext,
    left: Arc<PlanNode>,
    right: Arc<PlanNode>,
    left_scope: &SymbolScope,
    right_scope: &SymbolScope,
    predicate: &Expression,
) -> DerivedEquiClauses {
    let mut equi_clauses = Vec::new();
    let mut residual_conjuncts = Vec::new();
    let mut left_extra: IndexMap<Symbol, Expression> = IndexMap::new();
    let mut right_extra: IndexMap<Symbol, Expression> = IndexMap::new();

    for conjunct in extract_conjuncts(predicate) {
        let materialized = match &conjunct {
            Expression::Comparison(ComparisonOp::Eq, l, r) if is_deterministic(&conjunct, ctx.metadata) => {
                classify_equi_sides(l, r, left_scope, right_scope)
                    .or_else(|| classify_equi_sides(r, l, left_scope, right_scope))
            }
            _ => None,
        };

        match materialized {
            Some((left_expr, right_expr)) => {
                let left_sym = symbol_or_materialize(left_expr, &mut left_extra, ctx);
                let right_sym = symbol_or_materialize(right_expr, &mut right_extra, ctx);
                equi_clauses.push((left_sym, right_sym));
            }
            None => residual_conjuncts.push(conjunct),
        }
    }

    let left = wrap_with_extra_assignments(left, left_extra);
    let right = wrap_with_extra_assignments(right, right_extra);

    DerivedEquiClauses {
        left,
        right,
        equi_clauses,
        residual_filter: combine_conjuncts(residual_conjuncts),
    }
}

/// If `l` lies wholly in `left_scope` and `r` wholly in `right_scope` (and neither
/// straddles both), returns `(l, r)` in left-then-right order.
fn classify_equi_sides<'a>(
    l: &'a Expression,
    r: &'a Expression,
    left_scope: &SymbolScope,
    right_scope: &SymbolScope,
) -> Option<(&'a Expression, &'a Expression)> {
    let l_left = is_within_scope(l, left_scope);
    let l_right = is_within_scope(l, right_scope);
    let r_left = is_within_scope(r, left_scope);
    let r_right = is_within_scope(r, right_scope);
    if l_left && !l_right && r_right && !r_left {
        Some((l, r))
    } else {
        None
    }
}

fn symbol_or_materialize(
    expr: &Expression,
    extra: &mut IndexMap<Symbol, Expression>,
    ctx: &RuleContext,
) -> Symbol {
    if let Expression::Symbol(s) = expr {
        return s.clone();
    }
    let fresh = ctx.symbols.new_symbol("eq", &Type::Unknown);
    extra.insert(fresh.clone(), expr.clone());
    fresh
}

fn wrap_with_extra_assignments(source: Arc<PlanNode>, extra: IndexMap<Symbol, Expression>) -> Arc<PlanNode> {
    if extra.is_empty() {
        return source;
    }
    let mut assignments: IndexMap<Symbol, Expression> = source
        .output_symbols()
        .into_iter()
        .map(|s| (s.clone(), Expression::Symbol(s)))
        .collect();
    assignments.extend(extra);
    Arc::new(PlanNode::Project(ProjectNode { source, assignments }))
}

/// Registers one dynamic-filter marker per equi-clause on `dynamic_filters`, and
/// folds the corresponding `DYNAMIC_FILTER` marker into `left_predicate` — the
/// probe side. Build symbol is the clause's right-hand (inner/build) side (§4.4
/// step 6, §6).
pub fn synthesize_dynamic_filters(
    ctx: &RuleContext,
    equi_clauses: &[(Symbol, Symbol)],
    dynamic_filters: &mut IndexMap<String, Symbol>,
    left_predicate: Expression,
) -> Expression {
    if !ctx.session.enable_dynamic_filtering {
        return left_predicate;
    }
    let mut predicate = left_predicate;
    for (probe_symbol, build_symbol) in equi_clauses {
        let id = next_dynamic_filter_id(ctx.plan_ids);
        dynamic_filters.insert(id.clone(), build_symbol.clone());
        predicate = predicate.and(dynamic_filter_marker(&id, probe_symbol));
    }
    predicate
}

/// Extracts the effective predicate for `plan` and enforces the scope-containment
/// invariant (§7): every symbol it mentions must be one `plan` actually outputs. A
/// catalog-backed `EffectivePredicateExtractor` that reports a symbol outside its own
/// subplan has violated its contract and this is a fatal error, not a warning.
pub fn extract_checked_effective_predicate(
    ctx: &RuleContext,
    plan: &PlanNode,
    scope: &SymbolScope,
) -> Result<Expression> {
    let effective = ctx.effective_predicates.extract(ctx.session, plan);
    if let Some(symbol) = free_symbols(&effective).into_iter().find(|s| !scope.contains(s)) {
        return Err(PushdownError::EffectivePredicateScopeViolation { symbol });
    }
    Ok(effective)
}

/// Wraps `plan` in an identity Project if its output symbols differ from
/// `desired` — the output-symbol preservation invariant (§3) every join
/// reconstruction must uphold even though, in practice, this crate's own join
/// rewrites never change a join's declared output symbols.
pub fn ensure_output_symbols(plan: Arc<PlanNode>, desired: &[Symbol]) -> Arc<PlanNode> {
    if plan.output_symbols() == desired {
        return plan;
    }
    let assignments = desired
        .iter()
        .cloned()
        .map(|s| (s.clone(), Expression::Symbol(s)))
        .collect();
    Arc::new(PlanNode::Project(ProjectNode { source: plan, assignments }))
}
