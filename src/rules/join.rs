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

//! Join pushdown (§4.4 steps 1-9): normalizes the join type, splits predicates
//! across both sides via [`super::inner_join`]/[`super::outer_join`], re-derives
//! equi-clauses from what's left, synthesizes dynamic filters, recurses, and
//! reconstructs the join node.

use std::collections::HashSet;
use std::sync::Arc;

use crate::context::RuleContext;
use crate::equality_inference::scope_of;
use crate::error::{PushdownError, PushdownWarning, Result};
use crate::expr::{combine_conjuncts, free_symbols, is_deterministic, ComparisonOp, Expression};
use crate::interpreter::ExpressionInterpreter;
use crate::join_normalizer::try_normalize_to_inner;
use crate::metadata::Metadata;
use crate::plan::{JoinNode, JoinType, PlanNode};
use crate::symbol::Symbol;

use super::inner_join::process_inner_join;
use super::join_support::{
    derive_equi_clauses, ensure_output_symbols, extract_checked_effective_predicate, synthesize_dynamic_filters,
};
use super::outer_join::process_limited_outer_join;

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &JoinNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let left_output: HashSet<_> = node.left.output_symbols().into_iter().collect();
    let right_output: HashSet<_> = node.right.output_symbols().into_iter().collect();
    let left_scope = scope_of(left_output.iter().cloned());
    let right_scope = scope_of(right_output.iter().cloned());

    let left_effective = extract_checked_effective_predicate(ctx, &node.left, &left_scope)?;
    let right_effective = extract_checked_effective_predicate(ctx, &node.right, &right_scope)?;

    warn_if_effective_predicate_discarded(warnings, "left", &left_effective, ctx.metadata, &node.equi_clauses);
    warn_if_effective_predicate_discarded(warnings, "right", &right_effective, ctx.metadata, &node.equi_clauses);

    let normalization_context = inherited.clone().and(left_effective.clone()).and(right_effective.clone());
    let join_type = try_normalize_to_inner(node.join_type, &left_output, &right_output, &normalization_context);
    if join_type != node.join_type {
        log::debug!("join: downgrading {:?} to {:?} on null-rejecting predicate", node.join_type, join_type);
    }

    let join_predicate = combine_conjuncts(
        node.equi_clauses
            .iter()
            .map(|(l, r)| Expression::symbol(l.clone()).eq(Expression::symbol(r.clone())))
            .chain(node.filter.clone()),
    );

    let (left_push, right_push, join_residual, post_join) = match join_type {
        JoinType::Inner => {
            let split = process_inner_join(
                ctx,
                &left_scope,
                &right_scope,
                inherited,
                &join_predicate,
                &left_effective,
                &right_effective,
            );
            (split.left_push, split.right_push, split.join_residual, Expression::lit_true())
        }
        JoinType::Left => {
            let split = process_limited_outer_join(
                ctx,
                &left_scope,
                &right_scope,
                inherited,
                &join_predicate,
                &left_effective,
                &right_effective,
            );
            (split.outer_push, split.inner_push, split.join_residual, split.post_join)
        }
        JoinType::Right => {
            let split = process_limited_outer_join(
                ctx,
                &right_scope,
                &left_scope,
                inherited,
                &join_predicate,
                &right_effective,
                &left_effective,
            );
            (split.inner_push, split.outer_push, split.join_residual, split.post_join)
        }
        JoinType::Full => (Expression::lit_true(), Expression::lit_true(), join_predicate.clone(), inherited.clone()),
    };

    let mut new_join_predicate = ExpressionInterpreter::optimize(&join_residual);
    if new_join_predicate.is_literal_false() {
        new_join_predicate = Expression::cmp(ComparisonOp::Eq, Expression::lit_int(0), Expression::lit_int(1));
    }

    let derived = derive_equi_clauses(
        ctx,
        node.left.clone(),
        node.right.clone(),
        &left_scope,
        &right_scope,
        &new_join_predicate,
    );

    let equi_clauses = derived.equi_clauses;
    let mut join_filter = if derived.residual_filter.is_literal_true() {
        None
    } else {
        let detail = format!(
            "join: conjunct `{}` could not be localized to either side or expressed as an equi-clause; kept as a residual join filter",
            derived.residual_filter
        );
        log::warn!("{detail}");
        warnings.push(PushdownWarning::ResidualConjunctRetained { detail });
        Some(derived.residual_filter)
    };
    let mut post_join = post_join;

    if join_type == JoinType::Inner && join_filter.is_some() && equi_clauses.is_empty() {
        log::debug!("join: no equi-clauses remain, moving residual filter above a nested-loop join");
        post_join = post_join.and(join_filter.take().unwrap());
    }

    let mut dynamic_filters = node.dynamic_filters.clone();
    dynamic_filters.clear();
    let left_push = if join_type == JoinType::Inner {
        synthesize_dynamic_filters(ctx, &equi_clauses, &mut dynamic_filters, left_push)
    } else {
        left_push
    };

    let rewritten_left = crate::driver::rewrite(ctx, warnings, &derived.left, &left_push)?;
    let rewritten_right = crate::driver::rewrite(ctx, warnings, &derived.right, &right_push)?;

    if !matches!(join_type, JoinType::Inner) && !dynamic_filters.is_empty() {
        return Err(PushdownError::UnsupportedJoinType(format!(
            "dynamic filters are only valid on INNER joins, got {join_type:?}"
        )));
    }

    let new_join = Arc::new(PlanNode::Join(JoinNode {
        join_type,
        left: rewritten_left,
        right: rewritten_right,
        equi_clauses,
        filter: join_filter,
        output_symbols: node.output_symbols.clone(),
        dynamic_filters,
    }));

    let new_join = ensure_output_symbols(new_join, &node.output_symbols);
    Ok(new_join.wrap_in_filter(ExpressionInterpreter::optimize(&post_join)))
}

/// An effective predicate can only ever inform the *other* side through an
/// equi-clause bridging the two; a non-trivial, deterministic effective predicate
/// whose symbols appear in no equi-clause had no path across the join at all and is
/// dropped rather than cross-pushed.
fn warn_if_effective_predicate_discarded(
    warnings: &mut Vec<PushdownWarning>,
    side: &str,
    effective: &Expression,
    metadata: &dyn Metadata,
    equi_clauses: &[(Symbol, Symbol)],
) {
    if effective.is_literal_true() || !is_deterministic(effective, metadata) {
        return;
    }
    let bridged = free_symbols(effective)
        .iter()
        .any(|s| equi_clauses.iter().any(|(l, r)| l == s || r == s));
    if !bridged {
        let detail = format!(
            "join: {side} effective predicate `{effective}` has no equi-clause bridging it to the other side; dropped rather than cross-pushed"
        );
        log::warn!("{detail}");
        warnings.push(PushdownWarning::EffectivePredicateIgnored { detail });
    }
}
