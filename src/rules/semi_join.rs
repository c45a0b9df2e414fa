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

//! SemiJoin pushdown (§4.4): which path applies depends on whether the inherited
//! predicate references the synthesized semi-output symbol. If it doesn't, the
//! filtering side is irrelevant to the result and is rewritten with no inherited
//! knowledge at all. If it does, every source row still maps to exactly one output
//! row, so non-deterministic conjuncts may be pushed into the source side freely —
//! unlike every other join kind in this crate.

use std::sync::Arc;

use crate::context::RuleContext;
use crate::equality_inference::{scope_of, EqualityInference};
use crate::error::{PushdownWarning, Result};
use crate::expr::{
    combine_conjuncts, extract_conjuncts, free_symbols, is_deterministic, is_within_scope,
    partition_by_determinism, ComparisonOp, Expression,
};
use crate::plan::{PlanNode, SemiJoinNode};

use super::join_support::extract_checked_effective_predicate;

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &SemiJoinNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    if free_symbols(inherited).contains(&node.semi_output) {
        rewrite_filtering(ctx, warnings, node, inherited)
    } else {
        rewrite_non_filtering(ctx, warnings, node, inherited)
    }
}

fn rewrite_non_filtering(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &SemiJoinNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let source_scope = scope_of(node.source.output_symbols());
    let inference = EqualityInference::new(ctx.metadata, [inherited.clone()]);

    let mut push = Vec::new();
    let mut residual = Vec::new();
    for conjunct in extract_conjuncts(inherited) {
        if let Some(rewritten) = inference.rewrite(&conjunct, &source_scope, ctx.metadata) {
            push.push(rewritten);
        } else {
            residual.push(conjunct);
        }
    }
    push.extend(
        inference
            .generate_equalities_partitioned_by(&source_scope)
            .scope_equalities,
    );

    let rewritten_filtering =
        crate::driver::rewrite(ctx, warnings, &node.filtering_source, &Expression::lit_true())?;
    let rewritten_source = crate::driver::rewrite(ctx, warnings, &node.source, &combine_conjuncts(push))?;

    let new_node = Arc::new(PlanNode::SemiJoin(SemiJoinNode {
        source: rewritten_source,
        filtering_source: rewritten_filtering,
        source_key: node.source_key.clone(),
        filter_key: node.filter_key.clone(),
        semi_output: node.semi_output.clone(),
        output_symbols: node.output_symbols.clone(),
    }));
    Ok(new_node.wrap_in_filter(combine_conjuncts(residual)))
}

fn rewrite_filtering(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &SemiJoinNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let source_scope = scope_of(node.source.output_symbols());
    let filter_scope = scope_of(node.filtering_source.output_symbols());

    let source_effective = extract_checked_effective_predicate(ctx, &node.source, &source_scope)?;
    let filtering_effective = extract_checked_effective_predicate(ctx, &node.filtering_source, &filter_scope)?;
    let join_expr = Expression::symbol(node.source_key.clone()).eq(Expression::symbol(node.filter_key.clone()));

    let (inherited_det, _) = partition_by_determinism(inherited, ctx.metadata);
    let inherited_det_combined = combine_conjuncts(inherited_det);

    let all_inference = EqualityInference::new(
        ctx.metadata,
        [inherited_det_combined, source_effective.clone(), filtering_effective.clone(), join_expr],
    );

    let mut source_push = Vec::new();
    let mut filter_push = Vec::new();
    let mut post_join = Vec::new();

    for conjunct in extract_conjuncts(inherited) {
        if asserts_semi_output(&conjunct, &node.semi_output) {
            // Every row a SemiJoin emits satisfies its own semi-output marker by
            // construction; asserting it holds is absorbed rather than pushed.
            continue;
        }
        if is_within_scope(&conjunct, &source_scope) {
            source_push.push(conjunct);
            continue;
        }
        if is_deterministic(&conjunct, ctx.metadata) {
            if let Some(into_filter) = all_inference.rewrite(&conjunct, &filter_scope, ctx.metadata) {
                filter_push.push(into_filter);
                continue;
            }
        }
        post_join.push(conjunct);
    }

    source_push.extend(
        all_inference
            .generate_equalities_partitioned_by(&source_scope)
            .scope_equalities,
    );
    filter_push.extend(
        all_inference
            .generate_equalities_partitioned_by(&filter_scope)
            .scope_equalities,
    );

    if let Some(into_source) = all_inference.rewrite(&filtering_effective, &source_scope, ctx.metadata) {
        source_push.push(into_source);
    }
    if let Some(into_filter) = all_inference.rewrite(&source_effective, &filter_scope, ctx.metadata) {
        filter_push.push(into_filter);
    }

    let rewritten_source = crate::driver::rewrite(ctx, warnings, &node.source, &combine_conjuncts(source_push))?;
    let rewritten_filtering =
        crate::driver::rewrite(ctx, warnings, &node.filtering_source, &combine_conjuncts(filter_push))?;

    let new_node = Arc::new(PlanNode::SemiJoin(SemiJoinNode {
        source: rewritten_source,
        filtering_source: rewritten_filtering,
        source_key: node.source_key.clone(),
        filter_key: node.filter_key.clone(),
        semi_output: node.semi_output.clone(),
        output_symbols: node.output_symbols.clone(),
    }));
    Ok(new_node.wrap_in_filter(combine_conjuncts(post_join)))
}

/// Whether `conjunct` is just the semi-output symbol, or an equality asserting it's
/// `TRUE` — both forms a caller might use to test "did this row match" and both
/// trivially true for every row the SemiJoin itself emits.
fn asserts_semi_output(conjunct: &Expression, semi_output: &crate::symbol::Symbol) -> bool {
    let is_marker = |e: &Expression| matches!(e, Expression::Symbol(s) if s == semi_output);
    match conjunct {
        Expression::Symbol(s) => s == semi_output,
        Expression::Comparison(op, l, r) if *op == ComparisonOp::Eq => {
            (is_marker(l) && r.is_literal_true()) || (is_marker(r) && l.is_literal_true())
        }
        _ => false,
    }
}
