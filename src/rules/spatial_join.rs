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

//! SpatialJoin pushdown (§4.4): INNER and LEFT only. Reuses the inner/outer split
//! logic, but never re-derives equi-clauses or dynamic filters — a spatial
//! predicate (e.g. `ST_Contains`) is not an equality comparison. Unlike a regular
//! join, a spatial join that loses its predicate entirely can't fall back to a
//! `0 = 1` placeholder, since there's no equi-clause machinery downstream to accept
//! one; that case is a fatal invariant violation instead.

use std::collections::HashSet;
use std::sync::Arc;

use crate::context::RuleContext;
use crate::equality_inference::scope_of;
use crate::error::{PushdownError, PushdownWarning, Result};
use crate::interpreter::ExpressionInterpreter;
use crate::join_normalizer::try_normalize_to_inner;
use crate::plan::{JoinType, PlanNode, SpatialJoinNode};

use super::inner_join::process_inner_join;
use super::join_support::{ensure_output_symbols, extract_checked_effective_predicate};
use super::outer_join::process_limited_outer_join;
use crate::expr::Expression;

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &SpatialJoinNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let left_output: HashSet<_> = node.left.output_symbols().into_iter().collect();
    let right_output: HashSet<_> = node.right.output_symbols().into_iter().collect();
    let left_scope = scope_of(left_output.iter().cloned());
    let right_scope = scope_of(right_output.iter().cloned());

    let left_effective = extract_checked_effective_predicate(ctx, &node.left, &left_scope)?;
    let right_effective = extract_checked_effective_predicate(ctx, &node.right, &right_scope)?;
    let normalization_context = inherited.clone().and(left_effective.clone()).and(right_effective.clone());
    let join_type = try_normalize_to_inner(node.join_type, &left_output, &right_output, &normalization_context);

    let (left_push, right_push, join_residual, post_join) = match join_type {
        JoinType::Inner => {
            let split = process_inner_join(
                ctx,
                &left_scope,
                &right_scope,
                inherited,
                &node.predicate,
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
                &node.predicate,
                &left_effective,
                &right_effective,
            );
            (split.outer_push, split.inner_push, split.join_residual, split.post_join)
        }
        other => {
            return Err(PushdownError::UnsupportedJoinType(format!(
                "spatial join does not support {other:?}"
            )))
        }
    };

    let simplified_predicate = ExpressionInterpreter::optimize(&join_residual);
    if simplified_predicate.is_literal_false() {
        return Err(PushdownError::MissingSpatialPredicate);
    }

    let rewritten_left = crate::driver::rewrite(ctx, warnings, &node.left, &left_push)?;
    let rewritten_right = crate::driver::rewrite(ctx, warnings, &node.right, &right_push)?;

    let new_node = Arc::new(PlanNode::SpatialJoin(SpatialJoinNode {
        join_type,
        left: rewritten_left,
        right: rewritten_right,
        predicate: simplified_predicate,
        output_symbols: node.output_symbols.clone(),
    }));
    let new_node = ensure_output_symbols(new_node, &node.output_symbols);
    Ok(new_node.wrap_in_filter(post_join))
}
