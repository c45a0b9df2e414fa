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

//! Aggregation pushdown (§4.4): a conjunct survives the aggregation only if it is
//! determined entirely by the grouping keys, since rows sharing a grouping key are
//! collapsed into one. The group-id synthetic symbol, where present, is never in
//! scope for pushdown (it encodes which grouping set produced a row, not a source
//! column).

use std::sync::Arc;

use crate::context::RuleContext;
use crate::equality_inference::{scope_of, EqualityInference};
use crate::error::{PushdownWarning, Result};
use crate::expr::{combine_conjuncts, extract_conjuncts, free_symbols, is_deterministic, Expression};
use crate::plan::{AggregationNode, PlanNode};

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &AggregationNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    if node.grouping_sets.iter().all(|set| set.is_empty()) {
        let rewritten_source =
            crate::driver::rewrite(ctx, warnings, &node.source, &Expression::lit_true())?;
        let new_agg = Arc::new(PlanNode::Aggregation(AggregationNode {
            source: rewritten_source,
            aggregations: node.aggregations.clone(),
            grouping_sets: node.grouping_sets.clone(),
            group_id_symbol: node.group_id_symbol.clone(),
            output_symbols: node.output_symbols.clone(),
        }));
        return Ok(new_agg.wrap_in_filter(inherited.clone()));
    }

    let grouping_keys = node.grouping_keys();
    let grouping_scope = scope_of(grouping_keys.iter().cloned());

    let mut push = Vec::new();
    let mut residual = Vec::new();
    for conjunct in extract_conjuncts(inherited) {
        let free = free_symbols(&conjunct);
        if let Some(group_id) = &node.group_id_symbol {
            if free.contains(group_id) {
                residual.push(conjunct);
                continue;
            }
        }
        if is_deterministic(&conjunct, ctx.metadata) && free.iter().all(|s| grouping_scope.contains(s)) {
            push.push(conjunct);
        } else {
            residual.push(conjunct);
        }
    }

    let inference = EqualityInference::new(ctx.metadata, [inherited.clone()]);
    let partition = inference.generate_equalities_partitioned_by(&grouping_scope);
    push.extend(partition.scope_equalities);

    let rewritten_source =
        crate::driver::rewrite(ctx, warnings, &node.source, &combine_conjuncts(push))?;
    let new_agg = Arc::new(PlanNode::Aggregation(AggregationNode {
        source: rewritten_source,
        aggregations: node.aggregations.clone(),
        grouping_sets: node.grouping_sets.clone(),
        group_id_symbol: node.group_id_symbol.clone(),
        output_symbols: node.output_symbols.clone(),
    }));
    Ok(new_agg.wrap_in_filter(combine_conjuncts(residual)))
}
