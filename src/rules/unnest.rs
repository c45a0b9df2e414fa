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

//! Unnest pushdown (§4.4). RIGHT/FULL unnests may manufacture rows with a NULL
//! replicate side, so nothing is pushed; LEFT/INNER unnests push deterministic
//! conjuncts over the replicated (outer) columns only — the unnested columns don't
//! exist until after this node runs.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::context::RuleContext;
use crate::error::{PushdownWarning, Result};
use crate::expr::{combine_conjuncts, extract_conjuncts, is_deterministic, is_within_scope, Expression};
use crate::plan::{JoinType, PlanNode, UnnestNode};

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &UnnestNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    if matches!(node.join_type, JoinType::Right | JoinType::Full) {
        let rewritten_source =
            crate::driver::rewrite(ctx, warnings, &node.source, &Expression::lit_true())?;
        let new_node = Arc::new(PlanNode::Unnest(UnnestNode {
            source: rewritten_source,
            replicate_symbols: node.replicate_symbols.clone(),
            unnest_symbols: node.unnest_symbols.clone(),
            join_type: node.join_type,
            filter: node.filter.clone(),
            output_symbols: node.output_symbols.clone(),
        }));
        return Ok(new_node.wrap_in_filter(inherited.clone()));
    }

    let scope: IndexSet<_> = node.replicate_symbols.iter().cloned().collect();
    let mut push = Vec::new();
    let mut residual = Vec::new();
    for conjunct in extract_conjuncts(inherited) {
        if is_deterministic(&conjunct, ctx.metadata) && is_within_scope(&conjunct, &scope) {
            push.push(conjunct);
        } else {
            residual.push(conjunct);
        }
    }

    let rewritten_source =
        crate::driver::rewrite(ctx, warnings, &node.source, &combine_conjuncts(push))?;
    let new_node = Arc::new(PlanNode::Unnest(UnnestNode {
        source: rewritten_source,
        replicate_symbols: node.replicate_symbols.clone(),
        unnest_symbols: node.unnest_symbols.clone(),
        join_type: node.join_type,
        filter: node.filter.clone(),
        output_symbols: node.output_symbols.clone(),
    }));
    Ok(new_node.wrap_in_filter(combine_conjuncts(residual)))
}
