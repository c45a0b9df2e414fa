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

//! GroupId pushdown (§4.4): a conjunct is only safe to push when it lands entirely
//! on grouping columns present in *every* grouping set (`common_grouping_columns`)
//! — a column absent from some set is NULL-padded there, and a conjunct over it
//! would behave differently per grouping set.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexSet;

use crate::context::RuleContext;
use crate::error::{PushdownWarning, Result};
use crate::expr::{combine_conjuncts, extract_conjuncts, free_symbols, inline_symbols, is_deterministic, Expression};
use crate::plan::{GroupIdNode, PlanNode};

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &GroupIdNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let common: IndexSet<_> = node.common_grouping_columns().into_iter().collect();
    let rename: HashMap<_, _> = node
        .grouping_columns
        .iter()
        .map(|(output, source)| (output.clone(), Expression::Symbol(source.clone())))
        .collect();

    let mut push = Vec::new();
    let mut residual = Vec::new();
    for conjunct in extract_conjuncts(inherited) {
        let free = free_symbols(&conjunct);
        if is_deterministic(&conjunct, ctx.metadata) && free.iter().all(|s| common.contains(s)) {
            push.push(inline_symbols(&rename, &conjunct));
        } else {
            residual.push(conjunct);
        }
    }

    let rewritten_source =
        crate::driver::rewrite(ctx, warnings, &node.source, &combine_conjuncts(push))?;
    let new_node = Arc::new(PlanNode::GroupId(GroupIdNode {
        source: rewritten_source,
        grouping_columns: node.grouping_columns.clone(),
        grouping_sets: node.grouping_sets.clone(),
        group_id_symbol: node.group_id_symbol.clone(),
        output_symbols: node.output_symbols.clone(),
    }));
    Ok(new_node.wrap_in_filter(combine_conjuncts(residual)))
}
