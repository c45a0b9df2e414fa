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

//! Project pushdown (§4.4): inlines conjuncts that are cheap to substitute through
//! the projection's assignments, leaving the rest as a residual Filter above.
//!
//! "Cheap" follows the same single-use-or-trivial heuristic DataFusion's
//! `expr_rewriter` applies when deciding whether to inline an alias: an assignment
//! that is itself a bare symbol or literal is always free to inline; anything more
//! complex is only inlined into a conjunct that references it exactly once, so
//! inlining never duplicates a non-trivial computation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::RuleContext;
use crate::error::{PushdownWarning, Result};
use crate::expr::{
    combine_conjuncts, extract_conjuncts, free_symbols, partition_by_determinism,
    unwrap_redundant_casts, Expression,
};
use crate::plan::{PlanNode, ProjectNode};
use crate::symbol::Symbol;

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &ProjectNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let (deterministic, non_deterministic) = partition_by_determinism(inherited, ctx.metadata);

    let mut usage_count: HashMap<Symbol, usize> = HashMap::new();
    for conjunct in &deterministic {
        for sym in free_symbols(conjunct) {
            *usage_count.entry(sym).or_insert(0) += 1;
        }
    }

    let is_cheap = |sym: &Symbol| {
        matches!(
            node.assignments.get(sym),
            Some(Expression::Symbol(_)) | Some(Expression::Literal(_))
        )
    };

    let mut push = Vec::new();
    let mut residual = Vec::new();
    for conjunct in deterministic {
        let free = free_symbols(&conjunct);
        let inlinable = free.iter().all(|sym| {
            !node.assignments.contains_key(sym)
                || is_cheap(sym)
                || usage_count.get(sym).copied().unwrap_or(0) == 1
        });
        if inlinable {
            push.push(conjunct);
        } else {
            residual.push(conjunct);
        }
    }
    residual.extend(non_deterministic);

    let mapping: HashMap<Symbol, Expression> = node
        .assignments
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let push_predicate = combine_conjuncts(push.into_iter().map(|c| {
        let inlined = crate::expr::inline_symbols(&mapping, &c);
        unwrap_redundant_casts(&inlined, ctx.type_provider)
    }));
    let residual_predicate = combine_conjuncts(residual);

    let rewritten_source = crate::driver::rewrite(ctx, warnings, &node.source, &push_predicate)?;
    let new_project = Arc::new(PlanNode::Project(ProjectNode {
        source: rewritten_source,
        assignments: node.assignments.clone(),
    }));

    Ok(new_project.wrap_in_filter(residual_predicate))
}
