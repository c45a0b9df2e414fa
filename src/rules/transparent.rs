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

//! Transparent carriers (§1 Non-goals, §4.4): Sort and Sample pass the inherited
//! predicate through unchanged. AssignUniqueId does too, but first asserts the
//! predicate does not reference the column it just synthesized — that column
//! carries no information about source rows, so a predicate over it could never
//! have been satisfiable before this node existed, and letting it through would be a
//! correctness bug, not a missed optimization.

use std::sync::Arc;

use crate::context::RuleContext;
use crate::error::{PushdownError, PushdownWarning, Result};
use crate::expr::{free_symbols, Expression};
use crate::plan::{AssignUniqueIdNode, PlanNode, SampleNode, SortNode};

pub fn rewrite_sort(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &SortNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let rewritten_source = crate::driver::rewrite(ctx, warnings, &node.source, inherited)?;
    Ok(Arc::new(PlanNode::Sort(SortNode {
        source: rewritten_source,
        output_symbols: node.output_symbols.clone(),
    })))
}

pub fn rewrite_sample(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &SampleNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let rewritten_source = crate::driver::rewrite(ctx, warnings, &node.source, inherited)?;
    Ok(Arc::new(PlanNode::Sample(SampleNode {
        source: rewritten_source,
        output_symbols: node.output_symbols.clone(),
    })))
}

pub fn rewrite_assign_unique_id(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &AssignUniqueIdNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    if free_symbols(inherited).contains(&node.id_column) {
        return Err(PushdownError::IdColumnReferenced {
            id_column: node.id_column.clone(),
        });
    }
    let rewritten_source = crate::driver::rewrite(ctx, warnings, &node.source, inherited)?;
    Ok(Arc::new(PlanNode::AssignUniqueId(AssignUniqueIdNode {
        source: rewritten_source,
        id_column: node.id_column.clone(),
        output_symbols: node.output_symbols.clone(),
    })))
}
