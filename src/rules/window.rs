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

//! Window pushdown (§4.4): a conjunct is constant within a partition, so it is only
//! safe to push below the window when it's deterministic and references nothing
//! outside the partition-by columns.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::context::RuleContext;
use crate::error::{PushdownWarning, Result};
use crate::expr::{combine_conjuncts, extract_conjuncts, is_within_scope, Expression};
use crate::plan::{PlanNode, WindowNode};

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &WindowNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let partition_scope: IndexSet<_> = node.partition_by.iter().cloned().collect();

    let mut push = Vec::new();
    let mut residual = Vec::new();
    for conjunct in extract_conjuncts(inherited) {
        if crate::expr::is_deterministic(&conjunct, ctx.metadata) && is_within_scope(&conjunct, &partition_scope) {
            push.push(conjunct);
        } else {
            residual.push(conjunct);
        }
    }

    let rewritten_source =
        crate::driver::rewrite(ctx, warnings, &node.source, &combine_conjuncts(push))?;
    let new_window = Arc::new(PlanNode::Window(WindowNode {
        source: rewritten_source,
        partition_by: node.partition_by.clone(),
        output_symbols: node.output_symbols.clone(),
    }));
    Ok(new_window.wrap_in_filter(combine_conjuncts(residual)))
}
