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

//! MarkDistinct pushdown (§4.4): a conjunct over only the distinct-marked symbols is
//! unaffected by the presence of the distinct marker column, so it pushes through
//! unconditionally.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::context::RuleContext;
use crate::error::{PushdownWarning, Result};
use crate::expr::{combine_conjuncts, extract_conjuncts, is_within_scope, Expression};
use crate::plan::{MarkDistinctNode, PlanNode};

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &MarkDistinctNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let scope: IndexSet<_> = node.distinct_symbols.iter().cloned().collect();

    let (push, residual): (Vec<_>, Vec<_>) = extract_conjuncts(inherited)
        .into_iter()
        .partition(|c| is_within_scope(c, &scope));

    let rewritten_source =
        crate::driver::rewrite(ctx, warnings, &node.source, &combine_conjuncts(push))?;
    let new_node = Arc::new(PlanNode::MarkDistinct(MarkDistinctNode {
        source: rewritten_source,
        distinct_symbols: node.distinct_symbols.clone(),
        marker_symbol: node.marker_symbol.clone(),
        output_symbols: node.output_symbols.clone(),
    }));
    Ok(new_node.wrap_in_filter(combine_conjuncts(residual)))
}
