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

//! Union pushdown (§4.4): the whole inherited predicate is renamed into each
//! child's own symbols and recursed into, so no residual Filter is ever needed
//! above a Union (S4).

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::RuleContext;
use crate::error::{PushdownWarning, Result};
use crate::expr::{inline_symbols, Expression};
use crate::plan::{PlanNode, UnionNode};

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &UnionNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let mut rewritten_sources = Vec::with_capacity(node.sources.len());
    for (i, source) in node.sources.iter().enumerate() {
        let mapping: HashMap<_, _> = node
            .symbol_mapping
            .iter()
            .map(|(output, per_source)| (output.clone(), Expression::Symbol(per_source[i].clone())))
            .collect();
        let child_predicate = inline_symbols(&mapping, inherited);
        rewritten_sources.push(crate::driver::rewrite(ctx, warnings, source, &child_predicate)?);
    }

    Ok(Arc::new(PlanNode::Union(UnionNode {
        sources: rewritten_sources,
        symbol_mapping: node.symbol_mapping.clone(),
        output_symbols: node.output_symbols.clone(),
    })))
}
