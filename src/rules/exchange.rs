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

//! Exchange pushdown (§4.4): identical to Union, except the per-source renaming
//! comes from the positional `inputs[i]` list aligned with `output_symbols` rather
//! than an explicit output->per-source mapping.

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::RuleContext;
use crate::error::{PushdownWarning, Result};
use crate::expr::{inline_symbols, Expression};
use crate::plan::{ExchangeNode, PlanNode};

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &ExchangeNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let mut rewritten_sources = Vec::with_capacity(node.sources.len());
    for (i, source) in node.sources.iter().enumerate() {
        let mapping: HashMap<_, _> = node
            .output_symbols
            .iter()
            .zip(node.inputs[i].iter())
            .map(|(output, input)| (output.clone(), Expression::Symbol(input.clone())))
            .collect();
        let child_predicate = inline_symbols(&mapping, inherited);
        rewritten_sources.push(crate::driver::rewrite(ctx, warnings, source, &child_predicate)?);
    }

    Ok(Arc::new(PlanNode::Exchange(ExchangeNode {
        sources: rewritten_sources,
        inputs: node.inputs.clone(),
        output_symbols: node.output_symbols.clone(),
    })))
}
