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

//! Filter fusion (§4.4): a Filter node never survives on its own — its predicate is
//! folded into the inherited predicate handed to its source, and whatever can't be
//! pushed further is re-materialized by whichever descendant rule hits a wall.

use std::sync::Arc;

use crate::context::RuleContext;
use crate::error::{PushdownWarning, Result};
use crate::expr::Expression;
use crate::plan::{FilterNode, PlanNode};

pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &FilterNode,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    let combined = node.predicate.clone().and(inherited.clone());
    crate::driver::rewrite(ctx, warnings, &node.source, &combined)
}
