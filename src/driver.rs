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

//! The top-down driver (§4.3, §6): a single recursive `rewrite` carrying one
//! inherited-predicate accumulator, dispatching on `PlanNode` variant to the rule
//! in [`crate::rules`] that owns that operator's split policy.

use std::sync::Arc;

use crate::context::RuleContext;
use crate::error::{PushdownWarning, Result};
use crate::expr::Expression;
use crate::metadata::Metadata;
use crate::plan::effective_predicate::EffectivePredicateExtractor;
use crate::plan::PlanNode;
use crate::rules;
use crate::session::SessionConfig;
use crate::symbol::{PlanNodeIdAllocator, SymbolAllocator};
use crate::type_system::TypeProvider;

/// Entry point (§6): `optimize(plan, session, ...) -> Result<PlanNode>`. Idempotent
/// in the sense of §8 property 3 — a second pass over the output is a no-op.
#[allow(clippy::too_many_arguments)]
pub fn optimize(
    plan: &Arc<PlanNode>,
    session: &SessionConfig,
    metadata: &dyn Metadata,
    type_provider: &dyn TypeProvider,
    effective_predicates: &dyn EffectivePredicateExtractor,
    symbols: &SymbolAllocator,
    plan_ids: &PlanNodeIdAllocator,
    warnings: &mut Vec<PushdownWarning>,
) -> Result<Arc<PlanNode>> {
    let ctx = RuleContext {
        session,
        metadata,
        type_provider,
        effective_predicates,
        symbols,
        plan_ids,
    };
    rewrite(&ctx, warnings, plan, &Expression::lit_true())
}

/// Visits one node, top-down. The default policy for a node with no dedicated
/// rule — unreachable today, every variant is handled, but kept so a future
/// operator can opt in without touching every call site — recurses on children
/// with TRUE and wraps the result in a Filter carrying the inherited predicate.
pub fn rewrite(
    ctx: &RuleContext,
    warnings: &mut Vec<PushdownWarning>,
    node: &Arc<PlanNode>,
    inherited: &Expression,
) -> Result<Arc<PlanNode>> {
    log::trace!("visiting {} (inherited_is_true={})", node_kind(node), inherited.is_literal_true());

    match node.as_ref() {
        PlanNode::Filter(n) => rules::filter::rewrite(ctx, warnings, n, inherited),
        PlanNode::TableScan(n) => Ok(rules::table_scan::rewrite(n, inherited)),
        PlanNode::Project(n) => rules::project::rewrite(ctx, warnings, n, inherited),
        PlanNode::Window(n) => rules::window::rewrite(ctx, warnings, n, inherited),
        PlanNode::Aggregation(n) => rules::aggregation::rewrite(ctx, warnings, n, inherited),
        PlanNode::GroupId(n) => rules::group_id::rewrite(ctx, warnings, n, inherited),
        PlanNode::MarkDistinct(n) => rules::mark_distinct::rewrite(ctx, warnings, n, inherited),
        PlanNode::Union(n) => rules::union::rewrite(ctx, warnings, n, inherited),
        PlanNode::Exchange(n) => rules::exchange::rewrite(ctx, warnings, n, inherited),
        PlanNode::Sort(n) => rules::transparent::rewrite_sort(ctx, warnings, n, inherited),
        PlanNode::Sample(n) => rules::transparent::rewrite_sample(ctx, warnings, n, inherited),
        PlanNode::AssignUniqueId(n) => rules::transparent::rewrite_assign_unique_id(ctx, warnings, n, inherited),
        PlanNode::Unnest(n) => rules::unnest::rewrite(ctx, warnings, n, inherited),
        PlanNode::Join(n) => rules::join::rewrite(ctx, warnings, n, inherited),
        PlanNode::SemiJoin(n) => rules::semi_join::rewrite(ctx, warnings, n, inherited),
        PlanNode::SpatialJoin(n) => rules::spatial_join::rewrite(ctx, warnings, n, inherited),
    }
}

fn node_kind(node: &PlanNode) -> &'static str {
    match node {
        PlanNode::Filter(_) => "Filter",
        PlanNode::Project(_) => "Project",
        PlanNode::Join(_) => "Join",
        PlanNode::SemiJoin(_) => "SemiJoin",
        PlanNode::SpatialJoin(_) => "SpatialJoin",
        PlanNode::Aggregation(_) => "Aggregation",
        PlanNode::Union(_) => "Union",
        PlanNode::Exchange(_) => "Exchange",
        PlanNode::Window(_) => "Window",
        PlanNode::GroupId(_) => "GroupId",
        PlanNode::MarkDistinct(_) => "MarkDistinct",
        PlanNode::Unnest(_) => "Unnest",
        PlanNode::Sort(_) => "Sort",
        PlanNode::Sample(_) => "Sample",
        PlanNode::TableScan(_) => "TableScan",
        PlanNode::AssignUniqueId(_) => "AssignUniqueId",
    }
}
