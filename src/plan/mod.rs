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

//! The logical plan IR (§3): a tagged-variant `PlanNode` enum, one struct per
//! operator, following the variant-per-operator shape of RisingWave's
//! `optimizer/plan_node/mod.rs` and the plan-node fields exercised by `optd`'s
//! `filter_pushdown.rs` (`LogicalFilter`, `LogicalJoin`, `LogicalProjection`).

pub mod effective_predicate;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::expr::Expression;
use crate::metadata::FunctionId;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn is_outer(self) -> bool {
        !matches!(self, JoinType::Inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCall {
    pub function: FunctionId,
    pub args: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct FilterNode {
    pub source: Arc<PlanNode>,
    pub predicate: Expression,
}

#[derive(Debug, Clone)]
pub struct ProjectNode {
    pub source: Arc<PlanNode>,
    /// Ordered Symbol -> Expression mapping; iteration order is the output column
    /// order (§9 builder-pattern design note).
    pub assignments: IndexMap<Symbol, Expression>,
}

#[derive(Debug, Clone)]
pub struct JoinNode {
    pub join_type: JoinType,
    pub left: Arc<PlanNode>,
    pub right: Arc<PlanNode>,
    pub equi_clauses: Vec<(Symbol, Symbol)>,
    pub filter: Option<Expression>,
    pub output_symbols: Vec<Symbol>,
    /// Dynamic-filter id -> build-side symbol (§4.4 step 6, §6).
    pub dynamic_filters: IndexMap<String, Symbol>,
}

#[derive(Debug, Clone)]
pub struct SemiJoinNode {
    pub source: Arc<PlanNode>,
    pub filtering_source: Arc<PlanNode>,
    pub source_key: Symbol,
    pub filter_key: Symbol,
    pub semi_output: Symbol,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct SpatialJoinNode {
    pub join_type: JoinType,
    pub left: Arc<PlanNode>,
    pub right: Arc<PlanNode>,
    pub predicate: Expression,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct AggregationNode {
    pub source: Arc<PlanNode>,
    pub aggregations: IndexMap<Symbol, AggregateCall>,
    pub grouping_sets: Vec<Vec<Symbol>>,
    pub group_id_symbol: Option<Symbol>,
    pub output_symbols: Vec<Symbol>,
}

impl AggregationNode {
    /// Grouping keys, i.e. the union of every grouping set (order-preserving,
    /// deduplicated).
    pub fn grouping_keys(&self) -> Vec<Symbol> {
        let mut keys = Vec::new();
        for set in &self.grouping_sets {
            for sym in set {
                if !keys.contains(sym) {
                    keys.push(sym.clone());
                }
            }
        }
        keys
    }
}

#[derive(Debug, Clone)]
pub struct UnionNode {
    pub sources: Vec<Arc<PlanNode>>,
    /// output symbol -> per-source symbol, aligned with `sources`.
    pub symbol_mapping: IndexMap<Symbol, Vec<Symbol>>,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct ExchangeNode {
    pub sources: Vec<Arc<PlanNode>>,
    /// Per-source ordered symbol list, aligned with `output_symbols`.
    pub inputs: Vec<Vec<Symbol>>,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct WindowNode {
    pub source: Arc<PlanNode>,
    pub partition_by: Vec<Symbol>,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct GroupIdNode {
    pub source: Arc<PlanNode>,
    /// output grouping symbol -> source symbol.
    pub grouping_columns: IndexMap<Symbol, Symbol>,
    /// Each grouping set, expressed in *output* grouping symbols.
    pub grouping_sets: Vec<Vec<Symbol>>,
    pub group_id_symbol: Symbol,
    pub output_symbols: Vec<Symbol>,
}

impl GroupIdNode {
    /// Grouping columns present in every grouping set (§4.4).
    pub fn common_grouping_columns(&self) -> Vec<Symbol> {
        let mut iter = self.grouping_sets.iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };
        first
            .iter()
            .filter(|sym| self.grouping_sets.iter().all(|set| set.contains(sym)))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct MarkDistinctNode {
    pub source: Arc<PlanNode>,
    pub distinct_symbols: Vec<Symbol>,
    pub marker_symbol: Symbol,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct UnnestNode {
    pub source: Arc<PlanNode>,
    pub replicate_symbols: Vec<Symbol>,
    pub unnest_symbols: Vec<Symbol>,
    pub join_type: JoinType,
    pub filter: Option<Expression>,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct SortNode {
    pub source: Arc<PlanNode>,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct SampleNode {
    pub source: Arc<PlanNode>,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct TableScanNode {
    pub table_name: String,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct AssignUniqueIdNode {
    pub source: Arc<PlanNode>,
    pub id_column: Symbol,
    pub output_symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub enum PlanNode {
    Filter(FilterNode),
    Project(ProjectNode),
    Join(JoinNode),
    SemiJoin(SemiJoinNode),
    SpatialJoin(SpatialJoinNode),
    Aggregation(AggregationNode),
    Union(UnionNode),
    Exchange(ExchangeNode),
    Window(WindowNode),
    GroupId(GroupIdNode),
    MarkDistinct(MarkDistinctNode),
    Unnest(UnnestNode),
    Sort(SortNode),
    Sample(SampleNode),
    TableScan(TableScanNode),
    AssignUniqueId(AssignUniqueIdNode),
}

impl PlanNode {
    /// Every `PlanNode` exposes a deterministic list of output symbols (§3 invariant).
    pub fn output_symbols(&self) -> Vec<Symbol> {
        match self {
            PlanNode::Filter(n) => n.source.output_symbols(),
            PlanNode::Project(n) => n.assignments.keys().cloned().collect(),
            PlanNode::Join(n) => n.output_symbols.clone(),
            PlanNode::SemiJoin(n) => n.output_symbols.clone(),
            PlanNode::SpatialJoin(n) => n.output_symbols.clone(),
            PlanNode::Aggregation(n) => n.output_symbols.clone(),
            PlanNode::Union(n) => n.output_symbols.clone(),
            PlanNode::Exchange(n) => n.output_symbols.clone(),
            PlanNode::Window(n) => n.output_symbols.clone(),
            PlanNode::GroupId(n) => n.output_symbols.clone(),
            PlanNode::MarkDistinct(n) => n.output_symbols.clone(),
            PlanNode::Unnest(n) => n.output_symbols.clone(),
            PlanNode::Sort(n) => n.output_symbols.clone(),
            PlanNode::Sample(n) => n.output_symbols.clone(),
            PlanNode::TableScan(n) => n.output_symbols.clone(),
            PlanNode::AssignUniqueId(n) => n.output_symbols.clone(),
        }
    }

    pub fn as_filter(&self) -> Option<&FilterNode> {
        match self {
            PlanNode::Filter(n) => Some(n),
            _ => None,
        }
    }

    /// `true` for nodes the driver's default policy handles without a dedicated rule
    /// (§4.3): currently none, every variant in this IR has a dedicated rule, but the
    /// driver keeps this dispatch point so a future operator can opt into the
    /// default "push nothing, filter above" behavior without touching the driver.
    pub fn wrap_in_filter(self: Arc<Self>, predicate: Expression) -> Arc<PlanNode> {
        if predicate.is_literal_true() {
            return self;
        }
        Arc::new(PlanNode::Filter(FilterNode { source: self, predicate }))
    }
}
