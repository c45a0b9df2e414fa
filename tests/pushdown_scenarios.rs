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

//! End-to-end scenarios S1-S7 (§8), built with small helpers over hand-assembled
//! plans rather than a parser front end.

use std::sync::Arc;

use indexmap::IndexMap;

use predicate_pushdown::expr::{free_symbols, ComparisonOp, Expression};
use predicate_pushdown::metadata::{FunctionId, StaticMetadata};
use predicate_pushdown::plan::effective_predicate::{
    ConservativeEffectivePredicateExtractor, FilterSniffingEffectivePredicateExtractor,
};
use predicate_pushdown::plan::{
    AggregateCall, AggregationNode, FilterNode, JoinNode, JoinType, PlanNode, ProjectNode,
    SemiJoinNode, TableScanNode, UnionNode,
};
use predicate_pushdown::session::SessionConfig;
use predicate_pushdown::symbol::{PlanNodeIdAllocator, Symbol, SymbolAllocator};
use predicate_pushdown::type_system::UnknownTypeProvider;
use predicate_pushdown::PushdownWarning;

fn sym(name: &str) -> Symbol {
    Symbol::new(name)
}

fn scan(table: &str, columns: &[&str]) -> Arc<PlanNode> {
    Arc::new(PlanNode::TableScan(TableScanNode {
        table_name: table.to_string(),
        output_symbols: columns.iter().map(|c| sym(c)).collect(),
    }))
}

fn filter(predicate: Expression, source: Arc<PlanNode>) -> Arc<PlanNode> {
    Arc::new(PlanNode::Filter(FilterNode { source, predicate }))
}

fn run_with(
    plan: &Arc<PlanNode>,
    effective: &dyn predicate_pushdown::plan::effective_predicate::EffectivePredicateExtractor,
) -> (Arc<PlanNode>, Vec<PushdownWarning>) {
    let session = SessionConfig::new();
    let metadata = StaticMetadata::new();
    let types = UnknownTypeProvider;
    let symbols = SymbolAllocator::new();
    let plan_ids = PlanNodeIdAllocator::new();
    let mut warnings = Vec::new();
    let result = predicate_pushdown::optimize(
        plan, &session, &metadata, &types, effective, &symbols, &plan_ids, &mut warnings,
    )
    .expect("optimize should not fail for these well-formed plans");
    (result, warnings)
}

fn run(plan: &Arc<PlanNode>) -> (Arc<PlanNode>, Vec<PushdownWarning>) {
    run_with(plan, &ConservativeEffectivePredicateExtractor)
}

fn find_join(node: &PlanNode) -> Option<&JoinNode> {
    match node {
        PlanNode::Join(j) => Some(j),
        PlanNode::Filter(f) => find_join(&f.source),
        PlanNode::Project(p) => find_join(&p.source),
        _ => None,
    }
}

fn find_aggregation(node: &PlanNode) -> Option<&AggregationNode> {
    match node {
        PlanNode::Aggregation(a) => Some(a),
        PlanNode::Filter(f) => find_aggregation(&f.source),
        PlanNode::Project(p) => find_aggregation(&p.source),
        _ => None,
    }
}

/// True if some Filter on the path from `node` down to its leaves carries a
/// non-trivial predicate mentioning `name`.
fn has_residual_mentioning(node: &PlanNode, name: &str) -> bool {
    match node {
        PlanNode::Filter(f) => {
            let here = !f.predicate.is_literal_true()
                && free_symbols(&f.predicate).iter().any(|s| s.name() == name);
            here || has_residual_mentioning(&f.source, name)
        }
        PlanNode::Project(p) => has_residual_mentioning(&p.source, name),
        PlanNode::Aggregation(a) => has_residual_mentioning(&a.source, name),
        PlanNode::Join(j) => has_residual_mentioning(&j.left, name) || has_residual_mentioning(&j.right, name),
        PlanNode::Union(u) => u.sources.iter().any(|s| has_residual_mentioning(s, name)),
        _ => false,
    }
}

#[test]
fn s1_filter_over_project_inlines() {
    let src = scan("t", &["x"]);
    let mut assignments = IndexMap::new();
    assignments.insert(sym("a"), Expression::symbol("x"));
    let project = Arc::new(PlanNode::Project(ProjectNode { source: src, assignments }));
    let plan = filter(
        Expression::cmp(ComparisonOp::Gt, Expression::symbol("a"), Expression::lit_int(5)),
        project,
    );

    let (result, _) = run(&plan);
    match result.as_ref() {
        PlanNode::Project(p) => match p.source.as_ref() {
            PlanNode::Filter(f) => {
                assert!(!f.predicate.is_literal_true());
                assert!(free_symbols(&f.predicate).iter().any(|s| s.name() == "x"));
                assert!(matches!(f.source.as_ref(), PlanNode::TableScan(_)));
            }
            other => panic!("expected the pushed predicate beneath the project, got {other:?}"),
        },
        other => panic!("expected a Project at the root, got {other:?}"),
    }
}

#[test]
fn s2_left_join_null_rejection_downgrades_to_inner() {
    let left = scan("l", &["l_k"]);
    let right = scan("r", &["r_k", "r_y"]);
    let join = Arc::new(PlanNode::Join(JoinNode {
        join_type: JoinType::Left,
        left,
        right,
        equi_clauses: vec![(sym("l_k"), sym("r_k"))],
        filter: None,
        output_symbols: vec![sym("l_k"), sym("r_k"), sym("r_y")],
        dynamic_filters: IndexMap::new(),
    }));
    let plan = filter(
        Expression::cmp(ComparisonOp::Gt, Expression::symbol("r_y"), Expression::lit_int(0)),
        join,
    );

    let (result, _) = run(&plan);
    let join_node = find_join(&result).expect("expected a Join node in the result");
    assert_eq!(join_node.join_type, JoinType::Inner);
}

#[test]
fn s2b_left_join_without_null_rejection_stays_left() {
    let left = scan("l", &["l_k"]);
    let right = scan("r", &["r_k", "r_y"]);
    let join = Arc::new(PlanNode::Join(JoinNode {
        join_type: JoinType::Left,
        left,
        right,
        equi_clauses: vec![(sym("l_k"), sym("r_k"))],
        filter: None,
        output_symbols: vec![sym("l_k"), sym("r_k"), sym("r_y")],
        dynamic_filters: IndexMap::new(),
    }));
    // No predicate touches the right side, so nothing justifies a downgrade.
    let plan = filter(
        Expression::cmp(ComparisonOp::Gt, Expression::symbol("l_k"), Expression::lit_int(0)),
        join,
    );

    let (result, _) = run(&plan);
    let join_node = find_join(&result).expect("expected a Join node in the result");
    assert_eq!(join_node.join_type, JoinType::Left);
}

#[test]
fn s3_inner_join_transitive_equality_pushes_both_sides() {
    let left = scan("l", &["l_x"]);
    let right = scan("r", &["r_x"]);
    let join = Arc::new(PlanNode::Join(JoinNode {
        join_type: JoinType::Inner,
        left,
        right,
        equi_clauses: vec![(sym("l_x"), sym("r_x"))],
        filter: None,
        output_symbols: vec![sym("l_x"), sym("r_x")],
        dynamic_filters: IndexMap::new(),
    }));
    let plan = filter(
        Expression::cmp(ComparisonOp::Eq, Expression::symbol("l_x"), Expression::lit_int(5)),
        join,
    );

    let (result, _) = run(&plan);
    let join_node = find_join(&result).expect("expected a Join node in the result");
    assert!(has_residual_mentioning(&join_node.left, "l_x"), "l_x=5 should be pushed beneath the left side");
    assert!(has_residual_mentioning(&join_node.right, "r_x"), "the inferred r_x=5 should be pushed beneath the right side");
}

#[test]
fn s4_union_splits_with_no_residual_above() {
    let s1 = scan("s1", &["x1"]);
    let s2 = scan("s2", &["x2"]);
    let mut mapping = IndexMap::new();
    mapping.insert(sym("a"), vec![sym("x1"), sym("x2")]);
    let union = Arc::new(PlanNode::Union(UnionNode {
        sources: vec![s1, s2],
        symbol_mapping: mapping,
        output_symbols: vec![sym("a")],
    }));
    let plan = filter(
        Expression::cmp(ComparisonOp::Gt, Expression::symbol("a"), Expression::lit_int(0)),
        union,
    );

    let (result, _) = run(&plan);
    match result.as_ref() {
        PlanNode::Union(u) => {
            assert_eq!(u.sources.len(), 2);
            for source in &u.sources {
                assert!(matches!(source.as_ref(), PlanNode::Filter(_)), "each branch should carry its own pushed filter");
            }
        }
        other => panic!("expected the Union at the root with no residual Filter above it, got {other:?}"),
    }
}

#[test]
fn s5_aggregation_splits_grouping_key_from_aggregate_predicate() {
    let src = scan("t", &["k", "v"]);
    let mut aggregations = IndexMap::new();
    aggregations.insert(
        sym("s"),
        AggregateCall { function: FunctionId::new("sum"), args: vec![sym("v")] },
    );
    let aggregation = Arc::new(PlanNode::Aggregation(AggregationNode {
        source: src,
        aggregations,
        grouping_sets: vec![vec![sym("k")]],
        group_id_symbol: None,
        output_symbols: vec![sym("k"), sym("s")],
    }));
    let plan = filter(
        Expression::cmp(ComparisonOp::Gt, Expression::symbol("k"), Expression::lit_int(0))
            .and(Expression::cmp(ComparisonOp::Gt, Expression::symbol("s"), Expression::lit_int(10))),
        aggregation,
    );

    let (result, _) = run(&plan);
    let aggregation_node = find_aggregation(&result).expect("expected an Aggregation node in the result");
    assert!(
        has_residual_mentioning(&aggregation_node.source, "k"),
        "the grouping-key predicate k > 0 should be pushed beneath the aggregation"
    );
    assert!(
        has_residual_mentioning(&result, "s"),
        "the aggregate-output predicate s > 10 must remain above the aggregation"
    );
    assert!(
        !has_residual_mentioning(&aggregation_node.source, "s"),
        "s is not a grouping key and must never be pushed beneath the aggregation"
    );
}

#[test]
fn s6_non_deterministic_conjunct_is_retained_not_pushed() {
    let src = scan("t", &["x"]);
    let plan = filter(
        Expression::cmp(ComparisonOp::Gt, Expression::symbol("x"), Expression::lit_int(0))
            .and(Expression::cmp(
                ComparisonOp::Lt,
                Expression::Call(FunctionId::new("rand"), vec![]),
                Expression::lit_float(0.5),
            )),
        src,
    );

    let (result, _) = run(&plan);
    match result.as_ref() {
        PlanNode::Filter(f) => {
            assert!(!f.predicate.is_literal_true(), "the non-deterministic conjunct must remain as a residual");
            match f.source.as_ref() {
                PlanNode::Filter(inner) => {
                    assert!(!inner.predicate.is_literal_true());
                    assert!(free_symbols(&inner.predicate).iter().any(|s| s.name() == "x"));
                }
                PlanNode::TableScan(_) => panic!("the deterministic conjunct x > 0 should have been pushed"),
                other => panic!("unexpected shape: {other:?}"),
            }
        }
        other => panic!("the non-deterministic conjunct must remain as a residual Filter, got {other:?}"),
    }
}

#[test]
fn s7_semi_join_filtering_form_pushes_into_both_sides() {
    // `orders` carries its own effective predicate on the join key; FilterSniffing
    // surfaces it as `o_key > 1000` so allInference can translate it across the
    // derived `o_key = e_key` equality onto the filtering side.
    let source = filter(
        Expression::cmp(ComparisonOp::Gt, Expression::symbol("o_key"), Expression::lit_int(1000)),
        scan("orders", &["o_key", "o_amount"]),
    );
    let filtering_source = scan("eligible", &["e_key"]);
    let semi_join = Arc::new(PlanNode::SemiJoin(SemiJoinNode {
        source,
        filtering_source,
        source_key: sym("o_key"),
        filter_key: sym("e_key"),
        semi_output: sym("matched"),
        output_symbols: vec![sym("o_key"), sym("o_amount"), sym("matched")],
    }));
    // The filtering form: only the boolean marker feeds the residual above, and it
    // is exactly the condition a SemiJoin's own output already guarantees.
    let plan = filter(
        Expression::cmp(ComparisonOp::Eq, Expression::symbol("matched"), Expression::lit_true()),
        semi_join,
    );

    let (result, _) = run_with(&plan, &FilterSniffingEffectivePredicateExtractor);
    let semi = match result.as_ref() {
        PlanNode::SemiJoin(s) => s,
        other => panic!("the `matched` marker is trivially true for every SemiJoin output row and must be absorbed, got {other:?}"),
    };

    assert!(
        has_residual_mentioning(&semi.filtering_source, "e_key") || has_residual_mentioning(&semi.source, "o_key"),
        "the o_key = e_key derived equality should have carried the source's effective \
         predicate across the join, appearing as a filter on e_key under filtering_source \
         (or rebounding as o_key under source)"
    );
}

#[test]
fn optimize_is_idempotent_on_its_own_output() {
    let left = scan("l", &["l_x"]);
    let right = scan("r", &["r_x"]);
    let join = Arc::new(PlanNode::Join(JoinNode {
        join_type: JoinType::Inner,
        left,
        right,
        equi_clauses: vec![(sym("l_x"), sym("r_x"))],
        filter: None,
        output_symbols: vec![sym("l_x"), sym("r_x")],
        dynamic_filters: IndexMap::new(),
    }));
    let plan = filter(
        Expression::cmp(ComparisonOp::Eq, Expression::symbol("l_x"), Expression::lit_int(5)),
        join,
    );

    let (once, _) = run(&plan);
    let (twice, _) = run(&once);
    assert_eq!(format!("{:?}", once), format!("{:?}", twice));
}
