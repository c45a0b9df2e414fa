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

//! `process_inner_join` (§4.4): splits an inherited predicate, a join predicate, and
//! both children's effective predicates into a left push, a right push, and a join
//! residual, using several equality inferences built over different subsets of the
//! available sources so that a side's own effective predicate is never rederived as
//! "new" information about itself.

use crate::context::RuleContext;
use crate::equality_inference::{EqualityInference, SymbolScope};
use crate::expr::{combine_conjuncts, filter_deterministic_conjuncts, partition_by_determinism, Expression};

pub struct InnerJoinSplit {
    pub left_push: Expression,
    pub right_push: Expression,
    pub join_residual: Expression,
}

#[allow(clippy::too_many_arguments)]
pub fn process_inner_join(
    ctx: &RuleContext,
    left_scope: &SymbolScope,
    right_scope: &SymbolScope,
    inherited: &Expression,
    join_predicate: &Expression,
    left_effective: &Expression,
    right_effective: &Expression,
) -> InnerJoinSplit {
    let metadata = ctx.metadata;

    let (inherited_det, inherited_nondet) = partition_by_determinism(inherited, metadata);
    let (join_det, join_nondet) = partition_by_determinism(join_predicate, metadata);
    let left_effective_det = filter_deterministic_conjuncts(left_effective, metadata);
    let right_effective_det = filter_deterministic_conjuncts(right_effective, metadata);

    let mut join_residual_conjuncts = Vec::new();
    join_residual_conjuncts.extend(inherited_nondet);
    join_residual_conjuncts.extend(join_nondet);

    let inherited_combined = combine_conjuncts(inherited_det);
    let join_combined = combine_conjuncts(join_det.clone());

    let inherited_inference = EqualityInference::new(metadata, [inherited_combined.clone()]);
    let simplified_left_effective = inherited_inference
        .rewrite(&left_effective_det, left_scope, metadata)
        .unwrap_or_else(|| left_effective_det.clone());
    let simplified_right_effective = inherited_inference
        .rewrite(&right_effective_det, right_scope, metadata)
        .unwrap_or_else(|| right_effective_det.clone());

    let all_inference = EqualityInference::new(
        metadata,
        [
            inherited_combined.clone(),
            left_effective_det.clone(),
            right_effective_det.clone(),
            join_combined.clone(),
            simplified_left_effective.clone(),
            simplified_right_effective.clone(),
        ],
    );
    let without_left_inferred = EqualityInference::new(
        metadata,
        [inherited_combined.clone(), right_effective_det.clone(), join_combined.clone(), simplified_right_effective.clone()],
    );
    let without_right_inferred = EqualityInference::new(
        metadata,
        [inherited_combined.clone(), left_effective_det.clone(), join_combined.clone(), simplified_left_effective.clone()],
    );

    let mut left_push_conjuncts = without_left_inferred
        .generate_equalities_partitioned_by(left_scope)
        .scope_equalities;
    let mut right_push_conjuncts = without_right_inferred
        .generate_equalities_partitioned_by(right_scope)
        .scope_equalities;
    join_residual_conjuncts.extend(
        all_inference
            .generate_equalities_partitioned_by(left_scope)
            .scope_straddling_equalities,
    );

    for conjunct in crate::equality_inference::non_inferrable_conjuncts(&inherited_combined, metadata) {
        if let Some(into_left) = without_left_inferred.rewrite(&conjunct, left_scope, metadata) {
            left_push_conjuncts.push(into_left);
        } else if let Some(into_right) = without_right_inferred.rewrite(&conjunct, right_scope, metadata) {
            right_push_conjuncts.push(into_right);
        } else {
            join_residual_conjuncts.push(conjunct);
        }
    }

    if let Some(into_left) = without_left_inferred.rewrite(&simplified_right_effective, left_scope, metadata) {
        left_push_conjuncts.push(into_left);
    }
    if let Some(into_right) = without_right_inferred.rewrite(&simplified_left_effective, right_scope, metadata) {
        right_push_conjuncts.push(into_right);
    }

    for conjunct in crate::equality_inference::non_inferrable_conjuncts(&join_combined, metadata) {
        if let Some(into_left) = without_left_inferred.rewrite(&conjunct, left_scope, metadata) {
            left_push_conjuncts.push(into_left);
        } else if let Some(into_right) = without_right_inferred.rewrite(&conjunct, right_scope, metadata) {
            right_push_conjuncts.push(into_right);
        } else {
            join_residual_conjuncts.push(conjunct);
        }
    }

    InnerJoinSplit {
        left_push: combine_conjuncts(left_push_conjuncts),
        right_push: combine_conjuncts(right_push_conjuncts),
        join_residual: combine_conjuncts(join_residual_conjuncts),
    }
}
