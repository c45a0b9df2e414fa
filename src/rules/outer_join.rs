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

//! `process_limited_outer_join` (§4.4): the null-preserving analogue of
//! `process_inner_join`. The inner (null-producing) side's effective predicate may
//! only ever justify pushing a conjunct *into* the inner side, together with
//! equalities from the outer side and the join predicate — it must never, on its
//! own, justify pushing anything into the outer side, since an inner-side
//! unmatched row still has to survive with NULLs there.

use crate::context::RuleContext;
use crate::equality_inference::{non_inferrable_conjuncts, EqualityInference, SymbolScope};
use crate::expr::{combine_conjuncts, filter_deterministic_conjuncts, partition_by_determinism, Expression};

pub struct OuterJoinSplit {
    pub outer_push: Expression,
    pub inner_push: Expression,
    pub join_residual: Expression,
    pub post_join: Expression,
}

#[allow(clippy::too_many_arguments)]
pub fn process_limited_outer_join(
    ctx: &RuleContext,
    outer_scope: &SymbolScope,
    inner_scope: &SymbolScope,
    inherited: &Expression,
    join_predicate: &Expression,
    outer_effective: &Expression,
    inner_effective: &Expression,
) -> OuterJoinSplit {
    let metadata = ctx.metadata;

    let (inherited_det, inherited_nondet) = partition_by_determinism(inherited, metadata);
    let inherited_combined = combine_conjuncts(inherited_det);
    let outer_effective_det = filter_deterministic_conjuncts(outer_effective, metadata);
    let inner_effective_det = filter_deterministic_conjuncts(inner_effective, metadata);
    let join_combined = filter_deterministic_conjuncts(join_predicate, metadata);

    let mut post_join_conjuncts = inherited_nondet;
    let mut outer_push_conjuncts = Vec::new();
    let mut inner_push_conjuncts = Vec::new();
    let mut join_residual_conjuncts = Vec::new();

    let inherited_inference = EqualityInference::new(metadata, [inherited_combined.clone()]);
    let outer_inference =
        EqualityInference::new(metadata, [inherited_combined.clone(), outer_effective_det.clone()]);

    let outer_partition = inherited_inference.generate_equalities_partitioned_by(outer_scope);
    outer_push_conjuncts.extend(outer_partition.scope_equalities.clone());
    post_join_conjuncts.extend(outer_partition.scope_complement_equalities);
    post_join_conjuncts.extend(outer_partition.scope_straddling_equalities);

    let null_safe_inference = EqualityInference::new(
        metadata,
        [
            combine_conjuncts(outer_partition.scope_equalities),
            outer_effective_det.clone(),
            inner_effective_det.clone(),
            join_combined.clone(),
        ],
    );
    let null_safe_without_inner = EqualityInference::new(
        metadata,
        [
            combine_conjuncts(
                inherited_inference
                    .generate_equalities_partitioned_by(outer_scope)
                    .scope_equalities,
            ),
            outer_effective_det.clone(),
            join_combined.clone(),
        ],
    );

    inner_push_conjuncts.extend(
        null_safe_without_inner
            .generate_equalities_partitioned_by(inner_scope)
            .scope_equalities,
    );

    let join_inference = EqualityInference::new(metadata, [join_combined.clone()]);
    let join_partition = join_inference.generate_equalities_partitioned_by(inner_scope);
    inner_push_conjuncts.extend(join_partition.scope_equalities);
    join_residual_conjuncts.extend(join_partition.scope_complement_equalities);
    join_residual_conjuncts.extend(join_partition.scope_straddling_equalities);

    for conjunct in non_inferrable_conjuncts(&inherited_combined, metadata) {
        if let Some(into_outer) = outer_inference.rewrite(&conjunct, outer_scope, metadata) {
            if let Some(into_inner) = null_safe_inference.rewrite(&into_outer, inner_scope, metadata) {
                inner_push_conjuncts.push(into_inner);
            }
            outer_push_conjuncts.push(into_outer);
        } else {
            post_join_conjuncts.push(conjunct);
        }
    }

    for conjunct in non_inferrable_conjuncts(&outer_effective_det, metadata) {
        if let Some(into_inner) = null_safe_inference.rewrite(&conjunct, inner_scope, metadata) {
            inner_push_conjuncts.push(into_inner);
        }
    }

    for conjunct in non_inferrable_conjuncts(&join_combined, metadata) {
        if let Some(into_inner) = null_safe_inference.rewrite(&conjunct, inner_scope, metadata) {
            inner_push_conjuncts.push(into_inner);
        } else {
            join_residual_conjuncts.push(conjunct);
        }
    }

    OuterJoinSplit {
        outer_push: combine_conjuncts(outer_push_conjuncts),
        inner_push: combine_conjuncts(inner_push_conjuncts),
        join_residual: combine_conjuncts(join_residual_conjuncts),
        post_join: combine_conjuncts(post_join_conjuncts),
    }
}
