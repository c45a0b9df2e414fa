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

//! The effective-predicate extractor collaborator (§6): summarizes a sound but not
//! necessarily complete predicate implied by a subplan's execution. Out of scope
//! (§1) beyond its contract, except for a conservative default this crate ships so
//! it is independently testable.

use crate::plan::PlanNode;
use crate::session::SessionConfig;

/// External collaborator. A real implementation would read table constraints,
/// already-applied Filter predicates beneath the subplan, partition pruning bounds,
/// etc. `extract` must only ever return a predicate *implied* by `plan`'s execution
/// (soundness); it may always conservatively return TRUE.
pub trait EffectivePredicateExtractor {
    fn extract(&self, session: &SessionConfig, plan: &PlanNode) -> crate::expr::Expression;
}

/// Ships no real catalog knowledge: always reports TRUE, i.e. "no extra knowledge
/// about this subplan beyond what's already in the tree". Every pushdown rule in
/// this crate remains correct with this extractor; it simply forgoes additional
/// pushdown opportunities that a catalog-aware extractor could unlock.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConservativeEffectivePredicateExtractor;

impl EffectivePredicateExtractor for ConservativeEffectivePredicateExtractor {
    fn extract(&self, _session: &SessionConfig, _plan: &PlanNode) -> crate::expr::Expression {
        crate::expr::Expression::lit_true()
    }
}

/// A test/demo extractor that looks one level down through a bare `Filter` and
/// reports its predicate as an effective predicate of the subplan rooted there —
/// enough to exercise the outer-join null-rejection and inner-join transitive-
/// equality rules end to end without a real catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterSniffingEffectivePredicateExtractor;

impl EffectivePredicateExtractor for FilterSniffingEffectivePredicateExtractor {
    fn extract(&self, _session: &SessionConfig, plan: &PlanNode) -> crate::expr::Expression {
        match plan {
            PlanNode::Filter(f) => f.predicate.clone(),
            _ => crate::expr::Expression::lit_true(),
        }
    }
}
