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

//! Bundles the external collaborators (§6) that every rule needs threaded through
//! the recursive rewrite, so rule signatures don't grow a parameter per collaborator.

use crate::metadata::Metadata;
use crate::plan::effective_predicate::EffectivePredicateExtractor;
use crate::session::SessionConfig;
use crate::symbol::{PlanNodeIdAllocator, SymbolAllocator};
use crate::type_system::TypeProvider;

pub struct RuleContext<'a> {
    pub session: &'a SessionConfig,
    pub metadata: &'a dyn Metadata,
    pub type_provider: &'a dyn TypeProvider,
    pub effective_predicates: &'a dyn EffectivePredicateExtractor,
    pub symbols: &'a SymbolAllocator,
    pub plan_ids: &'a PlanNodeIdAllocator,
}
