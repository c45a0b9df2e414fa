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

//! A predicate pushdown optimizer for a relational logical query plan: migrates
//! boolean filter predicates as close to the data sources as the plan's operators
//! allow, splitting conjuncts across operator sides, deriving new equalities
//! through transitive closure, downgrading outer joins to inner joins where sound,
//! and synthesizing dynamic-filter probe predicates for inner equi-joins.
//!
//! The entry point is [`optimize`]; [`driver::rewrite`] is the recursive workhorse
//! it delegates to.

pub mod context;
pub mod driver;
pub mod dynamic_filter;
pub mod equality_inference;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod join_normalizer;
pub mod literal;
pub mod metadata;
pub mod plan;
pub mod rules;
pub mod session;
pub mod symbol;
pub mod type_system;

pub use context::RuleContext;
pub use driver::optimize;
pub use error::{PushdownError, PushdownWarning, Result};
pub use expr::Expression;
pub use plan::PlanNode;
pub use session::SessionConfig;
pub use symbol::{PlanNodeId, PlanNodeIdAllocator, Symbol, SymbolAllocator};
