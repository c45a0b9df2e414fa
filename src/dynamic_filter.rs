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

//! Dynamic-filter marker synthesis (§4.4 step 6, §6).
//!
//! The id format is explicitly *not* part of the correctness contract (§9 Open
//! Question (c)) — only that it is unique within one `optimize()` call and that the
//! marker is keyed in the owning join's `dynamic_filters` map.

use crate::expr::Expression;
use crate::symbol::{PlanNodeIdAllocator, Symbol};

/// Allocates the next dynamic-filter id. Format: `DF_<n>`, observed only by the
/// downstream scan operator (out of scope here).
pub fn next_dynamic_filter_id(id_allocator: &PlanNodeIdAllocator) -> String {
    format!("DF_{}", id_allocator.next_id().0)
}

/// Builds the `DYNAMIC_FILTER(id, probe)` marker expression for one equi-clause.
pub fn dynamic_filter_marker(id: &str, probe_symbol: &Symbol) -> Expression {
    Expression::DynamicFilter(id.to_string(), probe_symbol.clone())
}
