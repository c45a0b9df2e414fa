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

//! Symbols and the two monotonic allocators the optimizer receives from its caller.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use crate::type_system::Type;

/// Opaque identifier for a column within a plan. Equality and ordering are by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Symbol(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol::new(value)
    }
}

/// Monotonically increasing plan-node id, handed out by [`PlanNodeIdAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanNodeId(pub u64);

impl fmt::Display for PlanNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out fresh [`Symbol`]s for expressions materialized by a rewrite (e.g. an
/// equi-clause side that isn't already a bare symbol reference). Not thread-shared
/// within a single `optimize()` call, so a plain `Cell` counter suffices; see §5.
#[derive(Debug, Default)]
pub struct SymbolAllocator {
    next: Cell<u64>,
}

impl SymbolAllocator {
    pub fn new() -> Self {
        Self { next: Cell::new(0) }
    }

    /// Allocate a fresh symbol. `hint` and `_type_hint` are used only to make the
    /// generated name legible; they are not part of the correctness contract.
    pub fn new_symbol(&self, hint: &str, _type_hint: &Type) -> Symbol {
        let id = self.next.get();
        self.next.set(id + 1);
        let sanitized: String = hint
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        Symbol::new(format!("${sanitized}_{id}"))
    }
}

/// Hands out fresh [`PlanNodeId`]s, e.g. to key dynamic filters.
#[derive(Debug, Default)]
pub struct PlanNodeIdAllocator {
    next: Cell<u64>,
}

impl PlanNodeIdAllocator {
    pub fn new() -> Self {
        Self { next: Cell::new(0) }
    }

    pub fn next_id(&self) -> PlanNodeId {
        let id = self.next.get();
        self.next.set(id + 1);
        PlanNodeId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocators_are_monotonic() {
        let symbols = SymbolAllocator::new();
        let a = symbols.new_symbol("x", &Type::Int64);
        let b = symbols.new_symbol("x", &Type::Int64);
        assert_ne!(a, b);

        let ids = PlanNodeIdAllocator::new();
        assert!(ids.next_id().0 < ids.next_id().0);
    }
}
