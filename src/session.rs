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

//! Session-scoped configuration flags consumed by the optimizer (§6).

/// Mirrors the subset of a query engine's `ConfigOptions` this optimizer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Synthesize dynamic-filter markers on inner equi-joins.
    pub enable_dynamic_filtering: bool,
    /// Allow the effective-predicate extractor to read table properties.
    pub predicate_pushdown_use_table_properties: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            enable_dynamic_filtering: true,
            predicate_pushdown_use_table_properties: true,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dynamic_filtering(mut self, enabled: bool) -> Self {
        self.enable_dynamic_filtering = enabled;
        self
    }

    pub fn with_table_properties(mut self, enabled: bool) -> Self {
        self.predicate_pushdown_use_table_properties = enabled;
        self
    }
}
