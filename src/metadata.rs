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

//! The metadata/catalog collaborator (§6): determinism lookup for function calls.

use std::collections::HashSet;

/// Identity of a function call, carried by [`crate::expr::Expression::Call`] so
/// determinism can be resolved against the catalog without the expression IR
/// knowing anything about function registries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionId(String);

impl FunctionId {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionId(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External collaborator: determinism lookup for functions.
pub trait Metadata {
    fn is_deterministic(&self, function: &FunctionId) -> bool;
}

/// A `Metadata` impl backed by an explicit deny-list of non-deterministic function
/// names, defaulting every other name to deterministic. This is the one collaborator
/// this crate ships a real (not merely conservative-default) implementation for,
/// since "rand-like primitive" detection is part of the core contract in §4.1.
#[derive(Debug, Clone)]
pub struct StaticMetadata {
    non_deterministic: HashSet<String>,
}

impl Default for StaticMetadata {
    fn default() -> Self {
        let non_deterministic = ["rand", "random", "rand_integer", "uuid", "now"]
            .into_iter()
            .map(String::from)
            .collect();
        StaticMetadata { non_deterministic }
    }
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_non_deterministic(mut self, name: impl Into<String>) -> Self {
        self.non_deterministic.insert(name.into());
        self
    }
}

impl Metadata for StaticMetadata {
    fn is_deterministic(&self, function: &FunctionId) -> bool {
        !self.non_deterministic.contains(function.name())
    }
}
