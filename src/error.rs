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

//! Error taxonomy for the predicate pushdown optimizer.
//!
//! Only the fatal, invariant-violation kind from the error taxonomy gets a typed
//! variant here; the "unsupported node" and "non-deterministic conjunct kept in
//! residual" kinds are not errors at all and never surface through this type.

use crate::symbol::Symbol;

pub type Result<T> = std::result::Result<T, PushdownError>;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PushdownError {
    #[error("inherited predicate references the synthesized id column {id_column}")]
    IdColumnReferenced { id_column: Symbol },

    #[error("effective predicate referenced symbol {symbol} outside its subplan's scope")]
    EffectivePredicateScopeViolation { symbol: Symbol },

    #[error("unsupported join type: {0}")]
    UnsupportedJoinType(String),

    #[error("spatial join rewrite produced a join with no spatial predicate")]
    MissingSpatialPredicate,
}

/// A soft anomaly recorded during optimization that did not warrant aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushdownWarning {
    /// A non-trivial effective predicate had no equi-clause bridging it to the
    /// other side of a join and was dropped rather than cross-pushed.
    EffectivePredicateIgnored { detail: String },
    /// A conjunct could not be localized to either side of a join and was kept as a
    /// residual post-join filter.
    ResidualConjunctRetained { detail: String },
}

impl std::fmt::Display for PushdownWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushdownWarning::EffectivePredicateIgnored { detail } => {
                write!(f, "effective predicate ignored: {detail}")
            }
            PushdownWarning::ResidualConjunctRetained { detail } => {
                write!(f, "residual conjunct retained: {detail}")
            }
        }
    }
}
