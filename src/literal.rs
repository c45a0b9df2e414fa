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

//! Literal values and the literal-encoder collaborator (§6).

use std::fmt;

use crate::type_system::Type;

/// A scalar literal. `Float64` carries its bit pattern for `Eq`/`Hash` so literals can
/// participate in structural equality and union-find keys, matching the other
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Hash)]
pub enum Literal {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
}

impl Eq for Literal {}

impl Literal {
    pub const TRUE: Literal = Literal::Boolean(true);
    pub const FALSE: Literal = Literal::Boolean(false);

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn data_type(&self) -> Type {
        match self {
            Literal::Null => Type::Unknown,
            Literal::Boolean(_) => Type::Boolean,
            Literal::Int64(_) => Type::Int64,
            Literal::Float64(_) => Type::Float64,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Int64(v) => write!(f, "{v}"),
            Literal::Float64(v) => write!(f, "{v}"),
        }
    }
}

/// External collaborator: encodes a value back as a literal [`Expression`]. Kept as a
/// free function rather than a trait since literal encoding has no catalog
/// dependency, unlike the type analyzer or effective-predicate extractor.
pub struct LiteralEncoder;

impl LiteralEncoder {
    pub fn encode(literal: Literal) -> crate::expr::Expression {
        crate::expr::Expression::Literal(literal)
    }
}
