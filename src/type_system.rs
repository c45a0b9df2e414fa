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

//! The type analyzer collaborator (§6). Out of scope for this crate's own logic —
//! only its contract is modeled, plus a minimal `Type` enum wide enough for the
//! expression IR and constant folding to reason about.

use std::collections::HashMap;

use crate::expr::Expression;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Int64,
    Float64,
    Utf8,
    Unknown,
}

/// External collaborator: maps expressions to their result type. DataFusion's
/// analogue is the schema-threading `ExprSchemable` trait used throughout
/// `expr_rewriter`; here it is reduced to the bare contract this crate consumes.
pub trait TypeProvider {
    fn get_type(&self, expr: &Expression) -> Type;

    fn get_types(&self, exprs: &[Expression]) -> HashMap<Symbol, Type> {
        let mut out = HashMap::new();
        for expr in exprs {
            if let Expression::Symbol(sym) = expr {
                out.insert(sym.clone(), self.get_type(expr));
            }
        }
        out
    }
}

/// A `TypeProvider` that always reports [`Type::Unknown`], sufficient for tests and
/// for callers that don't need cast-aware rewrites.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnknownTypeProvider;

impl TypeProvider for UnknownTypeProvider {
    fn get_type(&self, _expr: &Expression) -> Type {
        Type::Unknown
    }
}
