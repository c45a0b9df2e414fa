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

//! A small `TreeNode`/`Transformed`-style rewrite helper for [`super::Expression`],
//! patterned on the rewrite shape used throughout
//! `datafusion-expr::expr_rewriter` (`expr.transform(|expr| ...)` returning
//! `Transformed::yes`/`Transformed::no`).

use super::Expression;

/// Whether a rewrite step actually produced something new.
#[derive(Debug, Clone)]
pub enum Transformed<T> {
    Yes(T),
    No(T),
}

impl<T> Transformed<T> {
    pub fn yes(value: T) -> Self {
        Transformed::Yes(value)
    }

    pub fn no(value: T) -> Self {
        Transformed::No(value)
    }

    pub fn data(self) -> T {
        match self {
            Transformed::Yes(v) | Transformed::No(v) => v,
        }
    }

    pub fn transformed(&self) -> bool {
        matches!(self, Transformed::Yes(_))
    }
}

/// Rewrites `expr` bottom-up: children are transformed first, then `f` is applied to
/// the node itself. Per the opacity invariant (§3), the body of a [`Expression::Try`]
/// is never visited — `f` only ever sees the `Try` node as a whole.
pub fn transform<F>(expr: &Expression, f: &mut F) -> Expression
where
    F: FnMut(Expression) -> Transformed<Expression>,
{
    let with_children_rewritten = map_children(expr, f);
    f(with_children_rewritten).data()
}

fn map_children<F>(expr: &Expression, f: &mut F) -> Expression
where
    F: FnMut(Expression) -> Transformed<Expression>,
{
    match expr {
        Expression::Symbol(_) | Expression::Literal(_) | Expression::DynamicFilter(_, _) => {
            expr.clone()
        }
        Expression::Comparison(op, l, r) => {
            Expression::Comparison(*op, Box::new(transform(l, f)), Box::new(transform(r, f)))
        }
        Expression::And(l, r) => Expression::And(Box::new(transform(l, f)), Box::new(transform(r, f))),
        Expression::Or(l, r) => Expression::Or(Box::new(transform(l, f)), Box::new(transform(r, f))),
        Expression::Not(e) => Expression::Not(Box::new(transform(e, f))),
        Expression::Cast(e, t) => Expression::Cast(Box::new(transform(e, f)), *t),
        // Opaque: never recurse into a Try body.
        Expression::Try(_) => expr.clone(),
        Expression::Call(function, args) => {
            Expression::Call(function.clone(), args.iter().map(|a| transform(a, f)).collect())
        }
    }
}
