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

//! TableScan (§4.4): the bottom of the tree — the inherited predicate is
//! constant-folded and, unless it simplifies to TRUE, materialized as a Filter.

use std::sync::Arc;

use crate::expr::Expression;
use crate::interpreter::ExpressionInterpreter;
use crate::plan::{PlanNode, TableScanNode};

pub fn rewrite(node: &TableScanNode, inherited: &Expression) -> Arc<PlanNode> {
    let simplified = ExpressionInterpreter::optimize(inherited);
    let scan = Arc::new(PlanNode::TableScan(node.clone()));
    if simplified.is_literal_true() {
        log::debug!("table_scan {}: no residual filter", node.table_name);
        scan
    } else {
        log::debug!("table_scan {}: introducing residual filter", node.table_name);
        scan.wrap_in_filter(simplified)
    }
}
