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

//! One module per `PlanNode` variant (§4.4), dispatched from [`crate::driver`].

pub mod aggregation;
pub mod exchange;
pub mod filter;
pub mod group_id;
pub mod inner_join;
pub mod join;
pub mod join_support;
pub mod mark_distinct;
pub mod outer_join;
pub mod project;
pub mod semi_join;
pub mod spatial_join;
pub mod table_scan;
pub mod transparent;
pub mod union;
pub mod unnest;
pub mod window;
