// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for labeled regions and the label store.

pub mod region;
pub mod store;
