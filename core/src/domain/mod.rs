// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod principal;
pub mod revision;
pub mod tender;
pub mod bid;
pub mod review;
pub mod page;
pub mod repository;
