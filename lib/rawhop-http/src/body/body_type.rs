/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpBodyType {
    Chunked,
    ContentLength(u64),
    ReadUntilEnd,
}
