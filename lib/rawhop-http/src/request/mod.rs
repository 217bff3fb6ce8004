/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod content;
pub use content::HttpContent;

mod error;
pub use error::HttpRequestSerializeError;

mod message;
pub use message::HttpRequest;

mod serializer;
pub use serializer::{HttpRequestSegments, HttpRequestSerializer};
