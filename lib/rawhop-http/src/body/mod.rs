/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod body_type;
pub use body_type::HttpBodyType;

mod chunked_decoder;
pub use chunked_decoder::{ChunkedDecoder, HttpChunkedDecodeError};

mod encoding;
pub use encoding::ContentEncoding;
