/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod stream;
pub use stream::{AsyncStream, BoxAsyncStream};

mod reader;
pub use reader::{BufferedData, StreamBufReader};

mod ext;
pub use ext::{LimitedBufReadExt, LimitedReadUntil};
