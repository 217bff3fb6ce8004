/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

#[cfg(feature = "log-raw-io")]
use log::Level;

#[cfg(feature = "log-raw-io")]
const RAW_IO_LOG_LEVEL: Level = Level::Debug;
#[cfg(feature = "log-raw-io")]
const RAW_IO_LOG_TARGET: &str = "rawhop_client::raw_io";

#[cfg(feature = "log-raw-io")]
pub(crate) fn log_sent(buf: &[u8]) {
    if buf.is_empty() {
        return;
    }
    log::log!(
        target: RAW_IO_LOG_TARGET,
        RAW_IO_LOG_LEVEL,
        "> {}",
        String::from_utf8_lossy(buf).trim_end()
    );
}

#[cfg(feature = "log-raw-io")]
pub(crate) fn log_rsp_head(rsp: &rawhop_http::HttpResponse) {
    log::log!(
        target: RAW_IO_LOG_TARGET,
        RAW_IO_LOG_LEVEL,
        "< {:?} {} {}",
        rsp.version,
        rsp.code,
        rsp.reason
    );
    let mut log_header = |_: &http::HeaderName, name: &str, value: &str| {
        log::log!(target: RAW_IO_LOG_TARGET, RAW_IO_LOG_LEVEL, "< {name}: {value}");
    };
    rsp.headers.for_each_value(&mut log_header);
    rsp.content.headers.for_each_value(&mut log_header);
}
