/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod proxy;
pub use proxy::{as_proxy, as_url};

mod tls;
pub use tls::{as_cert_revocation_mode, as_tls_client_config_builder, as_tls_version};
