/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::process::ExitCode;

use anyhow::Context;

fn main() -> anyhow::Result<ExitCode> {
    let Some(proc_args) = rawhop_fetch::opts::parse_clap()? else {
        return Ok(ExitCode::SUCCESS);
    };

    let _log_guard =
        rawhop_fetch::stdlog::setup(proc_args.verbose_level).context("failed to setup logger")?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    rt.block_on(rawhop_fetch::run(proc_args))
}
