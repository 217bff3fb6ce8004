/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use tokio_util::sync::CancellationToken;

use rawhop_client::TransportClient;
use rawhop_http::HttpResponse;

pub mod opts;
pub mod stdlog;

use opts::ProcArgs;

pub async fn run(proc_args: ProcArgs) -> anyhow::Result<ExitCode> {
    let config = proc_args.transport_config()?;
    let client = TransportClient::new(config).context("failed to build tls client config")?;
    let request = proc_args.build_request()?;

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("interrupted");
            ctrl_c_cancel.cancel();
        }
    });

    log::debug!("send {} {}", request.method, request.uri);
    let r = client.send(request, &cancel).await;
    cancel.cancel();

    match r {
        Ok((rsp, sent)) => {
            if proc_args.show_sent {
                dump_sent(&sent)?;
            }
            print_response(&proc_args, &rsp)?;
            if rsp.code >= 400 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Err(e) => {
            if proc_args.show_sent {
                dump_sent(&e.sent)?;
            }
            Err(anyhow!("request failed: {}", e.error))
        }
    }
}

fn dump_sent(sent: &[bytes::Bytes]) -> anyhow::Result<()> {
    let mut stderr = io::stderr().lock();
    for buf in sent {
        stderr.write_all(buf)?;
    }
    stderr.flush()?;
    Ok(())
}

fn print_response(proc_args: &ProcArgs, rsp: &HttpResponse) -> anyhow::Result<()> {
    let mut head = Vec::with_capacity(1024);
    if proc_args.include_head {
        writeln!(head, "{:?} {} {}", rsp.version, rsp.code, rsp.reason)?;
        let mut write_header = |_: &http::HeaderName, name: &str, value: &str| {
            let _ = writeln!(head, "{name}: {value}");
        };
        rsp.headers.for_each_value(&mut write_header);
        rsp.content.headers.for_each_value(&mut write_header);
        writeln!(head)?;
    }

    match &proc_args.output {
        Some(path) => {
            std::fs::write(path, &rsp.content.body)
                .map_err(|e| anyhow!("failed to write body to {}: {e}", path.display()))?;
            io::stdout().write_all(&head)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&head)?;
            stdout.write_all(&rsp.content.body)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
