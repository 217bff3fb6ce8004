/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Local;
use slog::{Drain, KV, Key, OwnedKVList, Record, Serializer, slog_o};
use slog_scope::GlobalLoggerGuard;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Write each record as one plain text line
pub struct PlainDrain<W> {
    io: Mutex<W>,
    append_code_position: bool,
}

impl<W: Write> PlainDrain<W> {
    pub fn new(io: W, append_code_position: bool) -> Self {
        PlainDrain {
            io: Mutex::new(io),
            append_code_position,
        }
    }

    fn format(&self, buf: &mut Vec<u8>, record: &Record, values: &OwnedKVList) -> io::Result<()> {
        write!(buf, "{}", Local::now().format(TIME_FORMAT))?;
        write!(buf, " {}", record.level())?;

        let mut kv_formatter = KvFormatter { buf };
        record
            .kv()
            .serialize(record, &mut kv_formatter)
            .map_err(|e| io::Error::other(e.to_string()))?;
        values
            .serialize(record, &mut kv_formatter)
            .map_err(|e| io::Error::other(e.to_string()))?;

        let msg = record.msg().to_string();
        if msg.is_empty() {
            buf.extend_from_slice(b" ()");
        } else {
            write!(buf, " {msg}")?;
        }
        if self.append_code_position {
            write!(buf, " <{}:{}>", record.module(), record.line())?;
        }
        writeln!(buf)
    }
}

impl<W: Write> Drain for PlainDrain<W> {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, values: &OwnedKVList) -> Result<Self::Ok, Self::Err> {
        let mut buf = Vec::with_capacity(256);
        self.format(&mut buf, record, values)?;

        let mut io = match self.io.lock() {
            Ok(io) => io,
            Err(p) => p.into_inner(),
        };
        io.write_all(&buf)?;
        io.flush()
    }
}

struct KvFormatter<'a> {
    buf: &'a mut Vec<u8>,
}

impl Serializer for KvFormatter<'_> {
    fn emit_arguments(&mut self, key: Key, val: &fmt::Arguments) -> slog::Result {
        write!(self.buf, " {key}: {val},")?;
        Ok(())
    }
}

pub fn setup(verbose_level: u8) -> Result<GlobalLoggerGuard, log::SetLoggerError> {
    let drain = PlainDrain::new(io::stderr(), true);
    let logger = slog::Logger::root(drain.fuse(), slog_o!());

    let scope_guard = slog_scope::set_global_logger(logger);

    let log_level = match verbose_level {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };

    slog_stdlog::init_with_level(log_level)?;
    Ok(scope_guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn plain_line() {
        let out = SharedBuf::default();
        let drain = PlainDrain::new(out.clone(), true);
        let logger = slog::Logger::root(drain.fuse(), slog_o!("hop" => 1));

        slog::info!(logger, "redirect followed"; "code" => 302);
        slog::warn!(logger, "");

        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(" INFO "));
        assert!(lines[0].contains(" code: 302,"));
        assert!(lines[0].contains(" hop: 1,"));
        assert!(lines[0].contains(" redirect followed <rawhop_fetch::stdlog::tests:"));
        assert!(lines[1].contains(" WARN"));
        assert!(lines[1].contains(" () <"));
    }
}
