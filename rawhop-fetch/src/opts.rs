/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};
use http::{Method, Version};
use humanize_rs::ParseError;
use url::Url;

use rawhop_client::TransportConfig;
use rawhop_http::{HttpContent, HttpRequest};
use rawhop_types::net::Proxy;

const ARG_URL: &str = "url";
const ARG_METHOD: &str = "method";
const ARG_HEADER: &str = "header";
const ARG_DATA: &str = "data";
const ARG_CONTENT_TYPE: &str = "content-type";
const ARG_HTTP_10: &str = "http10";
const ARG_CONFIG: &str = "config";
const ARG_PROXY: &str = "proxy";
const ARG_NO_REDIRECT: &str = "no-redirect";
const ARG_MAX_REDIRECTS: &str = "max-redirects";
const ARG_TIMEOUT: &str = "timeout";
const ARG_INCLUDE: &str = "include";
const ARG_SHOW_SENT: &str = "show-sent";
const ARG_OUTPUT: &str = "output";
const ARG_VERBOSE: &str = "verbose";
const ARG_VERSION: &str = "version";

pub struct ProcArgs {
    pub verbose_level: u8,
    url: Url,
    method: Method,
    version: Version,
    headers: Vec<(String, String)>,
    data: Option<String>,
    content_type: Option<String>,
    config_file: Option<PathBuf>,
    proxy: Option<Proxy>,
    no_redirect: bool,
    max_redirects: Option<usize>,
    timeout: Option<Duration>,
    pub include_head: bool,
    pub show_sent: bool,
    pub output: Option<PathBuf>,
}

impl ProcArgs {
    fn new(url: Url) -> Self {
        ProcArgs {
            verbose_level: 0,
            url,
            method: Method::GET,
            version: Version::HTTP_11,
            headers: Vec::new(),
            data: None,
            content_type: None,
            config_file: None,
            proxy: None,
            no_redirect: false,
            max_redirects: None,
            timeout: None,
            include_head: false,
            show_sent: false,
            output: None,
        }
    }

    /// Load the config file if set, then apply the command line overrides
    pub fn transport_config(&self) -> anyhow::Result<TransportConfig> {
        let mut config = match &self.config_file {
            Some(path) => {
                let doc = rawhop_yaml::load_doc(path)?;
                TransportConfig::parse_yaml(&doc, path.parent())
                    .context(format!("invalid transport config in {}", path.display()))?
            }
            None => TransportConfig::default(),
        };
        if let Some(proxy) = &self.proxy {
            config.proxy = Some(proxy.clone());
        }
        if self.no_redirect {
            config.allow_auto_redirect = false;
        }
        if let Some(max) = self.max_redirects {
            config.max_redirects = max;
        }
        if let Some(timeout) = self.timeout {
            config.receive_timeout = timeout;
        }
        Ok(config)
    }

    pub fn build_request(&self) -> anyhow::Result<HttpRequest> {
        let mut request = HttpRequest::new(self.method.clone(), self.url.clone());
        request.version = self.version;
        for (name, value) in &self.headers {
            request
                .append_header(name, value)
                .map_err(|_| anyhow!("invalid header name {name}"))?;
        }
        if let Some(data) = &self.data {
            let content = match &self.content_type {
                Some(t) => HttpContent::with_type(data.clone(), t),
                None => HttpContent::with_type(data.clone(), "application/x-www-form-urlencoded"),
            };
            request.content = Some(content);
        }
        Ok(request)
    }
}

fn build_cli_args() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .disable_version_flag(true)
        .arg(
            Arg::new(ARG_URL)
                .help("Target url")
                .value_name("URL")
                .required_unless_present(ARG_VERSION)
                .num_args(1)
                .value_parser(value_parser!(Url))
                .value_hint(ValueHint::Url),
        )
        .arg(
            Arg::new(ARG_METHOD)
                .help("Request method")
                .value_name("METHOD")
                .short('X')
                .long(ARG_METHOD)
                .num_args(1),
        )
        .arg(
            Arg::new(ARG_HEADER)
                .help("Add a request header, as 'Name: Value'")
                .value_name("HEADER")
                .short('H')
                .long(ARG_HEADER)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new(ARG_DATA)
                .help("Request body, sent with POST if no method is set")
                .value_name("DATA")
                .short('d')
                .long(ARG_DATA)
                .num_args(1),
        )
        .arg(
            Arg::new(ARG_CONTENT_TYPE)
                .help("Content type of the request body")
                .value_name("TYPE")
                .long(ARG_CONTENT_TYPE)
                .num_args(1)
                .requires(ARG_DATA),
        )
        .arg(
            Arg::new(ARG_HTTP_10)
                .help("Use HTTP/1.0")
                .long(ARG_HTTP_10)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_CONFIG)
                .help("Transport config file in yaml")
                .value_name("CONFIG FILE")
                .short('c')
                .long(ARG_CONFIG)
                .num_args(1)
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new(ARG_PROXY)
                .help("Proxy url, http / socks4 / socks4a / socks5")
                .value_name("PROXY URL")
                .short('x')
                .long(ARG_PROXY)
                .num_args(1)
                .value_parser(value_parser!(Url)),
        )
        .arg(
            Arg::new(ARG_NO_REDIRECT)
                .help("Do not follow redirects")
                .long(ARG_NO_REDIRECT)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_MAX_REDIRECTS)
                .help("Max number of redirects to follow")
                .value_name("COUNT")
                .long(ARG_MAX_REDIRECTS)
                .num_args(1)
                .value_parser(value_parser!(usize))
                .conflicts_with(ARG_NO_REDIRECT),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .help("Receive timeout of each read")
                .value_name("TIMEOUT DURATION")
                .long(ARG_TIMEOUT)
                .num_args(1),
        )
        .arg(
            Arg::new(ARG_INCLUDE)
                .help("Print the response status line and headers")
                .short('i')
                .long(ARG_INCLUDE)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_SHOW_SENT)
                .help("Dump the raw bytes sent to stderr")
                .long(ARG_SHOW_SENT)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_OUTPUT)
                .help("Write the response body to file")
                .value_name("OUTPUT FILE")
                .short('o')
                .long(ARG_OUTPUT)
                .num_args(1)
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new(ARG_VERBOSE)
                .help("Show verbose log")
                .short('v')
                .long(ARG_VERBOSE)
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new(ARG_VERSION)
                .help("Show version")
                .short('V')
                .long(ARG_VERSION)
                .action(ArgAction::SetTrue),
        )
}

fn parse_header(s: &str) -> anyhow::Result<(String, String)> {
    let Some((name, value)) = s.split_once(':') else {
        return Err(anyhow!("no ':' found in header {s}"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("empty header name in {s}"));
    }
    let value = value.strip_prefix(' ').unwrap_or(value);
    Ok((name.to_string(), value.to_string()))
}

fn parse_args(args: &ArgMatches) -> anyhow::Result<ProcArgs> {
    let url = args
        .get_one::<Url>(ARG_URL)
        .ok_or_else(|| anyhow!("no target url set"))?;
    let mut proc_args = ProcArgs::new(url.clone());

    proc_args.verbose_level = args.get_count(ARG_VERBOSE);

    if let Some(headers) = args.get_many::<String>(ARG_HEADER) {
        for s in headers {
            let header = parse_header(s).context(format!("invalid value for arg {ARG_HEADER}"))?;
            proc_args.headers.push(header);
        }
    }
    if let Some(data) = args.get_one::<String>(ARG_DATA) {
        proc_args.data = Some(data.to_string());
        proc_args.method = Method::POST;
    }
    proc_args.content_type = args.get_one::<String>(ARG_CONTENT_TYPE).cloned();
    if let Some(method) = args.get_one::<String>(ARG_METHOD) {
        proc_args.method = Method::from_str(&method.to_ascii_uppercase())
            .map_err(|e| anyhow!("invalid request method {method}: {e}"))?;
    }
    if args.get_flag(ARG_HTTP_10) {
        proc_args.version = Version::HTTP_10;
    }

    proc_args.config_file = args.get_one::<PathBuf>(ARG_CONFIG).cloned();
    if let Some(url) = args.get_one::<Url>(ARG_PROXY) {
        let proxy = Proxy::try_from(url).map_err(|e| anyhow!("invalid proxy url {url}: {e}"))?;
        proc_args.proxy = Some(proxy);
    }
    proc_args.no_redirect = args.get_flag(ARG_NO_REDIRECT);
    proc_args.max_redirects = args.get_one::<usize>(ARG_MAX_REDIRECTS).copied();
    proc_args.timeout = get_duration(args, ARG_TIMEOUT)?;

    proc_args.include_head = args.get_flag(ARG_INCLUDE);
    proc_args.show_sent = args.get_flag(ARG_SHOW_SENT);
    proc_args.output = args.get_one::<PathBuf>(ARG_OUTPUT).cloned();
    Ok(proc_args)
}

fn get_duration(args: &ArgMatches, id: &str) -> anyhow::Result<Option<Duration>> {
    let Some(v) = args.get_one::<String>(id) else {
        return Ok(None);
    };
    match humanize_rs::duration::parse(v) {
        Ok(d) => Ok(Some(d)),
        Err(ParseError::MissingUnit) => {
            let secs = u64::from_str(v).map_err(|_| anyhow!("invalid {id} value {v}"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(e) => Err(anyhow!("invalid {id} value {v}: {e}")),
    }
}

/// Parse the command line, `None` if there is nothing more to do
pub fn parse_clap() -> anyhow::Result<Option<ProcArgs>> {
    let args = build_cli_args().get_matches();
    if args.get_flag(ARG_VERSION) {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(None);
    }
    parse_args(&args).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<ProcArgs> {
        let args = build_cli_args().try_get_matches_from(argv)?;
        parse_args(&args)
    }

    #[test]
    fn defaults() {
        let args = parse(&["rawhop-fetch", "http://x.test/"]).unwrap();
        assert_eq!(args.method, Method::GET);
        assert_eq!(args.version, Version::HTTP_11);
        assert_eq!(args.verbose_level, 0);

        let config = args.transport_config().unwrap();
        assert!(config.allow_auto_redirect);
        assert_eq!(config.max_redirects, 8);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn post_data() {
        let args = parse(&[
            "rawhop-fetch",
            "-d",
            "a=1",
            "-H",
            "Accept: text/html",
            "-H",
            "X-Empty:",
            "-vv",
            "http://x.test/form",
        ])
        .unwrap();
        assert_eq!(args.method, Method::POST);
        assert_eq!(args.verbose_level, 2);
        assert_eq!(
            args.headers,
            vec![
                ("Accept".to_string(), "text/html".to_string()),
                ("X-Empty".to_string(), String::new()),
            ]
        );

        let req = args.build_request().unwrap();
        let content = req.content.unwrap();
        assert_eq!(content.body.as_ref(), b"a=1");
        assert_eq!(
            content.headers.get_first(&http::header::CONTENT_TYPE),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn overrides() {
        let args = parse(&[
            "rawhop-fetch",
            "-X",
            "put",
            "--http10",
            "-x",
            "socks5://127.0.0.1:1080",
            "--max-redirects",
            "2",
            "--timeout",
            "1500ms",
            "https://x.test/",
        ])
        .unwrap();
        assert_eq!(args.method, Method::PUT);
        assert_eq!(args.version, Version::HTTP_10);

        let config = args.transport_config().unwrap();
        assert!(matches!(config.proxy, Some(Proxy::Socks5(_))));
        assert_eq!(config.max_redirects, 2);
        assert_eq!(config.receive_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn invalid() {
        assert!(parse(&["rawhop-fetch", "-H", "NoColon", "http://x.test/"]).is_err());
        assert!(parse(&["rawhop-fetch", "-x", "ftp://p.test", "http://x.test/"]).is_err());
        assert!(parse(&["rawhop-fetch", "--timeout", "soon", "http://x.test/"]).is_err());
        assert!(
            parse(&[
                "rawhop-fetch",
                "--no-redirect",
                "--max-redirects",
                "1",
                "http://x.test/"
            ])
            .is_err()
        );
        assert!(parse(&["rawhop-fetch", "not a url"]).is_err());
    }
}
