/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocksNegotiationError {
    #[error("invalid version code")]
    InvalidVersion,
    #[error("invalid domain string")]
    InvalidDomainString,
    #[error("invalid addr type")]
    InvalidAddrType,
    #[error("invalid user auth message")]
    InvalidUserAuthMsg,
}

#[derive(Error, Debug)]
pub enum SocksReplyParseError {
    #[error("read failed: {0:?}")]
    ReadFailed(#[from] io::Error),
    #[error("invalid socks protocol: {0}")]
    InvalidProtocol(#[from] SocksNegotiationError),
}

#[derive(Error, Debug)]
pub enum SocksConnectError {
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
    #[error("no auth method available")]
    NoAuthMethodAvailable,
    #[error("auth failed")]
    AuthFailed,
    #[error("unsupported remote address: {0}")]
    UnsupportedRemoteAddress(&'static str),
    #[error("invalid socks protocol: {0}")]
    InvalidProtocol(#[from] SocksNegotiationError),
    #[error("peer timeout")]
    PeerTimeout,
    #[error("request failed: {0}")]
    RequestFailed(String),
}

impl From<SocksReplyParseError> for SocksConnectError {
    fn from(e: SocksReplyParseError) -> Self {
        match e {
            SocksReplyParseError::ReadFailed(e) => SocksConnectError::ReadFailed(e),
            SocksReplyParseError::InvalidProtocol(e) => SocksConnectError::InvalidProtocol(e),
        }
    }
}
