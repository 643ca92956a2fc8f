// src/net.rs

// HTTPS GET via a shared blocking client. The advisory site rejects the
// default library UA, so we present a browser one.

use std::error::Error;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::params::{REQUEST_TIMEOUT_SECS, USER_AGENT};

pub fn client() -> Result<Client, Box<dyn Error>> {
    let c = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    Ok(c)
}

/// Fetch one URL as raw bytes (evidence documents may be PDFs).
/// Non-2xx statuses are errors.
pub fn http_get(client: &Client, url: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let resp = client.get(url).send()?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}
