// src/core/net.rs

// Blocking HTTPS GET. One agent per process, built on first use.

use std::{error::Error, io::Read, sync::OnceLock, time::Duration};

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};

fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout_connect(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .timeout_read(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
    })
}

/// GET `url` and return the body as text. Non-2xx statuses are errors.
pub fn http_get(url: &str) -> Result<String, Box<dyn Error>> {
    logd!("Net: GET {}", url);
    let resp = match agent().get(url).call() {
        Ok(r) => r,
        Err(ureq::Error::Status(code, r)) => {
            return Err(format!("HTTP error: {} {} {}", code, r.status_text(), url).into());
        }
        Err(e) => return Err(format!("HTTP transport error: {} ({})", url, e).into()),
    };

    let mut buf = Vec::new();
    resp.into_reader().read_to_end(&mut buf)?;
    let body = String::from_utf8_lossy(&buf).into_owned();
    logd!("Net: {} bytes from {}", body.len(), url);
    Ok(body)
}
