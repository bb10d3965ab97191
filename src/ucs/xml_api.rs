//! UCS Manager XML API client
//!
//! Every request is a single XML element POSTed to `/nuova`; every response
//! is a single element whose attributes carry the result or an
//! `errorCode` / `errorDescr` pair.

use std::net::Ipv6Addr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::ucs::client::{Session, UcsClient};
use crate::ucs::error::UcsError;

/// Managed object holding the running system (UCS Manager) firmware
const SYSTEM_FIRMWARE_DN: &str = "sys/mgmt/fw-system";

const API_PATH: &str = "/nuova";

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);").expect("entity regex is valid")
});

pub struct XmlApiClient {
    client: reqwest::Client,
    scheme: String,
}

impl XmlApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("ucs-version")
                .timeout(Duration::from_secs(config.timeout_secs))
                .danger_accept_invalid_certs(config.insecure)
                .build()
                .expect("Failed to create HTTP client"),
            scheme: config.scheme.clone(),
        }
    }

    fn endpoint(&self, address: &str) -> String {
        let address = address.trim().trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            format!("{address}{API_PATH}")
        } else if address.parse::<Ipv6Addr>().is_ok() {
            format!("{}://[{}]{}", self.scheme, address, API_PATH)
        } else {
            format!("{}://{}{}", self.scheme, address, API_PATH)
        }
    }

    /// Posts `body` and returns the response after checking `element` for an API error
    async fn call(&self, address: &str, element: &str, body: String) -> Result<String, UcsError> {
        let url = self.endpoint(address);
        debug!(url = %url, method = element, "Calling UCS Manager");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("UCS Manager returned status {}: {}", status, url);
            return Err(UcsError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let text = response.text().await?;

        if let Some(code) = attribute(&text, element, "errorCode") {
            return Err(UcsError::Api {
                code,
                description: attribute(&text, element, "errorDescr").unwrap_or_default(),
            });
        }

        Ok(text)
    }
}

impl Default for XmlApiClient {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

#[async_trait::async_trait]
impl UcsClient for XmlApiClient {
    async fn login(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Session, UcsError> {
        let body = format!(
            r#"<aaaLogin inName="{}" inPassword="{}" />"#,
            escape(username),
            escape(password)
        );

        let text = self.call(address, "aaaLogin", body).await?;

        match attribute(&text, "aaaLogin", "outCookie") {
            Some(cookie) if !cookie.is_empty() => Ok(Session::new(address.trim(), cookie)),
            _ => Err(UcsError::InvalidResponse(
                "login response has no session cookie".to_string(),
            )),
        }
    }

    async fn firmware_version(&self, session: &Session) -> Result<String, UcsError> {
        let body = format!(
            r#"<configResolveDn cookie="{}" dn="{}" inHierarchical="false" />"#,
            escape(session.cookie()),
            SYSTEM_FIRMWARE_DN
        );

        let text = self
            .call(session.address(), "configResolveDn", body)
            .await?;

        attribute(&text, "firmwareRunning", "version")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                UcsError::InvalidResponse(format!("{SYSTEM_FIRMWARE_DN} has no version"))
            })
    }

    async fn logout(&self, session: Session) -> Result<(), UcsError> {
        let body = format!(r#"<aaaLogout inCookie="{}" />"#, escape(session.cookie()));

        self.call(session.address(), "aaaLogout", body).await?;
        Ok(())
    }
}

/// Returns the value of attribute `name` on the first `element` in `xml`
fn attribute(xml: &str, element: &str, name: &str) -> Option<String> {
    let pattern = format!(
        r#"<{}\b[^>]*?\s{}="([^"]*)""#,
        regex::escape(element),
        regex::escape(name)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(xml).map(|caps| unescape(&caps[1]))
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn unescape(value: &str) -> String {
    ENTITY_RE
        .replace_all(value, |caps: &regex::Captures| {
            let decoded = match &caps[1] {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                reference => {
                    let code = match reference.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => reference[1..].parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            // Unknown code points stay as written
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
