use crate::Result;
use reqwest::Client;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Honor `HTTP_PROXY`-style environment variables.
    pub system_proxy: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            system_proxy: true,
        }
    }
}

/// Shared reqwest client; a timed-out request surfaces as an ordinary HTTP error.
pub fn build_http_client(options: &TransportOptions) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(options.request_timeout)
        .connect_timeout(options.connect_timeout);

    if !options.system_proxy {
        builder = builder.no_proxy();
    }

    Ok(builder.build()?)
}

pub(crate) async fn response_message(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => String::new(),
        Err(error) => format!("<unreadable body: {}>", error),
    }
}
