pub mod fetch;
pub mod normalize;
pub mod provider;

use crate::{Error, Result};
use reqwest::blocking::Client;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct RequestSpec {
    pub provider: &'static str,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(&'static str, String)>,
}

pub trait Transport {
    fn get(&self, request: &RequestSpec) -> Result<String>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| Error::Config(format!("http client build failed: {err}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &RequestSpec) -> Result<String> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        let response = builder.send().map_err(|err| Error::Transport {
            provider: request.provider.to_string(),
            reason: format!("http request failed: {err}"),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                provider: request.provider.to_string(),
                reason: format!("response status: {status}"),
            });
        }
        response.text().map_err(|err| Error::Transport {
            provider: request.provider.to_string(),
            reason: format!("http read failed: {err}"),
        })
    }
}
