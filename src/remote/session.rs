use std::io::Read;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::collection::{CollectionQuery, RenderRequest, TimelapseRequest};
use super::config::ServiceConfig;
use super::error::{Result, ServiceError};
use crate::color::Ramp;
use crate::data::bloom::BloomCollection;

// ---------------------------------------------------------------------------
// Session – authenticated connection to the imagery service
// ---------------------------------------------------------------------------

/// An authenticated service session. One token exchange on `connect`, an
/// explicit `close` teardown, and every materialize call goes through it –
/// there is no ambient global auth state.
pub struct Session {
    agent: ureq::Agent,
    base_url: String,
    token: String,
    retry_delay: Duration,
    max_retry: u8,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Deserialize)]
struct SizeResponse {
    size: usize,
}

impl Session {
    /// Exchange the API key for a session token. The only authentication
    /// round trip for the lifetime of the session.
    pub fn connect(config: &ServiceConfig) -> Result<Session> {
        let api_key = config.api_key()?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();

        let url = join_url(&config.base_url, "session");
        let resp = agent
            .post(&url)
            .send_json(serde_json::json!({ "api_key": api_key }))
            .map_err(status_or_transport)?;
        let auth: AuthResponse = resp
            .into_json()
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

        log::info!("connected to {}", config.base_url);
        Ok(Session {
            agent,
            base_url: config.base_url.clone(),
            token: auth.token,
            retry_delay: config.retry_delay(),
            max_retry: config.max_retry,
        })
    }

    /// Tear the session down server-side. Failures are logged, not returned;
    /// the token expires on its own either way.
    pub fn close(self) {
        let url = join_url(&self.base_url, "session");
        match self.agent.delete(&url).set("Authorization", &self.bearer()).call() {
            Ok(_) => log::info!("session closed"),
            Err(e) => log::warn!("session teardown failed: {e}"),
        }
    }

    /// Number of frames matching the query. A blocking round trip.
    pub fn collection_size(&self, query: &CollectionQuery) -> Result<usize> {
        let resp = self.post_json("collection/size", query)?;
        let size: SizeResponse = resp
            .into_json()
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;
        Ok(size.size)
    }

    /// Server-rendered mean of the raw collection as a PNG, clipped to the
    /// query bounds.
    pub fn render_mean(
        &self,
        query: &CollectionQuery,
        range: (i32, i32),
        ramp: &Ramp,
    ) -> Result<Vec<u8>> {
        let req = RenderRequest::mean(query.clone(), range, ramp.hex_stops());
        self.fetch_bytes("render", &req)
    }

    /// Server-rendered mean of the masked bloom frames as a PNG. The caller
    /// must not pass an empty collection; a mean over zero frames is
    /// undefined server-side.
    pub fn render_bloom_mean(
        &self,
        blooms: &BloomCollection,
        range: (i32, i32),
        ramp: &Ramp,
    ) -> Result<Vec<u8>> {
        let req = RenderRequest::bloom_mean(blooms.clone(), range, ramp.hex_stops());
        self.fetch_bytes("render", &req)
    }

    /// Server-rendered animation over the full collection as a GIF.
    pub fn render_timelapse(&self, query: &CollectionQuery, fps: u8) -> Result<Vec<u8>> {
        let req = TimelapseRequest {
            query: query.clone(),
            fps,
        };
        self.fetch_bytes("timelapse", &req)
    }

    // -- request plumbing --

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Authenticated POST with bounded retry on transport failures. Status
    /// errors are deterministic and returned immediately.
    fn post_json(&self, path: &str, body: &impl Serialize) -> Result<ureq::Response> {
        let url = join_url(&self.base_url, path);
        let mut attempt: u8 = 0;
        loop {
            let result = self
                .agent
                .post(&url)
                .set("Authorization", &self.bearer())
                .send_json(body);
            match result {
                Ok(resp) => return Ok(resp),
                Err(ureq::Error::Status(code, resp)) => {
                    return Err(ServiceError::Status {
                        code,
                        message: resp.into_string().unwrap_or_default(),
                    });
                }
                Err(err) => {
                    if attempt >= self.max_retry {
                        return Err(ServiceError::Transport(err.to_string()));
                    }
                    attempt += 1;
                    log::warn!(
                        "POST {url} failed ({err}), retry {attempt}/{}",
                        self.max_retry
                    );
                    std::thread::sleep(self.retry_delay);
                }
            }
        }
    }

    fn fetch_bytes(&self, path: &str, body: &impl Serialize) -> Result<Vec<u8>> {
        let resp = self.post_json(path, body)?;
        let mut bytes = Vec::new();
        resp.into_reader().read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

fn status_or_transport(err: ureq::Error) -> ServiceError {
    match err {
        ureq::Error::Status(code, resp) => ServiceError::Status {
            code,
            message: resp.into_string().unwrap_or_default(),
        },
        other => ServiceError::Transport(other.to_string()),
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("https://imagery.phenocloud.io/v1/", "collection/size"),
            "https://imagery.phenocloud.io/v1/collection/size"
        );
        assert_eq!(join_url("http://localhost:8080", "session"), "http://localhost:8080/session");
    }
}
