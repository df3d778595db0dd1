use std::thread;
use std::time::Duration;

use issueline_core::{ErrorCode, IdentityKey, IdentityResolver, ResolvedPerson, ResolverError};
use tracing::{debug, warn};

use crate::config::IdServiceConfig;
use crate::protocol::{self, Registration};

/// Blocking client for the identity service.
#[derive(Debug)]
pub struct HttpIdResolver {
    agent: ureq::Agent,
    base_url: String,
    project_id: String,
    max_retries: u32,
    backoff: Duration,
}

impl HttpIdResolver {
    #[must_use]
    pub fn new(config: &IdServiceConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self {
            agent,
            base_url: config.base_url(),
            project_id: config.project_id.to_string(),
            max_retries: config.max_retries,
            backoff: config.backoff(),
        }
    }

    fn register(&self, name: &str, email: &str) -> Result<Registration, ResolverError> {
        let url = format!("{}/post_user_id", self.base_url);
        let body = self.send(&url, || {
            self.agent.post(&url).set("Accept", "text/plain").send_form(&[
                ("projectID", self.project_id.as_str()),
                ("name", name),
                ("email", email),
            ])
        })?;
        protocol::parse_registration(&body)
    }

    fn fetch(&self, id: IdentityKey) -> Result<ResolvedPerson, ResolverError> {
        let url = format!("{}/getUser/{id}", self.base_url);
        let body = self.send(&url, || {
            self.agent.get(&url).set("Accept", "text/plain").call()
        })?;
        protocol::parse_person(&body)
    }

    /// Issue `request`, retrying transport failures and 5xx answers with
    /// linear backoff. Any other HTTP status is a malformed response.
    fn send(
        &self,
        url: &str,
        request: impl Fn() -> Result<ureq::Response, ureq::Error>,
    ) -> Result<String, ResolverError> {
        let mut attempt = 0;
        loop {
            match request() {
                Ok(response) => {
                    return response.into_string().map_err(|e| {
                        ResolverError::MalformedResponse(format!("unreadable body from {url}: {e}"))
                    });
                }
                Err(ureq::Error::Status(status, _)) if status < 500 => {
                    return Err(ResolverError::MalformedResponse(format!(
                        "{url} answered HTTP {status}"
                    )));
                }
                Err(err) => {
                    if attempt >= self.max_retries {
                        return Err(ResolverError::Unavailable(format!("{url}: {err}")));
                    }
                    attempt += 1;
                    let wait = self.backoff * attempt;
                    warn!(
                        code = %ErrorCode::ResolverUnavailable,
                        url,
                        attempt,
                        wait_ms = wait.as_millis(),
                        error = %err,
                        "identity service request failed; retrying"
                    );
                    thread::sleep(wait);
                }
            }
        }
    }
}

impl IdentityResolver for HttpIdResolver {
    fn resolve(&self, display_name: &str, email: &str) -> Result<ResolvedPerson, ResolverError> {
        let key = match self.register(display_name, email)? {
            Registration::Registered(key) => key,
            Registration::Rejected(reason) => {
                let fallback = protocol::fallback_email(display_name);
                debug!(
                    name = display_name,
                    %reason,
                    %fallback,
                    "registration rejected; retrying with fallback e-mail"
                );
                match self.register(display_name, &fallback)? {
                    Registration::Registered(key) => key,
                    Registration::Rejected(reason) => {
                        return Err(ResolverError::MalformedResponse(format!(
                            "registration of '{display_name}' rejected twice: {reason}"
                        )));
                    }
                }
            }
        };

        debug!(name = display_name, %key, "fetching canonical person");
        self.fetch(key)
    }
}
