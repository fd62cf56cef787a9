//! HTTP implementation of [`TrajectorySource`] on top of a blocking `ureq` agent.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use ureq::{Agent, AgentBuilder, Request, Response};

use super::{
    BackendError, CSRF_COOKIE, CSRF_HEADER, TrajectorySource, cookie_value, parse_id_list,
    parse_trajectories,
};
use crate::config::BackendConfig;
use crate::types::{RunId, TrajectoryDataset};

/// Characters escaped in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Path of `endpoint` for one run, with the run id as a single escaped segment.
fn run_path(endpoint: &str, run: &RunId) -> String {
    let id = run.to_string();
    format!("{endpoint}/{}", utf8_percent_encode(&id, PATH_SEGMENT))
}

/// Client for the N-body REST API.
#[derive(Clone)]
pub struct HttpBackend {
    agent: Agent,
    base_url: String,
    cookies: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            // No timeout: integrations can take a long time server-side.
            agent: AgentBuilder::new().build(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookies: config.cookies.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn csrf_token(&self) -> Option<&str> {
        self.cookies
            .as_deref()
            .and_then(|cookies| cookie_value(cookies, CSRF_COOKIE))
    }

    fn get(&self, path: &str) -> Result<String, BackendError> {
        let request = self.agent.get(&self.url(path));
        read_body(request.call())
    }

    /// POST an empty JSON object with the CSRF headers Django expects.
    fn post_empty(&self, path: &str) -> Result<String, BackendError> {
        let mut request: Request = self
            .agent
            .post(&self.url(path))
            .set("Content-Type", "application/json");
        if let Some(cookies) = &self.cookies {
            request = request.set("Cookie", cookies);
        }
        if let Some(token) = self.csrf_token() {
            request = request.set(CSRF_HEADER, token);
        }
        read_body(request.send_string("{}"))
    }
}

fn read_body(result: Result<Response, ureq::Error>) -> Result<String, BackendError> {
    match result {
        Ok(response) => response
            .into_string()
            .map_err(|e| BackendError::Transport(e.to_string())),
        Err(ureq::Error::Status(code, response)) => Err(BackendError::Status {
            code,
            status: response.status_text().to_string(),
        }),
        Err(ureq::Error::Transport(transport)) => {
            Err(BackendError::Transport(transport.to_string()))
        }
    }
}

impl TrajectorySource for HttpBackend {
    fn list_nbody_ids(&self) -> Result<Vec<RunId>, BackendError> {
        parse_id_list(&self.get("nbody-list-ids/")?)
    }

    fn list_run_ids(&self) -> Result<Vec<RunId>, BackendError> {
        parse_id_list(&self.get("integrator-list-ids/")?)
    }

    fn fetch_trajectories(&self, run: &RunId) -> Result<TrajectoryDataset, BackendError> {
        parse_trajectories(&self.post_empty(&run_path("integrator-update", run))?)
    }

    fn reset_run(&self, run: &RunId) -> Result<(), BackendError> {
        self.post_empty(&run_path("integrator-reset", run))?;
        Ok(())
    }
}
