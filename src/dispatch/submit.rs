use crate::config::ServerConfig;
use crate::error::SubmitError;
use crate::graph::WorkflowGraph;
use reqwest::blocking::Client;
use serde::Serialize;
use std::io::Write;

/// Hands a fully resolved workflow to whatever executes it.
pub trait Submitter {
    fn submit(&mut self, graph: &WorkflowGraph) -> Result<(), SubmitError>;
}

impl<T: Submitter + ?Sized> Submitter for &mut T {
    fn submit(&mut self, graph: &WorkflowGraph) -> Result<(), SubmitError> {
        (**self).submit(graph)
    }
}

impl<T: Submitter + ?Sized> Submitter for Box<T> {
    fn submit(&mut self, graph: &WorkflowGraph) -> Result<(), SubmitError> {
        (**self).submit(graph)
    }
}

/// Request body expected by the generation server.
#[derive(Serialize)]
struct PromptRequest<'a> {
    prompt: &'a WorkflowGraph,
}

/// POSTs `{"prompt": <graph>}` to `<addr>/prompt`, one blocking request at a time.
pub struct HttpSubmitter {
    client: Client,
    config: ServerConfig,
}

impl HttpSubmitter {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Uses a preconfigured client, e.g. one with custom timeouts or proxy rules.
    pub fn with_client(config: ServerConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl Submitter for HttpSubmitter {
    fn submit(&mut self, graph: &WorkflowGraph) -> Result<(), SubmitError> {
        let url = self.config.prompt_url();
        let mut request = self.client.post(&url).json(&PromptRequest { prompt: graph });
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| SubmitError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Writes each request body as pretty JSON instead of sending it.
pub struct DryRunSubmitter<W: Write> {
    writer: W,
}

impl<W: Write> DryRunSubmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Submitter for DryRunSubmitter<W> {
    fn submit(&mut self, graph: &WorkflowGraph) -> Result<(), SubmitError> {
        serde_json::to_writer_pretty(&mut self.writer, &PromptRequest { prompt: graph })
            .map_err(|e| SubmitError::Encode(e.to_string()))?;
        writeln!(self.writer).map_err(|e| SubmitError::Encode(e.to_string()))
    }
}
