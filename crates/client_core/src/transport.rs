use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::{
    error::WidgetError,
    protocol::{QueryForm, FORM_CONTENT_TYPE},
};
use tracing::debug;
use url::Url;

use crate::QueryTransport;

/// Joins the endpoint path onto a page or server url the way a browser resolves a
/// root-relative `fetch` target.
pub fn resolve_endpoint(base: &str, endpoint_path: &str) -> Result<Url, WidgetError> {
    let base_url = Url::parse(base.trim())
        .map_err(|err| WidgetError::InvalidEndpoint(format!("{base}: {err}")))?;
    if base_url.cannot_be_a_base() {
        return Err(WidgetError::InvalidEndpoint(format!(
            "{base}: not a hierarchical url"
        )));
    }
    base_url
        .join(endpoint_path.trim())
        .map_err(|err| WidgetError::InvalidEndpoint(format!("{endpoint_path}: {err}")))
}

#[derive(Debug, Clone)]
pub struct HttpQueryTransport {
    http: Client,
    endpoint: Result<Url, WidgetError>,
}

impl HttpQueryTransport {
    pub fn new(endpoint: Url) -> Self {
        Self::resolved(Ok(endpoint))
    }

    /// An unresolvable endpoint fails each query instead of failing construction.
    pub fn resolved(endpoint: Result<Url, WidgetError>) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }
}

#[async_trait(?Send)]
impl QueryTransport for HttpQueryTransport {
    async fn post_query(&self, user_input: &str) -> Result<String, WidgetError> {
        let endpoint = self.endpoint.clone()?;
        let body = QueryForm::new(user_input).encode();
        debug!(%endpoint, bytes = body.len(), "posting chat query");

        let response = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|err| WidgetError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::HttpStatus(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|err| WidgetError::Transport(err.to_string()))
    }
}
