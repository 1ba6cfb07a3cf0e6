use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use spdlog::{debug, warn};

use crate::error::{PublishError, Result};
use crate::post::{PostForm, RenderPayload};
use crate::site_metadata::SiteMetadata;

/// Where the render endpoint lives, usually derived from the inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    base_url: Url,
}

impl RequestContext {
    pub fn new(base_address: &str) -> Result<Self> {
        let base_address = base_address.trim();
        if base_address.is_empty() {
            return Err(PublishError::invalid_argument("request context has no base address"));
        }

        let mut base_url = match Url::parse(base_address) {
            Ok(url) => url,
            Err(e) => return Err(PublishError::invalid_argument(format!("invalid base address {}: {}", base_address, e))),
        };
        if base_url.cannot_be_a_base() {
            return Err(PublishError::invalid_argument(format!("invalid base address {}", base_address)));
        }

        // Url::join replaces the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { base_url })
    }

    pub fn from_host(scheme: &str, host: &str) -> Result<Self> {
        if host.trim().is_empty() {
            return Err(PublishError::invalid_argument("request has no host"));
        }
        Self::new(&format!("{}://{}", scheme, host))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// A render function bound to one endpoint and theme.
#[async_trait]
pub trait RenderEndpoint: Send + Sync {
    async fn render(&self, payload: &RenderPayload) -> Result<String>;
}

pub trait RenderEndpointResolver: Send + Sync {
    fn resolve(&self, ctx: &RequestContext, theme: &str) -> Result<Box<dyn RenderEndpoint>>;
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub endpoint_path: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            endpoint_path: "preview".to_string(),
        }
    }
}

/// Resolves `{base}/{endpoint_path}/{theme}` and posts the payload there as a form.
pub struct HttpRenderEndpointResolver {
    client: reqwest::Client,
    endpoint_path: String,
}

impl HttpRenderEndpointResolver {
    pub fn new(settings: &RenderSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .build()
            .map_err(PublishError::transport)?;

        Ok(Self {
            client,
            endpoint_path: settings.endpoint_path.trim_matches('/').to_string(),
        })
    }

    pub fn endpoint_url(&self, ctx: &RequestContext, theme: &str) -> Result<Url> {
        let relative = format!("{}/{}", self.endpoint_path, theme);
        ctx.base_url()
            .join(&relative)
            .map_err(|e| PublishError::invalid_argument(format!("invalid render endpoint {}: {}", relative, e)))
    }
}

impl RenderEndpointResolver for HttpRenderEndpointResolver {
    fn resolve(&self, ctx: &RequestContext, theme: &str) -> Result<Box<dyn RenderEndpoint>> {
        let url = self.endpoint_url(ctx, theme)?;
        Ok(Box::new(HttpRenderEndpoint {
            client: self.client.clone(),
            url,
        }))
    }
}

pub struct HttpRenderEndpoint {
    client: reqwest::Client,
    url: Url,
}

#[async_trait]
impl RenderEndpoint for HttpRenderEndpoint {
    async fn render(&self, payload: &RenderPayload) -> Result<String> {
        let response = self.client
            .post(self.url.clone())
            .form(payload)
            .send()
            .await
            .map_err(|e| {
                warn!("Render request to {} failed: {}", self.url, e);
                PublishError::transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Render endpoint {} answered {}", self.url, status);
            return Err(PublishError::RenderTransport {
                status: Some(status.as_u16()),
                message: format!("{} answered {}", self.url, status),
            });
        }

        response.text().await.map_err(PublishError::transport)
    }
}

pub struct RenderClient {
    resolver: Arc<dyn RenderEndpointResolver>,
    site_metadata: Arc<dyn SiteMetadata>,
}

impl RenderClient {
    pub fn new(resolver: Arc<dyn RenderEndpointResolver>, site_metadata: Arc<dyn SiteMetadata>) -> Self {
        Self { resolver, site_metadata }
    }

    /// Renders the form with the active theme. The response body is returned as is.
    pub async fn render_to_html(&self, form: &PostForm, ctx: &RequestContext) -> Result<String> {
        form.validate()?;

        let theme = self.site_metadata.active_theme();
        let endpoint = self.resolver.resolve(ctx, &theme)?;
        debug!("Rendering {} with theme {} against {}", form.slug, theme, ctx.base_url());

        endpoint.render(&RenderPayload::from(form)).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::site_metadata::ConfiguredSiteMetadata;
    use crate::test_data::{hello_world_form, RENDERED_DATA};

    use super::*;

    /// Answers every render with a fixed result and remembers what it was asked.
    pub(crate) struct FakeResolver {
        pub html: std::result::Result<String, u16>,
        pub requests: Arc<Mutex<Vec<(String, RenderPayload)>>>,
    }

    impl FakeResolver {
        pub fn rendering(html: &str) -> Self {
            Self { html: Ok(html.to_string()), requests: Arc::new(Mutex::new(vec![])) }
        }

        pub fn failing(status: u16) -> Self {
            Self { html: Err(status), requests: Arc::new(Mutex::new(vec![])) }
        }
    }

    struct FakeEndpoint {
        theme: String,
        html: std::result::Result<String, u16>,
        requests: Arc<Mutex<Vec<(String, RenderPayload)>>>,
    }

    #[async_trait]
    impl RenderEndpoint for FakeEndpoint {
        async fn render(&self, payload: &RenderPayload) -> Result<String> {
            self.requests.lock().unwrap().push((self.theme.clone(), payload.clone()));
            match self.html {
                Ok(ref html) => Ok(html.clone()),
                Err(status) => Err(PublishError::RenderTransport {
                    status: Some(status),
                    message: "fake failure".to_string(),
                }),
            }
        }
    }

    impl RenderEndpointResolver for FakeResolver {
        fn resolve(&self, _ctx: &RequestContext, theme: &str) -> Result<Box<dyn RenderEndpoint>> {
            Ok(Box::new(FakeEndpoint {
                theme: theme.to_string(),
                html: self.html.clone(),
                requests: self.requests.clone(),
            }))
        }
    }

    fn http_client(theme: &str) -> RenderClient {
        let resolver = HttpRenderEndpointResolver::new(&RenderSettings::default()).unwrap();
        RenderClient::new(Arc::new(resolver), Arc::new(ConfiguredSiteMetadata::new(theme)))
    }

    #[test]
    fn test_request_context() {
        let ctx = RequestContext::new("http://localhost:8001").unwrap();
        assert_eq!(ctx.base_url().as_str(), "http://localhost:8001/");

        let ctx = RequestContext::from_host("https", "example.com").unwrap();
        assert_eq!(ctx.base_url().as_str(), "https://example.com/");

        assert!(matches!(RequestContext::new(""), Err(PublishError::InvalidArgument(_))));
        assert!(matches!(RequestContext::new("not a url"), Err(PublishError::InvalidArgument(_))));
        assert!(matches!(RequestContext::from_host("http", ""), Err(PublishError::InvalidArgument(_))));
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let resolver = HttpRenderEndpointResolver::new(&RenderSettings::default()).unwrap();

        let ctx = RequestContext::new("http://localhost:8001").unwrap();
        let url = resolver.endpoint_url(&ctx, "default").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/preview/default");

        let ctx = RequestContext::new("http://localhost:8001/blog").unwrap();
        let url = resolver.endpoint_url(&ctx, "dark").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/blog/preview/dark");
    }

    #[tokio::test]
    async fn test_render_returns_body_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/preview/default"))
            .and(body_string_contains("title=Hello+World"))
            .and(body_string_contains("slug=hello-world"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RENDERED_DATA))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = RequestContext::new(&server.uri()).unwrap();
        let html = http_client("default").render_to_html(&hello_world_form(), &ctx).await.unwrap();
        assert_eq!(html, RENDERED_DATA);
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/preview/default"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let ctx = RequestContext::new(&server.uri()).unwrap();
        let res = http_client("default").render_to_html(&hello_world_form(), &ctx).await;
        assert!(matches!(res, Err(PublishError::RenderTransport { status: Some(500), .. })));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let ctx = RequestContext::new("http://127.0.0.1:1").unwrap();
        let res = http_client("default").render_to_html(&hello_world_form(), &ctx).await;
        assert!(matches!(res, Err(PublishError::RenderTransport { status: None, .. })));
    }

    #[tokio::test]
    async fn test_active_theme_is_used() {
        let resolver = Arc::new(FakeResolver::rendering(RENDERED_DATA));
        let client = RenderClient::new(resolver.clone(), Arc::new(ConfiguredSiteMetadata::new("dark")));
        let ctx = RequestContext::new("http://localhost").unwrap();

        client.render_to_html(&hello_world_form(), &ctx).await.unwrap();

        let requests = resolver.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "dark");
        assert_eq!(requests[0].1.body, "**Hello World**");
    }
}
