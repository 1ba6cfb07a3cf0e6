use std::io;
use std::io::ErrorKind;
use std::sync::Arc;

use ntex::http::{header, StatusCode};
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{error, info, warn};

use crate::config::Config;
use crate::error::PublishError;
use crate::post::{PostForm, RenderPayload};
use crate::publish::publisher::Publisher;
use crate::publish::render_client::RequestContext;
use crate::text_utils::is_url_safe_slug;
use crate::view::theme_renderer::{load_theme, ThemeRenderer};

pub struct AppState {
    pub config: Config,
    pub publisher: Publisher,
}

fn request_context(req: &HttpRequest, config: &Config) -> Result<RequestContext, PublishError> {
    if let Some(ref base_url) = config.render.base_url {
        return RequestContext::new(base_url);
    }

    let host = req.headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    let scheme = req.uri().scheme_str().unwrap_or("http");
    RequestContext::from_host(scheme, host)
}

pub fn error_response(err: &PublishError) -> web::HttpResponse {
    match err {
        PublishError::InvalidArgument(_) => web::HttpResponse::BadRequest()
            .body(err.to_string()),
        PublishError::PublishFailed { .. } => web::HttpResponse::InternalServerError()
            .body(err.to_string()),
        PublishError::RenderTransport { .. } => web::HttpResponse::build(StatusCode::BAD_GATEWAY)
            .body(err.to_string()),
    }
}

#[web::post("/publish")]
async fn publish(req: HttpRequest, form: web::types::Form<PostForm>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let form = form.into_inner();
    if !is_url_safe_slug(&form.slug) {
        warn!("Rejecting publish with unsafe slug {:?}", form.slug);
        return error_response(&PublishError::invalid_argument(format!("slug {:?} is not url-safe", form.slug)));
    }

    let ctx = match request_context(&req, &state.config) {
        Ok(ctx) => ctx,
        Err(e) => return error_response(&e),
    };

    let paths = match state.publisher.publish_post(&form, &ctx).await {
        Ok(paths) => paths,
        Err(e) => return error_response(&e),
    };

    match serde_json::to_string(&paths) {
        Ok(body) => web::HttpResponse::Ok()
            .content_type("application/json")
            .body(body),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error serializing published paths: {}", e)),
    }
}

#[web::post("/preview/{theme}")]
async fn preview(theme: web::types::Path<String>, payload: web::types::Form<RenderPayload>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let theme = theme.into_inner();

    let theme_src = match load_theme(&state.config.paths.theme_dir, &theme) {
        Ok(src) => src,
        Err(e) if e.kind() == ErrorKind::InvalidInput => {
            return web::HttpResponse::BadRequest().body(format!("Invalid theme {}", theme));
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Theme {} not found in {}", theme, state.config.paths.theme_dir.display());
            return web::HttpResponse::NotFound().body(format!("Theme {} not found", theme));
        }
        Err(e) => {
            error!("Error loading theme {}: {}", theme, e);
            return web::HttpResponse::InternalServerError().body(format!("Error loading theme {}: {}", theme, e));
        }
    };

    let renderer = match ThemeRenderer::new(&theme_src) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("{}", e);
            return web::HttpResponse::InternalServerError().body(e.to_string());
        }
    };

    match renderer.render(&payload) {
        Ok(html) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => web::HttpResponse::BadRequest()
            .body(format!("Error rendering {}: {}", payload.slug, e)),
    }
}

#[web::get("/posts/{year}/{month}/{day}/{slug}")]
async fn published_post(path: web::types::Path<(String, String, String, String)>, state: web::types::State<Arc<AppState>>) -> Result<NamedFile, web::Error> {
    let (year, month, day, slug) = path.into_inner();
    if [&year, &month, &day, &slug].iter().any(|p| p.contains("..")) {
        return Err(web::error::ErrorBadRequest("Invalid post path").into());
    }

    let file_path = state.config.paths.html_root
        .join(year)
        .join(month)
        .join(day)
        .join(format!("{}.html", slug));

    Ok(NamedFile::open(file_path)?)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(publish)
        .service(preview)
        .service(published_post);
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let publisher = match Publisher::from_config(&config) {
        Ok(publisher) => publisher,
        Err(e) => return Err(io::Error::new(ErrorKind::Other, format!("Error creating publisher: {}", e))),
    };

    info!("Markdown root: {}", config.paths.markdown_root.display());
    info!("Html root: {}", config.paths.html_root.display());
    info!("Active theme: {}", config.site.theme);

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState {
        config,
        publisher,
    });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .configure(configure)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
