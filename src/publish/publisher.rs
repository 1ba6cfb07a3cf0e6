use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use spdlog::{debug, error, info};

use crate::config::Config;
use crate::error::{ArtifactKind, Result};
use crate::post::{PostForm, PublishedMetadata, PublishedPostPath};
use crate::publish::artifact_writer::ArtifactWriter;
use crate::publish::front_matter::apply_metadata;
use crate::publish::render_client::{HttpRenderEndpointResolver, RenderClient, RenderEndpointResolver, RequestContext};
use crate::site_metadata::{ConfiguredSiteMetadata, SiteMetadata};
use crate::storage::{FileSystem, LocalFileSystem};

/// Where the two artifacts go. Nothing ties the roots together, they may even be the same.
#[derive(Debug, Clone)]
pub struct PublishRoots {
    pub markdown_root: PathBuf,
    pub html_root: PathBuf,
}

pub struct Publisher {
    roots: PublishRoots,
    writer: ArtifactWriter,
    render_client: RenderClient,
    site_metadata: Arc<dyn SiteMetadata>,
}

impl Publisher {
    pub fn new(
        roots: PublishRoots,
        fs: Arc<dyn FileSystem>,
        resolver: Arc<dyn RenderEndpointResolver>,
        site_metadata: Arc<dyn SiteMetadata>,
    ) -> Self {
        Self {
            roots,
            writer: ArtifactWriter::new(fs),
            render_client: RenderClient::new(resolver, site_metadata.clone()),
            site_metadata,
        }
    }

    /// Local disk, the HTTP renderer and the configured theme.
    pub fn from_config(config: &Config) -> Result<Self> {
        let resolver = HttpRenderEndpointResolver::new(&config.render_settings())?;
        Ok(Self::new(
            config.publish_roots(),
            Arc::new(LocalFileSystem),
            Arc::new(resolver),
            Arc::new(ConfiguredSiteMetadata::new(&config.site.theme)),
        ))
    }

    pub async fn publish_markdown(&self, markdown: &str, metadata: &PublishedMetadata) -> Result<PathBuf> {
        metadata.validate()?;
        self.writer.publish_text(
            &self.roots.markdown_root,
            &metadata.date_published,
            &metadata.slug,
            ArtifactKind::Markdown,
            markdown,
        ).await
    }

    pub async fn publish_html(&self, html: &str, metadata: &PublishedMetadata) -> Result<PathBuf> {
        metadata.validate()?;
        self.writer.publish_text(
            &self.roots.html_root,
            &metadata.date_published,
            &metadata.slug,
            ArtifactKind::Html,
            html,
        ).await
    }

    pub async fn get_published_html(&self, form: &PostForm, ctx: &RequestContext) -> Result<String> {
        self.render_client.render_to_html(form, ctx).await
    }

    /// Compose, store the markdown, render, store the html. The first failing stage
    /// ends the publish; artifacts already written stay on disk.
    pub async fn publish_post(&self, form: &PostForm, ctx: &RequestContext) -> Result<PublishedPostPath> {
        self.publish_post_at(form, ctx, Utc::now().naive_utc()).await
    }

    pub async fn publish_post_at(
        &self,
        form: &PostForm,
        ctx: &RequestContext,
        submitted_at: NaiveDateTime,
    ) -> Result<PublishedPostPath> {
        form.validate()?;

        let metadata = PublishedMetadata {
            date_published: form.published_at(submitted_at),
            slug: form.slug.clone(),
            theme: self.site_metadata.active_theme(),
        };

        let res = self.run_stages(form, ctx, &metadata).await;
        if let Err(ref e) = res {
            error!("Error publishing {}: {}", metadata.slug, e);
        }
        res
    }

    async fn run_stages(
        &self,
        form: &PostForm,
        ctx: &RequestContext,
        metadata: &PublishedMetadata,
    ) -> Result<PublishedPostPath> {
        let markdown = apply_metadata(form, metadata)?;
        debug!("{}: composed markdown", metadata.slug);

        let markdown_path = self.publish_markdown(&markdown, metadata).await?;
        debug!("{}: markdown persisted", metadata.slug);

        // the rendered page shows the resolved publication date, not the raw form value
        let dated_form = PostForm {
            date_published: Some(metadata.date_published),
            ..form.clone()
        };
        let html = self.get_published_html(&dated_form, ctx).await?;
        debug!("{}: rendered with theme {}", metadata.slug, metadata.theme);

        let html_path = self.publish_html(&html, metadata).await?;
        info!("Post {} published to {} and {}", metadata.slug, markdown_path.display(), html_path.display());

        Ok(PublishedPostPath {
            markdown: markdown_path,
            html: html_path,
        })
    }
}
