use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use postpress::config::{read_config, Config};
use postpress::post::PostForm;
use postpress::publish::publisher::Publisher;
use postpress::publish::render_client::RequestContext;
use postpress::text_utils::{parse_date_time, slug_from_title};
use postpress::util::os_helper::get_name;

use crate::PublishArgs;

fn base_address(args: &PublishArgs, config: &Config) -> String {
    if let Some(ref server) = args.server {
        return server.clone();
    }
    if let Some(ref base_url) = config.render.base_url {
        return base_url.clone();
    }

    let address = match config.server.address.as_str() {
        "0.0.0.0" => "127.0.0.1",
        x => x,
    };
    format!("http://{}:{}", address, config.server.port)
}

fn build_form(args: &PublishArgs) -> Result<PostForm> {
    let body = fs::read_to_string(&args.file)
        .with_context(|| format!("Error reading post body from {}", args.file))?;

    let slug = match args.slug {
        Some(ref slug) if !slug.trim().is_empty() => slug.clone(),
        _ => slug_from_title(&args.title),
    };

    let author = match args.author {
        Some(ref author) => author.clone(),
        None => get_name(),
    };

    let date_published = match args.date {
        Some(ref date) => Some(parse_date_time(date).map_err(|e| anyhow!(e))?),
        None => None,
    };

    Ok(PostForm {
        title: args.title.clone(),
        slug,
        author,
        tags: args.tags.clone(),
        body,
        date_published,
    })
}

pub async fn publish_cmd(args: PublishArgs) -> Result<()> {
    let config_path = PathBuf::from(args.config_path.as_deref().unwrap_or("postpress.toml"));
    let config = read_config(&config_path)?;

    let form = build_form(&args)?;
    let ctx = RequestContext::new(&base_address(&args, &config))?;
    let publisher = Publisher::from_config(&config)?;

    println!("Publishing {} using {}", form.slug, ctx.base_url());
    let paths = publisher.publish_post(&form, &ctx).await?;
    println!("Markdown: {}", paths.markdown.display());
    println!("Html: {}", paths.html.display());

    Ok(())
}
