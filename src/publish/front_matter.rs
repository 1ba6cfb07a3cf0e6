use std::fmt::Write;

use crate::error::Result;
use crate::post::{PostForm, PublishedMetadata};
use crate::text_utils::split_tags;

pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Example of a composed post
/// ---
/// * Title: Hello World
/// * Slug: hello-world
/// * Author: Joe Bloggs
/// * Tags: hello, world
/// ---
/// **Hello World**
pub fn apply_metadata(form: &PostForm, metadata: &PublishedMetadata) -> Result<String> {
    form.validate()?;
    metadata.validate()?;

    let tags = split_tags(&form.tags).join(", ");
    let body = form.body.trim_end_matches(&['\r', '\n'][..]);

    let mut buf = String::new();
    let _ = writeln!(&mut buf, "{}", FRONT_MATTER_DELIMITER);
    let _ = writeln!(&mut buf, "* Title: {}", form.title);
    let _ = writeln!(&mut buf, "* Slug: {}", metadata.slug);
    let _ = writeln!(&mut buf, "* Author: {}", form.author);
    let _ = writeln!(&mut buf, "* Tags: {}", tags);
    let _ = writeln!(&mut buf, "{}", FRONT_MATTER_DELIMITER);
    let _ = writeln!(&mut buf, "{}", body);

    Ok(buf)
}
