use std::io::ErrorKind;
use std::path::Path;
use std::{fs, io};

use markdown::Options;
use ramhorns::Template;

use crate::post::RenderPayload;
use crate::text_utils::{format_date_time, parse_date_time, split_tags};

pub const THEME_EXTENSION: &str = "tpl";

#[derive(ramhorns::Content)]
struct ThemeTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct ThemeItem<'a> {
    slug: &'a str,
    author: &'a str,
    tags: &'a Vec<ThemeTag<'a>>,
    date: &'a str,
    time: &'a str,
    post_title: &'a str,
    post_content: &'a str,
}

pub struct ThemeRenderer<'a> {
    pub template: Template<'a>,
}

impl ThemeRenderer<'_> {
    pub fn new(theme_src: &str) -> io::Result<ThemeRenderer> {
        let template = match Template::new(theme_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing theme template: {}", e)));
            }
        };

        Ok(ThemeRenderer {
            template,
        })
    }

    pub fn render(&self, payload: &RenderPayload) -> io::Result<String> {
        let post_content = match markdown::to_html_with_options(&payload.body, &Options::gfm()) {
            Ok(x) => x,
            Err(e) => return Err(io::Error::new(ErrorKind::InvalidInput, e.reason)),
        };

        let (date, time) = match payload.date_published.as_deref() {
            Some(d) if !d.trim().is_empty() => {
                let date_time = parse_date_time(d)
                    .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))?;
                format_date_time(&date_time)
            }
            _ => (String::new(), String::new()),
        };

        let tag_list = split_tags(&payload.tags);
        let ref tags: Vec<ThemeTag> = tag_list.iter().map(|t| ThemeTag { tag: t.as_str() }).collect();

        Ok(self.template.render(&ThemeItem {
            slug: payload.slug.as_str(),
            author: payload.author.as_str(),
            tags,
            date: date.as_str(),
            time: time.as_str(),
            post_title: payload.title.as_str(),
            post_content: post_content.as_str(),
        }))
    }
}

/// Reads `theme_dir/<theme>.tpl`. Theme names are single path components.
pub fn load_theme(theme_dir: &Path, theme: &str) -> io::Result<String> {
    if theme.is_empty() || theme.contains('/') || theme.contains('\\') || theme.contains("..") {
        return Err(io::Error::new(ErrorKind::InvalidInput, format!("Invalid theme name {}", theme)));
    }

    let theme_path = theme_dir.join(format!("{}.{}", theme, THEME_EXTENSION));
    fs::read_to_string(&theme_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME_SRC: &str = r##"
TITLE=[{{post_title}}]
AUTHOR=[{{author}}]
DATE=[{{date}}]
TIME=[{{time}}]
TAGS=[{{#tags}}({{tag}}){{/tags}}]
POST_CONTENT=[{{{post_content}}}]
"##;

    fn payload() -> RenderPayload {
        RenderPayload {
            title: "<Hello World>".to_string(),
            slug: "hello-world".to_string(),
            author: "Joe Bloggs".to_string(),
            tags: "hello, world,".to_string(),
            body: "**Hello World**".to_string(),
            date_published: Some("2024-01-02 03:04:05".to_string()),
        }
    }

    #[test]
    fn test_render_theme() {
        let renderer = ThemeRenderer::new(THEME_SRC).unwrap();
        let res = renderer.render(&payload()).unwrap();

        assert!(res.contains("TITLE=[&lt;Hello World&gt;]"));
        assert!(res.contains("AUTHOR=[Joe Bloggs]"));
        assert!(res.contains("DATE=[2024-01-02]"));
        assert!(res.contains("TIME=[03:04:05]"));
        assert!(res.contains("TAGS=[(hello)(world)]"));
        assert!(res.contains("<strong>Hello World</strong>"));
    }

    #[test]
    fn test_render_without_date() {
        let renderer = ThemeRenderer::new(THEME_SRC).unwrap();
        let payload = RenderPayload { date_published: None, ..payload() };
        let res = renderer.render(&payload).unwrap();
        assert!(res.contains("DATE=[]"));
    }

    #[test]
    fn test_load_theme() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("default.tpl"), THEME_SRC).unwrap();

        assert_eq!(load_theme(tmp.path(), "default").unwrap(), THEME_SRC);
        assert_eq!(load_theme(tmp.path(), "missing").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(load_theme(tmp.path(), "../default").unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(load_theme(tmp.path(), "").unwrap_err().kind(), ErrorKind::InvalidInput);
    }
}
