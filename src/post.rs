use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PublishError, Result};
use crate::text_utils::parse_date_time;

/// What the author submits. The slug is used verbatim in file paths, callers are
/// responsible for keeping it url-safe.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub author: String,
    /// Comma separated
    #[serde(default)]
    pub tags: String,
    pub body: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_published: Option<NaiveDateTime>,
}

impl PostForm {
    pub fn validate(&self) -> Result<()> {
        if self.slug.trim().is_empty() {
            return Err(PublishError::invalid_argument("post slug is required"));
        }
        Ok(())
    }

    /// The publication date, falling back to `submitted_at` when the form left it unset.
    pub fn published_at(&self, submitted_at: NaiveDateTime) -> NaiveDateTime {
        self.date_published.unwrap_or(submitted_at)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMetadata {
    pub date_published: NaiveDateTime,
    pub slug: String,
    pub theme: String,
}

impl PublishedMetadata {
    pub fn validate(&self) -> Result<()> {
        if self.slug.trim().is_empty() {
            return Err(PublishError::invalid_argument("metadata slug is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedPostPath {
    pub markdown: PathBuf,
    pub html: PathBuf,
}

/// Content posted to the render endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub title: String,
    pub slug: String,
    pub author: String,
    #[serde(default)]
    pub tags: String,
    pub body: String,
    #[serde(default)]
    pub date_published: Option<String>,
}

impl From<&PostForm> for RenderPayload {
    fn from(form: &PostForm) -> Self {
        RenderPayload {
            title: form.title.clone(),
            slug: form.slug.clone(),
            author: form.author.clone(),
            tags: form.tags.clone(),
            body: form.body.clone(),
            date_published: form.date_published
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date_time(value).map(Some).map_err(Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_form_from_urlencoded() {
        let body = "title=Hello+World&slug=hello-world&author=Joe+Bloggs&tags=hello%2Cworld&body=**Hello+World**&date_published=2024-01-02T09%3A30";
        let form: PostForm = serde_urlencoded::from_str(body).unwrap();
        assert_eq!(form.title, "Hello World");
        assert_eq!(form.slug, "hello-world");
        assert_eq!(form.tags, "hello,world");
        assert_eq!(form.body, "**Hello World**");
        assert_eq!(form.date_published, Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_form_empty_date_is_unset() {
        let body = "title=t&slug=s&author=a&body=b&date_published=";
        let form: PostForm = serde_urlencoded::from_str(body).unwrap();
        assert_eq!(form.date_published, None);
        assert_eq!(form.tags, "");

        let submitted = date(2030, 5, 6);
        assert_eq!(form.published_at(submitted), submitted);
    }

    #[test]
    fn test_form_bad_date_is_rejected() {
        let body = "title=t&slug=s&author=a&body=b&date_published=tomorrow";
        assert!(serde_urlencoded::from_str::<PostForm>(body).is_err());
    }

    #[test]
    fn test_validate_slug() {
        let form = PostForm { slug: " ".to_string(), ..Default::default() };
        assert!(matches!(form.validate(), Err(PublishError::InvalidArgument(_))));

        let metadata = PublishedMetadata {
            date_published: date(2024, 1, 2),
            slug: "".to_string(),
            theme: "default".to_string(),
        };
        assert!(matches!(metadata.validate(), Err(PublishError::InvalidArgument(_))));
    }

    #[test]
    fn test_render_payload_from_form() {
        let form = PostForm {
            title: "Hello World".to_string(),
            slug: "hello-world".to_string(),
            author: "Joe Bloggs".to_string(),
            tags: "hello,world".to_string(),
            body: "**Hello World**".to_string(),
            date_published: Some(date(2024, 1, 2)),
        };
        let payload = RenderPayload::from(&form);
        assert_eq!(payload.date_published.as_deref(), Some("2024-01-02 09:30:00"));
        assert_eq!(payload.body, form.body);
    }
}
