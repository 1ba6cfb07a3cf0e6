use std::ops::Index;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Accepts `2024-01-02 10:42:32.123`, `2024-01-02T10:42:32` and `2024-01-02T10:42`,
/// the last one being what a `datetime-local` form input sends.
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_TIME_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{1,2})-(\d{1,2})[ T](\d{1,2}):(\d{1,2})(?::(\d{1,2})(\.\d{0,3})?)?$"
        ).unwrap();
    }

    let Some(caps) = DATE_TIME_REGEX.captures(buf.trim()) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = to_u32(caps.index(4))?;
    let mn: u32 = to_u32(caps.index(5))?;
    let s: u32 = match caps.get(6) {
        Some(sec) => to_u32(sec.as_str())?,
        None => 0,
    };

    let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
        return Err(format!("Invalid date in {}", buf));
    };
    let Some(time) = NaiveTime::from_hms_opt(h, mn, s) else {
        return Err(format!("Invalid time in {}", buf));
    };

    Ok(NaiveDateTime::new(date, time))
}

pub fn format_date_time(date_time: &NaiveDateTime) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

/// Splits a comma separated tag list, trimming entries and dropping empty ones.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Builds a slug from a title: lowercase ascii words joined by dashes.
pub fn slug_from_title(title: &str) -> String {
    let ascii = unidecode::unidecode(title);
    let alpha_chars: String = ascii.chars()
        .filter(|&c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-' || c == '_')
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();

    let mut slug = String::new();
    let mut prev_char = None;

    for c in alpha_chars.chars() {
        if c != '-' || (prev_char != Some('-') && prev_char.is_some()) {
            slug.push(c);
        }
        prev_char = Some(c);
    }

    slug.trim_end_matches('-').to_string()
}

/// Slugs land verbatim in file paths: only ascii letters, digits, `-` and `_`.
pub fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
