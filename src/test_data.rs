#[cfg(test)]
pub const FRONT_MATTER_DATA: &str = "---
* Title: Hello World
* Slug: hello-world
* Author: Joe Bloggs
* Tags: hello, world
---
**Hello World**
";

#[cfg(test)]
pub const RENDERED_DATA: &str = "<strong>Hello World</strong>";

#[cfg(test)]
pub fn hello_world_form() -> crate::post::PostForm {
    crate::post::PostForm {
        title: "Hello World".to_string(),
        slug: "hello-world".to_string(),
        author: "Joe Bloggs".to_string(),
        tags: "hello,world".to_string(),
        body: "**Hello World**".to_string(),
        date_published: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(10, 0, 0)),
    }
}
