use askama::Template;

use crate::pkg::internal::{
    adaptors::jobs::spec::JobEntry,
    board::{FilterOptions, SortKey},
};

#[derive(Template)]
#[template(path = "board.html")]
pub struct Board<'a> {
    pub username: Option<&'a str>,
    pub jobs: Vec<JobEntry>,
    pub options: FilterOptions,
    pub search: &'a str,
    pub location: &'a str,
    pub job_type: &'a str,
    pub sort: SortKey,
    pub sort_options: [SortKey; 6],
}

impl Board<'_> {
    pub fn is_location(&self, value: &str) -> bool {
        self.location == value
    }

    pub fn is_type(&self, value: &str) -> bool {
        self.job_type == value
    }

    pub fn is_sort(&self, key: &SortKey) -> bool {
        self.sort == *key
    }
}

#[derive(Template)]
#[template(
    source = r#"<div class="notice notice-{{ kind }}">{{ message }}</div>"#,
    ext = "html"
)]
pub struct Notice<'a> {
    pub kind: &'a str,
    pub message: &'a str,
}
