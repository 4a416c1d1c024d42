//! Listing logic shared by the board page and the CLI.
//!
//! Both callers fetch the complete job list and narrow it here; nothing in
//! this module touches the store.

use serde::Deserialize;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    SalaryHigh,
    SalaryLow,
    ExperienceHigh,
    ExperienceLow,
    Company,
    #[default]
    Unsorted,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Unsorted,
        SortKey::SalaryHigh,
        SortKey::SalaryLow,
        SortKey::ExperienceHigh,
        SortKey::ExperienceLow,
        SortKey::Company,
    ];

    /// Unrecognized values leave the list in the order it came in.
    pub fn parse(value: &str) -> Self {
        match value {
            "salary-high" => SortKey::SalaryHigh,
            "salary-low" => SortKey::SalaryLow,
            "experience-high" => SortKey::ExperienceHigh,
            "experience-low" => SortKey::ExperienceLow,
            "company" => SortKey::Company,
            _ => SortKey::Unsorted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::SalaryHigh => "salary-high",
            SortKey::SalaryLow => "salary-low",
            SortKey::ExperienceHigh => "experience-high",
            SortKey::ExperienceLow => "experience-low",
            SortKey::Company => "company",
            SortKey::Unsorted => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::SalaryHigh => "Salary (High to Low)",
            SortKey::SalaryLow => "Salary (Low to High)",
            SortKey::ExperienceHigh => "Experience (High to Low)",
            SortKey::ExperienceLow => "Experience (Low to High)",
            SortKey::Company => "Company Name",
            SortKey::Unsorted => "Sort By",
        }
    }
}

/// Stable sort in place.
pub fn sort_jobs(jobs: &mut [JobEntry], key: SortKey) {
    match key {
        SortKey::SalaryHigh => jobs.sort_by(|a, b| b.salary.total_cmp(&a.salary)),
        SortKey::SalaryLow => jobs.sort_by(|a, b| a.salary.total_cmp(&b.salary)),
        SortKey::ExperienceHigh => jobs.sort_by(|a, b| b.experience.total_cmp(&a.experience)),
        SortKey::ExperienceLow => jobs.sort_by(|a, b| a.experience.total_cmp(&b.experience)),
        SortKey::Company => jobs.sort_by(|a, b| a.company.cmp(&b.company)),
        SortKey::Unsorted => {}
    }
}

/// Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, rename = "type")]
    pub job_type: String,
}

impl JobFilter {
    pub fn matches(&self, job: &JobEntry) -> bool {
        let term = self.search.to_lowercase();
        (term.is_empty()
            || job.title.to_lowercase().contains(&term)
            || job.company.to_lowercase().contains(&term))
            && (self.location.is_empty() || job.location == self.location)
            && (self.job_type.is_empty() || job.job_type == self.job_type)
    }

    pub fn apply(&self, jobs: Vec<JobEntry>) -> Vec<JobEntry> {
        jobs.into_iter().filter(|j| self.matches(j)).collect()
    }
}

/// Dropdown vocabulary. Built from whatever is currently displayed, so a
/// filtered view only offers values present in that view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub types: Vec<String>,
}

impl FilterOptions {
    pub fn from_jobs(jobs: &[JobEntry]) -> Self {
        let mut options = FilterOptions::default();
        for job in jobs {
            if !options.locations.contains(&job.location) {
                options.locations.push(job.location.clone());
            }
            if !options.types.contains(&job.job_type) {
                options.types.push(job.job_type.clone());
            }
        }
        options
    }
}

/// Filter then sort a freshly fetched list.
pub fn arrange(jobs: Vec<JobEntry>, filter: &JobFilter, sort: SortKey) -> Vec<JobEntry> {
    let mut jobs = filter.apply(jobs);
    sort_jobs(&mut jobs, sort);
    jobs
}

/// `90000.0` renders as `90,000`; fractions keep up to two digits.
pub fn format_salary(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let nonzero = fixed.bytes().any(|b| (b'1'..=b'9').contains(&b));
    let sign = if value < 0.0 && nonzero { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

impl JobEntry {
    pub fn salary_label(&self) -> String {
        format_salary(self.salary)
    }

    pub fn type_label(&self) -> &str {
        if self.job_type.is_empty() {
            "Not specified"
        } else {
            &self.job_type
        }
    }
}
