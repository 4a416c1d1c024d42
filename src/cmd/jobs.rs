use clap::Subcommand;
use standard_error::StandardError;

use crate::{
    conf::settings,
    pkg::{
        client::{ClientSession, JobsClient},
        internal::{
            adaptors::jobs::spec::{JobEntry, NewJob},
            board::{FilterOptions, JobFilter, SortKey, arrange},
        },
    },
    prelude::Result,
};

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List jobs, filtered and sorted locally
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long = "type", default_value = "")]
        job_type: String,
        /// salary-high, salary-low, experience-high, experience-low or company
        #[arg(long, default_value = "")]
        sort: String,
    },
    /// Post a new job (requires login)
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        location: String,
        #[arg(long = "type")]
        job_type: String,
        #[arg(long)]
        salary: f64,
        #[arg(long)]
        experience: f64,
    },
    /// Delete a job by id (requires login)
    Delete { id: String },
    /// Apply for a job by title (requires login)
    Apply { title: String },
}

fn render_job(job: &JobEntry, session: Option<&ClientSession>) -> String {
    let mut block = format!(
        "{}\n  Company: {}\n  Location: {}\n  Job Type: {}\n  Salary: ${}\n  Experience: {} years\n",
        job.title,
        job.company,
        job.location,
        job.type_label(),
        job.salary_label(),
        job.experience
    );
    if session.is_some() {
        block.push_str(&format!("  Id: {}\n", job.id));
    }
    block
}

pub fn render_listing(jobs: &[JobEntry], session: Option<&ClientSession>) -> String {
    let mut out = String::new();
    if jobs.is_empty() {
        out.push_str("No jobs found.\n");
    }
    for job in jobs {
        out.push_str(&render_job(job, session));
    }
    let options = FilterOptions::from_jobs(jobs);
    out.push_str(&format!("Locations: {}\n", options.locations.join(", ")));
    out.push_str(&format!("Job types: {}\n", options.types.join(", ")));
    out
}

pub async fn run(command: JobsCommand, session: Option<&ClientSession>) -> Result<()> {
    let client = JobsClient::new(&settings.api_url);
    match command {
        JobsCommand::List {
            search,
            location,
            job_type,
            sort,
        } => {
            let filter = JobFilter {
                search,
                location,
                job_type,
            };
            let jobs = arrange(client.list().await, &filter, SortKey::parse(&sort));
            print!("{}", render_listing(&jobs, session));
        }
        JobsCommand::Post {
            title,
            company,
            location,
            job_type,
            salary,
            experience,
        } => {
            if session.is_none() {
                return Err(StandardError::new("ERR-CLI-002"));
            }
            let job = client
                .create(&NewJob {
                    title,
                    company,
                    location,
                    job_type,
                    salary,
                    experience,
                })
                .await?;
            println!("Job posted: {} ({})", job.title, job.id);
        }
        JobsCommand::Delete { id } => {
            if session.is_none() {
                return Err(StandardError::new("ERR-CLI-002"));
            }
            println!("{}", client.delete(&id).await?);
        }
        JobsCommand::Apply { title } => {
            if session.is_none() {
                return Err(StandardError::new("ERR-CLI-004"));
            }
            println!("Application submitted for {}. Best of luck!", title);
        }
    }
    Ok(())
}
