use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};

use jobtrack_client::models::ai::AiProvider;
use jobtrack_client::models::application::ApplicationStatus;
use jobtrack_client::services::calendar_service::MAX_MINI_MONTHS;
use jobtrack_client::services::listing_service::{ApplicationColumn, InterviewColumn};

#[derive(Parser, Debug)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications, interviews and your profile from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage job applications
    Applications {
        #[command(subcommand)]
        command: ApplicationCommands,
    },

    /// Manage interviews
    Interviews {
        #[command(subcommand)]
        command: InterviewCommands,
    },

    /// Show a month of interviews plus previews of the following months
    Calendar {
        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        month: Option<u32>,

        /// Number of month previews (0-24); defaults to JOBTRACK_MINI_MONTHS
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_MINI_MONTHS as u64))]
        mini: Option<usize>,
    },

    /// Show statistics for one month or for all time
    Dashboard {
        /// Aggregate over everything instead of a single month
        #[arg(long, conflicts_with_all = ["year", "month"])]
        all: bool,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        month: Option<u32>,
    },

    /// Manage the candidate profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Run one of the AI helpers
    Ai {
        #[command(flatten)]
        auth: AiAuth,

        #[command(subcommand)]
        tool: AiCommands,
    },

    /// Check that the backend is reachable
    Health,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive text filter
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Subcommand, Debug)]
pub enum ApplicationCommands {
    /// List applications
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Column to sort by (title, company, date, status)
        #[arg(long)]
        sort: Option<ApplicationColumn>,
    },

    /// Add an application
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        company: String,

        /// Application date, YYYY-MM-DD
        #[arg(long)]
        date: String,

        #[arg(long, default_value = "Applied")]
        status: ApplicationStatus,

        #[arg(long)]
        link: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// CV file to attach
        #[arg(long, value_name = "FILE")]
        cv: Option<PathBuf>,
    },

    /// Change the status of an application
    Status {
        id: String,
        status: ApplicationStatus,
    },

    /// Delete an application
    Delete { id: String },

    /// Download the CV attached to an application
    Cv {
        id: String,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum InterviewCommands {
    /// List interviews, optionally for a single month
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Column to sort by (title, start, end, location, type)
        #[arg(long)]
        sort: Option<InterviewColumn>,

        #[arg(long, requires = "month")]
        year: Option<i32>,

        #[arg(long, requires = "year")]
        month: Option<u32>,
    },

    /// Schedule an interview
    Add {
        #[arg(long)]
        title: String,

        /// Start, e.g. 2024-05-01T09:00
        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        #[arg(long)]
        location: Option<String>,

        #[arg(long = "type")]
        interview_type: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Change an interview; omitted fields keep their current value
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long = "type")]
        interview_type: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an interview
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Print the profile
    Show,

    /// Attach a CV to the profile
    UploadCv { file: PathBuf },

    /// Fill the profile from a resume with the AI helper
    FillFromResume {
        file: PathBuf,

        #[command(flatten)]
        auth: AiAuth,
    },

    /// Add a skill
    AddSkill {
        name: String,

        /// Beginner, Intermediate, Advanced or Expert
        #[arg(long, default_value = "")]
        level: String,
    },

    /// Remove a skill by its index in `profile show`
    RemoveSkill { index: usize },

    /// Add a spoken language
    AddLanguage { language: String },

    /// Remove a language by index
    RemoveLanguage { index: usize },

    /// Remove an education entry by index
    RemoveEducation { index: usize },

    /// Remove an experience entry by index
    RemoveExperience { index: usize },
}

#[derive(Args, Debug)]
pub struct AiAuth {
    /// openai, gemini or claude; defaults to JOBTRACK_AI_PROVIDER
    #[arg(long, global = true)]
    pub provider: Option<AiProvider>,

    /// Provider API key; defaults to JOBTRACK_AI_API_KEY
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

#[derive(Args, Debug)]
pub struct JobDescriptionArgs {
    /// Job description text
    #[arg(long, conflicts_with = "job_file")]
    pub job: Option<String>,

    /// File containing the job description
    #[arg(long, value_name = "FILE")]
    pub job_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum AiCommands {
    /// Estimate the chance of getting the job
    EstimateChance(JobDescriptionArgs),

    /// Suggest CV changes for a job
    TuneCv(JobDescriptionArgs),

    /// Write a cover letter
    CoverLetter(JobDescriptionArgs),

    /// Extract the skills a job asks for
    SkillExtractor(JobDescriptionArgs),

    /// Draft an "about me" answer
    AboutMe(JobDescriptionArgs),

    /// Practice interview questions for a role
    InterviewQa {
        #[arg(long)]
        job_title: String,

        /// Your message; earlier turns are not kept between runs
        #[arg(long, default_value = "Let's start the interview.")]
        message: String,
    },

    /// Craft questions to ask the interviewer
    CraftQuestions {
        #[arg(long)]
        candidate_info: String,
    },

    /// Summarise a company from its website
    CompanyResearch {
        #[arg(long)]
        url: String,
    },
}
