mod cli;

use chrono::Datelike;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use jobtrack_client::config::{init_config, Config};
use jobtrack_client::dto::ai_dto::{
    AboutMeAnswer, CompanyResearch, CoverLetter, CraftInterviewQuestions, EstimateChance,
    InterviewQa, SkillExtractor, TuneCv,
};
use jobtrack_client::dto::application_dto::ApplicationForm;
use jobtrack_client::dto::interview_dto::InterviewForm;
use jobtrack_client::dto::profile_dto::SkillForm;
use jobtrack_client::dto::upload_dto::FileUpload;
use jobtrack_client::error::{Error, Result};
use jobtrack_client::models::ai::ChatMessage;
use jobtrack_client::render;
use jobtrack_client::services::dashboard_service::DashboardScope;
use jobtrack_client::services::listing_service::SortDirection;
use jobtrack_client::utils::time::{Clock, SystemClock};
use jobtrack_client::AppState;

use crate::cli::{
    AiAuth, AiCommands, ApplicationCommands, Cli, Commands, InterviewCommands, JobDescriptionArgs,
    ProfileCommands,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = init_config()?;
    init_tracing(config);

    let mut state = AppState::new(config)?;
    info!(api_url = %config.api_url, "jobtrack starting");

    if let Err(err) = run(cli.command, &mut state).await {
        error!(error = %err, "command failed");
        eprintln!("Error: {}", err.user_message());
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jobtrack_client={0},jobtrack={0}", config.log_level)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(command: Commands, state: &mut AppState) -> Result<()> {
    let today = SystemClock.now().date();
    let this_month = (today.year(), today.month());

    match command {
        Commands::Applications { command } => applications(command, state).await,
        Commands::Interviews { command } => interviews(command, state).await,
        Commands::Calendar { year, month, mini } => {
            let (year, month) = (year.unwrap_or(this_month.0), month.unwrap_or(this_month.1));
            let controller = &mut state.controller;
            controller.refresh_all_interviews().await?;
            let view = controller.calendar(year, month, mini.unwrap_or(state.config.mini_months))?;
            print!("{}", render::calendar(&view));
            Ok(())
        }
        Commands::Dashboard { all, year, month } => {
            let scope = if all {
                DashboardScope::AllTime
            } else {
                DashboardScope::Monthly {
                    year: year.unwrap_or(this_month.0),
                    month: month.unwrap_or(this_month.1),
                }
            };
            let controller = &mut state.controller;
            controller.refresh_applications().await?;
            controller.refresh_all_interviews().await?;
            if let Err(err) = controller.refresh_profile().await {
                // Skill chart stays empty without a profile.
                info!(error = %err, "profile unavailable for dashboard");
            }
            print!("{}", render::dashboard(&controller.dashboard(scope)?));
            Ok(())
        }
        Commands::Profile { command } => profile(command, state).await,
        Commands::Ai { auth, tool } => ai(tool, auth, state).await,
        Commands::Health => {
            let health = state.controller.health().await?;
            println!(
                "{} {}",
                health.status,
                health.message.as_deref().unwrap_or_default()
            );
            if health.is_ok() {
                Ok(())
            } else {
                Err(Error::Validation(format!("backend reports status '{}'", health.status)))
            }
        }
    }
}

async fn applications(command: ApplicationCommands, state: &mut AppState) -> Result<()> {
    let controller = &mut state.controller;
    match command {
        ApplicationCommands::List { list, sort } => {
            controller.refresh_applications().await?;
            if list.desc {
                // First request sorts ascending, the repeat flips it.
                controller.application_view(&list.search, sort);
            }
            let rows = controller.application_view(&list.search, sort);
            let text = render::applications(&rows, sort.map(|c| (c, direction(list.desc))));
            print!("{}", text);
        }
        ApplicationCommands::Add {
            title,
            company,
            date,
            status,
            link,
            description,
            notes,
            cv,
        } => {
            let cv_file = match cv {
                Some(path) => Some(FileUpload::from_path(&path).await?),
                None => None,
            };
            let created = controller
                .create_application(ApplicationForm {
                    job_title: title,
                    company,
                    application_date: date,
                    status,
                    link,
                    description,
                    cover_letter_notes: notes,
                    cv_file,
                })
                .await?;
            println!("Created application {}", created.id);
        }
        ApplicationCommands::Status { id, status } => {
            controller.refresh_applications().await?;
            let updated = controller.update_application_status(&id, status).await?;
            println!("Application {} is now {}", updated.id, updated.status);
        }
        ApplicationCommands::Delete { id } => {
            controller.refresh_applications().await?;
            controller.delete_application(&id).await?;
            println!("Deleted application {}", id);
        }
        ApplicationCommands::Cv { id, output } => {
            controller.refresh_applications().await?;
            let bytes = controller.download_cv(&id).await?;
            tokio::fs::write(&output, &bytes).await?;
            println!("Saved {} bytes to {}", bytes.len(), output.display());
        }
    }
    Ok(())
}

async fn interviews(command: InterviewCommands, state: &mut AppState) -> Result<()> {
    let controller = &mut state.controller;
    match command {
        InterviewCommands::List {
            list,
            sort,
            year,
            month,
        } => {
            match (year, month) {
                (Some(year), Some(month)) => controller.refresh_interviews(year, month).await?,
                _ => controller.refresh_all_interviews().await?,
            };
            if list.desc {
                controller.interview_view(&list.search, sort);
            }
            let rows = controller.interview_view(&list.search, sort);
            print!("{}", render::interviews(&rows, sort.map(|c| (c, direction(list.desc)))));
        }
        InterviewCommands::Add {
            title,
            start,
            end,
            location,
            interview_type,
            notes,
        } => {
            // Overlap checks need every booked slot, not just one month.
            controller.refresh_all_interviews().await?;
            let created = controller
                .schedule_interview(InterviewForm {
                    interview_title: title,
                    start_datetime: start,
                    end_datetime: end,
                    location,
                    interview_type,
                    notes,
                })
                .await?;
            println!("Scheduled interview {}", created.id);
        }
        InterviewCommands::Edit {
            id,
            title,
            start,
            end,
            location,
            interview_type,
            notes,
        } => {
            controller.refresh_all_interviews().await?;
            let current = controller
                .store()
                .find_interview(&id)
                .ok_or_else(|| Error::NotFound(format!("Interview {} not found", id)))?;
            let mut form = InterviewForm::from_interview(current);
            if let Some(title) = title {
                form.interview_title = title;
            }
            if let Some(start) = start {
                form.start_datetime = start;
            }
            if let Some(end) = end {
                form.end_datetime = end;
            }
            form.location = location.or(form.location);
            form.interview_type = interview_type.or(form.interview_type);
            form.notes = notes.or(form.notes);

            let updated = controller.reschedule_interview(&id, form).await?;
            println!("Updated interview {}", updated.id);
        }
        InterviewCommands::Delete { id } => {
            controller.refresh_all_interviews().await?;
            controller.delete_interview(&id).await?;
            println!("Deleted interview {}", id);
        }
    }
    Ok(())
}

async fn profile(command: ProfileCommands, state: &mut AppState) -> Result<()> {
    let updated = match command {
        ProfileCommands::Show => state.controller.refresh_profile().await?,
        ProfileCommands::UploadCv { file } => {
            let upload = FileUpload::from_path(&file).await?;
            state.controller.upload_profile_cv(upload).await?
        }
        ProfileCommands::FillFromResume { file, auth } => {
            let credentials = state.ai_credentials(auth.provider, auth.api_key)?;
            let resume = FileUpload::from_path(&file).await?;
            state
                .controller
                .fill_profile_from_resume(&credentials, resume)
                .await?
        }
        ProfileCommands::AddSkill { name, level } => {
            state.controller.refresh_profile().await?;
            state.controller.add_skill(SkillForm { name, level }).await?
        }
        ProfileCommands::RemoveSkill { index } => {
            state.controller.refresh_profile().await?;
            state.controller.remove_skill(index).await?
        }
        ProfileCommands::AddLanguage { language } => {
            state.controller.refresh_profile().await?;
            state.controller.add_language(&language).await?
        }
        ProfileCommands::RemoveLanguage { index } => {
            state.controller.refresh_profile().await?;
            state.controller.remove_language(index).await?
        }
        ProfileCommands::RemoveEducation { index } => {
            state.controller.refresh_profile().await?;
            state.controller.remove_education(index).await?
        }
        ProfileCommands::RemoveExperience { index } => {
            state.controller.refresh_profile().await?;
            state.controller.remove_experience(index).await?
        }
    };
    print!("{}", render::profile(updated));
    Ok(())
}

async fn ai(tool: AiCommands, auth: AiAuth, state: &mut AppState) -> Result<()> {
    let credentials = state.ai_credentials(auth.provider, auth.api_key)?;
    let controller = &mut state.controller;

    // Job-fit helpers weigh the saved profile against the ad.
    if let AiCommands::EstimateChance(_)
    | AiCommands::TuneCv(_)
    | AiCommands::CoverLetter(_)
    | AiCommands::SkillExtractor(_)
    | AiCommands::AboutMe(_) = &tool
    {
        controller.refresh_profile().await?;
    }

    let result = match tool {
        AiCommands::EstimateChance(args) => {
            let payload = EstimateChance(controller.job_fit(job_description(args).await?));
            controller.run_ai(&credentials, &payload).await?
        }
        AiCommands::TuneCv(args) => {
            let payload = TuneCv(controller.job_fit(job_description(args).await?));
            controller.run_ai(&credentials, &payload).await?
        }
        AiCommands::CoverLetter(args) => {
            let payload = CoverLetter(controller.job_fit(job_description(args).await?));
            controller.run_ai(&credentials, &payload).await?
        }
        AiCommands::SkillExtractor(args) => {
            let payload = SkillExtractor(controller.job_fit(job_description(args).await?));
            controller.run_ai(&credentials, &payload).await?
        }
        AiCommands::AboutMe(args) => {
            let payload = AboutMeAnswer(controller.job_fit(job_description(args).await?));
            controller.run_ai(&credentials, &payload).await?
        }
        AiCommands::InterviewQa { job_title, message } => {
            let payload = InterviewQa {
                job_title,
                chat_history: vec![ChatMessage::user(message)],
            };
            controller.run_ai(&credentials, &payload).await?
        }
        AiCommands::CraftQuestions { candidate_info } => {
            controller
                .run_ai(&credentials, &CraftInterviewQuestions { candidate_info })
                .await?
        }
        AiCommands::CompanyResearch { url } => {
            controller
                .run_ai(&credentials, &CompanyResearch { company_url: url })
                .await?
        }
    };
    println!("{}", result.text());
    Ok(())
}

async fn job_description(args: JobDescriptionArgs) -> Result<String> {
    match (args.job, args.job_file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => Ok(tokio::fs::read_to_string(&path).await?),
        (None, None) => Err(Error::Validation(
            "a job description is required (--job or --job-file)".to_string(),
        )),
    }
}

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}
