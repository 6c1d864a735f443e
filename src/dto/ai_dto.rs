use validator::Validate;

use crate::error::Result;
use crate::models::ai::{AiProvider, AiTool, ChatMessage};
use crate::models::profile::Profile;
use crate::utils::validation;

#[derive(Debug, Clone, Validate)]
pub struct AiCredentials {
    pub provider: AiProvider,
    #[validate(length(min = 1))]
    pub api_key: String,
}

/// Form fields for one text-generation endpoint.
pub trait AiPayload {
    const TOOL: AiTool;

    fn fields(&self) -> Result<Vec<(&'static str, String)>>;
}

/// Payload shared by every endpoint that weighs a profile against a job ad.
#[derive(Debug, Clone, Validate)]
pub struct JobFitRequest {
    #[validate(length(min = 1))]
    pub job_description: String,
    pub profile: Profile,
}

fn job_fit_fields(req: &JobFitRequest) -> Result<Vec<(&'static str, String)>> {
    validation::validate(req)?;
    validation::require_text("job_description", &req.job_description)?;
    Ok(vec![
        ("job_description", req.job_description.clone()),
        ("profile", serde_json::to_string(&req.profile)?),
    ])
}

macro_rules! job_fit_payload {
    ($name:ident, $tool:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub JobFitRequest);

        impl AiPayload for $name {
            const TOOL: AiTool = $tool;

            fn fields(&self) -> Result<Vec<(&'static str, String)>> {
                job_fit_fields(&self.0)
            }
        }
    };
}

job_fit_payload!(EstimateChance, AiTool::EstimateChance);
job_fit_payload!(TuneCv, AiTool::TuneCv);
job_fit_payload!(CoverLetter, AiTool::CoverLetter);
job_fit_payload!(SkillExtractor, AiTool::SkillExtractor);
job_fit_payload!(AboutMeAnswer, AiTool::AboutMeAnswer);

#[derive(Debug, Clone, Validate)]
pub struct InterviewQa {
    #[validate(length(min = 1))]
    pub job_title: String,
    pub chat_history: Vec<ChatMessage>,
}

impl AiPayload for InterviewQa {
    const TOOL: AiTool = AiTool::InterviewQa;

    fn fields(&self) -> Result<Vec<(&'static str, String)>> {
        validation::validate(self)?;
        Ok(vec![
            ("job_title", self.job_title.clone()),
            ("chat_history", serde_json::to_string(&self.chat_history)?),
        ])
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CraftInterviewQuestions {
    #[validate(length(min = 1))]
    pub candidate_info: String,
}

impl AiPayload for CraftInterviewQuestions {
    const TOOL: AiTool = AiTool::CraftInterviewQuestions;

    fn fields(&self) -> Result<Vec<(&'static str, String)>> {
        validation::validate(self)?;
        Ok(vec![("candidate_info", self.candidate_info.clone())])
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CompanyResearch {
    #[validate(url)]
    pub company_url: String,
}

impl AiPayload for CompanyResearch {
    const TOOL: AiTool = AiTool::CompanyResearch;

    fn fields(&self) -> Result<Vec<(&'static str, String)>> {
        validation::validate(self)?;
        Ok(vec![("company_url", self.company_url.trim().to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_fit_serializes_profile_as_json_string() {
        let mut profile = Profile::default();
        profile.full_name = "Ada".into();
        let payload = TuneCv(JobFitRequest {
            job_description: "Rust developer".into(),
            profile,
        });
        let fields = payload.fields().expect("fields");
        assert_eq!(fields[0], ("job_description", "Rust developer".to_string()));
        let profile_json: serde_json::Value = serde_json::from_str(&fields[1].1).unwrap();
        assert_eq!(profile_json["full_name"], "Ada");
        assert_eq!(TuneCv::TOOL.path(), "/api/ai/tune-cv");
    }

    #[test]
    fn empty_description_is_rejected_locally() {
        let payload = CoverLetter(JobFitRequest {
            job_description: "  ".into(),
            profile: Profile::default(),
        });
        assert!(payload.fields().unwrap_err().is_validation());
    }

    #[test]
    fn company_url_must_be_a_url() {
        let bad = CompanyResearch {
            company_url: "acme".into(),
        };
        assert!(bad.fields().unwrap_err().is_validation());
        let good = CompanyResearch {
            company_url: "https://acme.example".into(),
        };
        assert_eq!(good.fields().unwrap().len(), 1);
    }
}
