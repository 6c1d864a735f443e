use validator::Validate;

use crate::dto::application_dto::non_empty;
use crate::error::Result;
use crate::models::profile::{Education, Experience, Profile, Skill};
use crate::utils::validation;

/// Shape checks run before a profile is saved. Every field may be blank,
/// but filled-in contact fields must look right. List entries are checked
/// when they are added or replaced, not again on every save.
#[derive(Debug, Clone, Validate)]
pub struct ProfileForm {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(url)]
    pub portfolio_url: Option<String>,
}

impl ProfileForm {
    pub fn check(profile: &Profile) -> Result<()> {
        let form = Self {
            email: non_empty(Some(profile.email.clone())),
            linkedin_url: non_empty(profile.linkedin_url.clone()),
            github_url: non_empty(profile.github_url.clone()),
            portfolio_url: non_empty(profile.portfolio_url.clone()),
        };
        validation::validate(&form)
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct EducationForm {
    #[validate(length(min = 1))]
    pub degree: String,
    #[validate(length(min = 1))]
    pub institution: String,
    #[validate(range(min = 1900, max = 2100))]
    pub graduation_year: i32,
    #[validate(range(min = 0.0))]
    pub gpa: Option<f64>,
}

impl EducationForm {
    pub fn check(&self) -> Result<()> {
        validation::validate(self)?;
        validation::require_text("degree", &self.degree)?;
        validation::require_text("institution", &self.institution)
    }

    pub fn into_entry(self) -> Result<Education> {
        self.check()?;
        Ok(Education {
            degree: self.degree.trim().to_string(),
            institution: self.institution.trim().to_string(),
            graduation_year: self.graduation_year,
            gpa: self.gpa,
        })
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ExperienceForm {
    #[validate(length(min = 1))]
    pub position: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: String,
}

impl ExperienceForm {
    pub fn check(&self) -> Result<()> {
        validation::validate(self)?;
        validation::require_text("position", &self.position)?;
        validation::require_text("company", &self.company)?;
        validation::require_text("start_date", &self.start_date)
    }

    /// A blank end date means the position is current.
    pub fn into_entry(self) -> Result<Experience> {
        self.check()?;
        Ok(Experience {
            position: self.position.trim().to_string(),
            company: self.company.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: non_empty(self.end_date),
            description: self.description.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct SkillForm {
    #[validate(length(min = 1))]
    pub name: String,
    pub level: String,
}

impl SkillForm {
    pub fn check(&self) -> Result<()> {
        validation::validate(self)?;
        validation::require_text("name", &self.name)
    }

    pub fn into_entry(self) -> Result<Skill> {
        self.check()?;
        Ok(Skill {
            name: self.name.trim().to_string(),
            level: self.level.trim().to_string(),
        })
    }
}
