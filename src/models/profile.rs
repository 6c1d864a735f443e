use serde::{Deserialize, Serialize};

/// Canonical skill levels, in the order charts present them.
pub const SKILL_LEVELS: [&str; 4] = ["Beginner", "Intermediate", "Advanced", "Expert"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub graduation_year: i32,
    #[serde(default)]
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub position: String,
    pub company: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::deserialize_optional_id"
    )]
    pub id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<Skill>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub cv_profile_file: Option<String>,
}
