pub mod ai_dto;
pub mod application_dto;
pub mod interview_dto;
pub mod profile_dto;
pub mod upload_dto;
