pub mod ai_service;
pub mod api_client;
pub mod application_service;
pub mod calendar_service;
pub mod dashboard_service;
pub mod health_service;
pub mod interview_service;
pub mod listing_service;
pub mod profile_service;
pub mod schedule_service;
