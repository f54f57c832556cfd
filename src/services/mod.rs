pub mod activity_log;
pub mod auth_service;
pub mod log_query;
pub mod message_service;
pub mod session_service;
pub mod stats_pipeline;
