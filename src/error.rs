pub mod app_error;
pub mod json;
pub mod repository_error;
pub mod service_error;
