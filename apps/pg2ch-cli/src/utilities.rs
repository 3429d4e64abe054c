pub mod constants;
pub mod display_config;
