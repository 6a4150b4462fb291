pub mod delivery;
pub mod job;
pub mod platform_config;
