pub mod email_filter;
pub mod profile_cache;
