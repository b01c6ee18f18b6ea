pub mod ops_check_config;
pub mod ops_filter;
