use std::env;

/// Grades offered in the operator UI when none is preselected.
const DEFAULT_GRADE_OPTIONS: &[&str] = &["A", "B", "C", "D", "E", "F", "G", "U"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the integration gateway that fronts Canvas, StudentITS,
    /// Ladok and Epok. Trailing slash is trimmed.
    pub api_base: String,
    pub bind_addr: String,
    pub grade_options: Vec<String>,
}

impl AppConfig {
    pub fn new_from_env() -> Self {
        let api_base = env::var("API_BASE")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

        let grade_options = env::var("GRADE_OPTIONS")
            .map(|raw| {
                raw.split(',')
                    .map(|g| g.trim().to_string())
                    .filter(|g| !g.is_empty())
                    .collect::<Vec<_>>()
            })
            .ok()
            .filter(|opts| !opts.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_GRADE_OPTIONS.iter().map(|g| g.to_string()).collect()
            });

        Self {
            api_base,
            bind_addr,
            grade_options,
        }
    }
}
