use std::env;
use std::path::PathBuf;

pub struct AppConfig {
    pub http_bind: String,
    pub classifier_url: String,
    pub camera_index: u32,
    pub prefs_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            http_bind: env_var("HTTP_BIND", "0.0.0.0:8080"),
            classifier_url: env_var("CLASSIFIER_URL", "http://127.0.0.1:9000"),
            camera_index: env_var("CAMERA_INDEX", "0").parse().unwrap_or(0),
            prefs_path: PathBuf::from(env_var("PREFS_PATH", "faunascope-prefs.json")),
        }
    }
}

fn env_var(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
