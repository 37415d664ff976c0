//! Helpers shared by the HTTP tests

use axum_test::TestServer;
use std::collections::HashMap;
use std::path::Path;

use crate::config::Config;
use crate::models::AppState;
use crate::routes::create_router;

/// Config built from `vars`, storing files under `files_dir`
pub fn create_test_config(files_dir: &Path, vars: &[(&str, &str)]) -> Config {
    let mut env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    env.insert(
        "FILE_MANAGER_FILES_DIR".to_string(),
        files_dir.to_string_lossy().into_owned(),
    );

    Config::from_lookup(|key| env.get(key).cloned()).expect("test config should parse")
}

pub fn create_test_server(files_dir: &Path, vars: &[(&str, &str)]) -> TestServer {
    let state = AppState::new(create_test_config(files_dir, vars));
    let app = create_router(state).expect("router should build");
    TestServer::new(app).unwrap()
}
