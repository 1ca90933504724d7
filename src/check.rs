use std::fs;
use std::path::Path;

const REQUIRED_TEMPLATES: &[&str] = &[
    "assets/html/frontend/index.html",
    "assets/html/frontend/video.html",
    "assets/html/frontend/not_found.html",
    "assets/html/frontend/partials/navbar.html",
];

pub fn perform_startup_checks() {
    log::info!("Performing startup checks...");
    check_and_generate_config();
    check_templates();
    log::info!("Startup checks completed.");
}

fn check_and_generate_config() {
    if !Path::new("config.yml").exists() {
        log::warn!("config.yml not found. Generating default config...");

        let default_config = r#"server:
  port: 8080
  # Public URL for absolute links; leave empty to derive from requests.
  main_url: ""

api:
  # Backend base URL. Leave empty to use the VTUBE_API_URL environment
  # variable or the built-in default for the current environment.
  base_url: ""
  request_timeout: 30

video:
  per_page: 20
  slideshow_count: 4

# "production" or "development"
environment: "production"
"#;

        if let Err(e) = fs::write("config.yml", default_config) {
            log::error!("Failed to create default config.yml: {}", e);
            std::process::exit(1);
        }

        log::info!("Default config.yml created. Adjust it if the defaults don't fit.");
    } else {
        log::info!("CHECK: config.yml found.");
    }
}

fn check_templates() {
    let missing: Vec<&str> = REQUIRED_TEMPLATES
        .iter()
        .copied()
        .filter(|path| !Path::new(path).exists())
        .collect();

    if missing.is_empty() {
        log::info!("CHECK: HTML templates found.");
        return;
    }

    for path in &missing {
        log::error!("Missing template: {}", path);
    }
    log::error!("Templates are required to render pages. Exiting...");
    std::process::exit(1);
}
