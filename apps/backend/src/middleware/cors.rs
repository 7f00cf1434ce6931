use actix_cors::Cors;
use actix_web::http::header;

/// Origins from `CORS_ALLOWED_ORIGINS` (comma-separated), falling back to
/// the local dev frontend. Credentials are allowed so session cookies flow.
pub fn cors_middleware() -> Cors {
    cors_for(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default())
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        origins
    }
}

fn cors_for(raw: &str) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-trace-id")])
        .supports_credentials()
        .max_age(3600);

    for origin in parse_origins(raw) {
        cors = cors.allowed_origin(&origin);
    }
    cors
}
