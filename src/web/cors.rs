use actix_cors::Cors;

/// CORS policy for the API.
///
/// `allowed_origins` is a comma-separated list. Absent or empty means any
/// origin is accepted, which suits a dashboard on another port in development.
pub fn cors_layer(allowed_origins: Option<&str>) -> Cors {
    let origins: Vec<&str> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.is_empty() {
        return Cors::permissive();
    }

    origins
        .into_iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
