use actix_web::{web, HttpResponse, Responder};
use log::info;
use serde_json::json;

use crate::web::error::ApiError;
use crate::web::models::{ChatRequest, ShareRequest, SharedCodesResponse, TestRequest};
use crate::AppState;

// Liveness marker, served on both `/` and `/health`
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Chat API endpoint: code, complexity and docs for one message
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Chat request: {}", req.message);
    let response = data.orchestrator.handle_chat(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn generate_tests(
    data: web::Data<AppState>,
    req: web::Json<TestRequest>,
) -> Result<HttpResponse, ApiError> {
    let TestRequest { code, language } = req.into_inner();
    let response = data
        .orchestrator
        .handle_generate_tests(&code, language)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn share(
    data: web::Data<AppState>,
    req: web::Json<ShareRequest>,
) -> Result<HttpResponse, ApiError> {
    let response = data.orchestrator.handle_share(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_shared(
    data: web::Data<AppState>,
    share_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let record = data.orchestrator.get_shared(&share_id).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn list_shared(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let shared_codes = data.orchestrator.list_shared().await?;
    Ok(HttpResponse::Ok().json(SharedCodesResponse { shared_codes }))
}
