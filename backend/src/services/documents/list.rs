use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};

/// All documents in creation order.
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    let repository = state.repository.read().await;
    HttpResponse::Ok().json(repository.documents())
}
