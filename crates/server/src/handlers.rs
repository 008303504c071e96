use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}
/// Invite landing page lookup: 200 with lobby facts when the code
/// points at a session, 404 otherwise.
pub async fn invite(parlor: web::Data<Parlor>, path: web::Path<String>) -> impl Responder {
    match parlor.validate(&path.into_inner()).await {
        Some(info) => HttpResponse::Ok().json(info),
        None => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": "Invalid invite code" }))
        }
    }
}
/// Upgrades to WebSocket and hands the connection to the bridge.
pub async fn connect(
    parlor: web::Data<Parlor>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            bridge::spawn(parlor.into_inner(), session, stream);
            response.map_into_left_body()
        }
        Err(e) => HttpResponse::InternalServerError()
            .body(e.to_string())
            .map_into_right_body(),
    }
}
