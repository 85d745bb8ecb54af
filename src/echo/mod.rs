//! Debug endpoints that log and echo whatever they receive.

pub mod handlers;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/agent").route(web::post().to(handlers::agent_echo)))
        .service(web::resource("/debug/print").route(web::post().to(handlers::print_echo)));
}
