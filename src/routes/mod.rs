pub mod auth;
pub mod health;
pub mod projects;

use actix_web::web;

use crate::auth::AuthMiddleware;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .wrap(AuthMiddleware)
            .service(auth::get_users)
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::delete_user)
            .service(auth::refresh),
    )
    .service(
        web::scope("/projects")
            .wrap(AuthMiddleware)
            .service(projects::get_projects)
            .service(projects::get_project)
            .service(projects::create_project)
            .service(projects::update_project)
            .service(projects::delete_project),
    );
}
