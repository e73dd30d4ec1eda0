pub mod auth;
pub mod hauler;
pub mod jobs;
pub mod users;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth / account routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/choose-role", web::post().to(auth::choose_role))
            .route("/profile", web::put().to(auth::update_profile))
            .route("/account", web::delete().to(auth::delete_account)),
    );

    // ── Customer job routes ──
    cfg.service(
        web::scope("/jobs")
            .route("", web::post().to(jobs::create_job))
            .route("", web::get().to(jobs::list_own_jobs))
            .route("/{id}", web::get().to(jobs::job_detail))
            .route("/{id}/photos", web::post().to(jobs::add_photos))
            .route("/{id}/bids", web::post().to(hauler::submit_bid))
            .route(
                "/{id}/completion-photos",
                web::post().to(hauler::add_completion_photos),
            )
            .route("/{id}/deposit", web::post().to(jobs::mark_deposit_paid))
            .route("/{id}/complete", web::post().to(jobs::complete_job))
            .route("/{id}/cancel", web::post().to(jobs::cancel_job))
            .route("/{id}/review", web::post().to(jobs::submit_review)),
    );

    // ── Bid acceptance ──
    cfg.service(
        web::scope("/bids").route("/{id}/accept", web::post().to(jobs::accept_bid)),
    );

    // ── Hauler routes ──
    cfg.service(
        web::scope("/hauler")
            .route("/setup", web::post().to(hauler::setup))
            .route("/jobs", web::get().to(hauler::open_jobs))
            .route("/dashboard", web::get().to(hauler::dashboard)),
    );

    // ── Admin user routes ──
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(users::get_users))
            .route("/{id}", web::delete().to(users::delete_user)),
    );
}
