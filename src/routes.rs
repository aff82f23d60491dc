use crate::{
    api::{department, employee, leave_balance, leave_request, leave_type, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let register_limiter = build_limiter(config.rate_register_per_min);
    let refresh_limiter = build_limiter(config.rate_refresh_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(Governor::new(&register_limiter))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(Governor::new(&refresh_limiter))
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(&protected_limiter)) // rate limiting
            .service(
                web::scope("/leaverequests")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::list_leave_requests))
                            .route(web::post().to(leave_request::create_leave_request)),
                    )
                    .service(
                        web::resource("/pending")
                            .route(web::get().to(leave_request::pending_leave_requests)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave_request))
                            .route(web::delete().to(leave_request::delete_leave_request)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave_request)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave_request)),
                    )
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(leave_request::cancel_leave_request)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    .service(
                        web::resource("/subordinates/{manager_id}")
                            .route(web::get().to(employee::list_subordinates)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    .service(
                        web::resource("/{id}/activate")
                            .route(web::put().to(employee::activate_employee)),
                    )
                    .service(
                        web::resource("/{id}/deactivate")
                            .route(web::put().to(employee::deactivate_employee)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("")
                            .route(web::get().to(department::list_departments))
                            .route(web::post().to(department::create_department)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(department::get_department))
                            .route(web::put().to(department::update_department))
                            .route(web::delete().to(department::delete_department)),
                    )
                    .service(
                        web::resource("/{id}/activate")
                            .route(web::put().to(department::activate_department)),
                    )
                    .service(
                        web::resource("/{id}/deactivate")
                            .route(web::put().to(department::deactivate_department)),
                    ),
            )
            .service(
                web::scope("/leavetypes")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_type::list_leave_types))
                            .route(web::post().to(leave_type::create_leave_type)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_type::get_leave_type))
                            .route(web::put().to(leave_type::update_leave_type))
                            .route(web::delete().to(leave_type::delete_leave_type)),
                    )
                    .service(
                        web::resource("/{id}/activate")
                            .route(web::put().to(leave_type::activate_leave_type)),
                    )
                    .service(
                        web::resource("/{id}/deactivate")
                            .route(web::put().to(leave_type::deactivate_leave_type)),
                    ),
            )
            .service(
                web::scope("/leave-balances")
                    .service(
                        web::resource("")
                            .route(web::post().to(leave_balance::create_leave_balance)),
                    )
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(leave_balance::list_employee_balances)),
                    )
                    .service(
                        web::resource("/employee/{employee_id}/year/{year}")
                            .route(web::get().to(leave_balance::list_employee_balances_by_year)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(leave_balance::update_leave_balance))
                            .route(web::delete().to(leave_balance::delete_leave_balance)),
                    ),
            )
            .service(
                web::scope("/users")
                    .service(
                        web::resource("")
                            .route(web::get().to(user::list_users))
                            .route(web::post().to(user::create_user)),
                    )
                    .service(
                        web::resource("/{id}/activate")
                            .route(web::put().to(user::activate_user)),
                    )
                    .service(
                        web::resource("/{id}/deactivate")
                            .route(web::put().to(user::deactivate_user)),
                    ),
            ),
    );
}
