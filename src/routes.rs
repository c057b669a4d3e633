use crate::{api::payroll, auth::middleware::auth_middleware, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Per-route limiter. `None` when the builder rejects the quota.
fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

#[derive(Clone)]
pub struct RateLimiters {
    process: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
    protected: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
}

impl RateLimiters {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let limiter = |per_min: u32, name: &str| {
            build_limiter(per_min)
                .map(Arc::new)
                .ok_or_else(|| anyhow::anyhow!("invalid {name} rate limit: {per_min}/min"))
        };
        Ok(Self {
            process: limiter(config.rate_process_per_min, "process")?,
            protected: limiter(config.rate_protected_per_min, "protected")?,
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: RateLimiters) {
    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(limiters.protected) // rate limiting
            .service(
                web::scope("/payroll")
                    // /payroll/monthly
                    .service(
                        web::resource("/monthly")
                            .route(web::post().to(payroll::create_monthly_payroll)),
                    )
                    // /payroll/monthly/{id}
                    .service(
                        web::resource("/monthly/{id}")
                            .route(web::get().to(payroll::get_monthly_payroll)),
                    )
                    // /payroll/monthly/{id}/process
                    .service(
                        web::resource("/monthly/{id}/process")
                            .wrap(limiters.process)
                            .route(web::post().to(payroll::process_monthly_payroll)),
                    )
                    // /payroll/monthly/{id}/finalize
                    .service(
                        web::resource("/monthly/{id}/finalize")
                            .route(web::put().to(payroll::finalize_monthly_payroll)),
                    )
                    // /payroll/employee/{id}
                    .service(
                        web::resource("/employee/{id}")
                            .route(web::get().to(payroll::get_employee_payroll)),
                    ),
            ),
    );
}
