use crate::api::report;
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{guard, web};
use anyhow::anyhow;

type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP request quotas for the report endpoints.
pub struct RateLimits {
    upload: LimiterConfig,
    report: LimiterConfig,
}

impl RateLimits {
    pub fn new(upload_per_min: u32, report_per_min: u32) -> anyhow::Result<Self> {
        Ok(Self {
            upload: build_limiter(upload_per_min)?,
            report: build_limiter(report_per_min)?,
        })
    }
}

fn build_limiter(requests_per_min: u32) -> anyhow::Result<LimiterConfig> {
    if requests_per_min == 0 {
        return Err(anyhow!("rate limit must allow at least one request per minute"));
    }
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);

    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} requests per minute"))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limits: &RateLimits) {
    cfg.service(
        web::scope(api_prefix)
            // POST /report
            .service(
                web::resource("/report")
                    .guard(guard::Post())
                    .wrap(Governor::new(&limits.upload))
                    .to(report::upload_time_report),
            )
            // GET /report
            .service(
                web::resource("/report")
                    .guard(guard::Get())
                    .wrap(Governor::new(&limits.report))
                    .to(report::get_payroll_report),
            ),
    );
}
