use actix_web::{
    get,
    web::{Data, ServiceConfig},
    HttpResponse,
};

use crate::access::identity::Identity;
use crate::api::error::ServiceError;
use crate::api::job::JobService;

/// Role-scoped dashboard widgets: submissions awaiting a response and
/// actively-placing jobs.
#[get("/dashboard")]
async fn dashboard(
    service: Data<JobService>,
    identity: Identity,
) -> Result<HttpResponse, ServiceError> {
    let data = service.dashboard(&identity).await?;
    Ok(HttpResponse::Ok().json(data))
}

pub fn dashboard_config(config: &mut ServiceConfig) {
    config.service(dashboard);
}
