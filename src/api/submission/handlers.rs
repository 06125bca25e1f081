use actix_web::{
    get, post,
    web::{scope, Data, Path, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use crate::access::identity::Identity;
use crate::api::error::ServiceError;
use crate::api::submission::dto::SubmissionResponse;
use crate::api::submission::models::{SubmissionCreate, SubmissionListQuery, TransitionRequest};
use crate::api::submission::SubmissionService;

#[get("")]
async fn list_submissions(
    service: Data<SubmissionService>,
    identity: Identity,
    query: Query<SubmissionListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let submissions = service
        .list_submissions(&identity, query.job_id, query.status)
        .await?;
    Ok(HttpResponse::Ok().json(submissions))
}

#[post("")]
async fn submit_candidate(
    service: Data<SubmissionService>,
    identity: Identity,
    req: Json<SubmissionCreate>,
) -> Result<HttpResponse, ServiceError> {
    let submission = service.submit_candidate(&identity, &req).await?;
    Ok(HttpResponse::Created().json(SubmissionResponse {
        message: "Candidate submitted successfully".to_string(),
        submission,
        warning: None,
    }))
}

#[post("/{id}/transition")]
async fn transition(
    service: Data<SubmissionService>,
    identity: Identity,
    id: Path<i32>,
    req: Json<TransitionRequest>,
) -> Result<HttpResponse, ServiceError> {
    let (submission, warning) = service.transition(&identity, id.into_inner(), &req).await?;
    Ok(HttpResponse::Ok().json(SubmissionResponse {
        message: "Submission updated".to_string(),
        submission,
        warning,
    }))
}

#[get("/{id}")]
async fn get_candidate(
    service: Data<SubmissionService>,
    identity: Identity,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let candidate = service.get_candidate(&identity, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(candidate))
}

pub fn submission_config(config: &mut ServiceConfig) {
    config
        .service(
            scope("submissions")
                .service(list_submissions)
                .service(submit_candidate)
                .service(transition),
        )
        .service(scope("candidates").service(get_candidate));
}
