use actix_web::{
    delete, get, patch, post,
    web::{scope, Data, Path, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use crate::access::identity::Identity;
use crate::api::error::ServiceError;
use crate::api::job::dto::{JobResponse, MessageResponse};
use crate::api::job::models::{JobCreate, JobListQuery, JobPatch, JobSearchQuery, JobStageChange};
use crate::api::job::JobService;

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    identity: Identity,
    query: Query<JobListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.list_jobs(&identity, query.stage).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/search")]
async fn search_jobs(
    service: Data<JobService>,
    identity: Identity,
    query: Query<JobSearchQuery>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.search_jobs(&identity, &query).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    identity: Identity,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(&identity, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[post("")]
async fn create_job(
    service: Data<JobService>,
    identity: Identity,
    req: Json<JobCreate>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.create_job(&identity, &req).await?;
    Ok(HttpResponse::Created().json(JobResponse {
        message: "Job created successfully".to_string(),
        job,
    }))
}

#[patch("/{id}")]
async fn update_job(
    service: Data<JobService>,
    identity: Identity,
    id: Path<i32>,
    req: Json<JobPatch>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.update_job(&identity, id.into_inner(), &req).await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Job updated successfully".to_string(),
        job,
    }))
}

#[post("/{id}/stage")]
async fn change_stage(
    service: Data<JobService>,
    identity: Identity,
    id: Path<i32>,
    req: Json<JobStageChange>,
) -> Result<HttpResponse, ServiceError> {
    let job = service
        .change_stage(&identity, id.into_inner(), req.target)
        .await?;
    Ok(HttpResponse::Ok().json(JobResponse {
        message: "Job stage updated".to_string(),
        job,
    }))
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    identity: Identity,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    service.delete_job(&identity, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Job deleted".to_string(),
    }))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("jobs")
            .service(search_jobs)
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job)
            .service(change_stage)
            .service(delete_job),
    );
}
