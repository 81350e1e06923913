use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Company, CompanyForCreation, CompanyForUpdate},
    AppState,
};

fn validate_fields(name: &str, address: &str, country: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::validation("Company name cannot be empty"));
    }
    if address.trim().is_empty() {
        return Err(ApiError::validation("Company address cannot be empty"));
    }
    if country.trim().is_empty() {
        return Err(ApiError::validation("Company country cannot be empty"));
    }
    Ok(())
}

/// GET /api/companies - List all companies (employees not populated)
pub async fn list_companies(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let companies = app_state.company_repository.list().await?;
    Ok(Json(companies))
}

/// GET /api/companies/:id - Fetch a single company
pub async fn get_company(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, ApiError> {
    let company = app_state
        .company_repository
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Company {id} not found")))?;

    Ok(Json(company))
}

/// POST /api/companies - Create a company, 201 with a Location header
pub async fn create_company(
    State(app_state): State<AppState>,
    Json(payload): Json<CompanyForCreation>,
) -> Result<Response, ApiError> {
    validate_fields(&payload.name, &payload.address, &payload.country)?;

    let company = app_state.company_repository.create(&payload).await?;
    let location = format!("/api/companies/{}", company.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(company),
    )
        .into_response())
}

/// PUT /api/companies/:id - Full overwrite of the three mutable fields.
///
/// The existence check and the update are separate statements; a company
/// deleted in between silently no-ops, matching the storage layer's
/// zero-row update semantics.
pub async fn update_company(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompanyForUpdate>,
) -> Result<StatusCode, ApiError> {
    validate_fields(&payload.name, &payload.address, &payload.country)?;

    if app_state.company_repository.get(id).await?.is_none() {
        return Err(ApiError::not_found(format!("Company {id} not found")));
    }

    app_state.company_repository.update(id, &payload).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/companies/:id - Delete a company. 409 when employees still
/// reference it (the foreign key is not cascading).
pub async fn delete_company(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if app_state.company_repository.get(id).await?.is_none() {
        return Err(ApiError::not_found(format!("Company {id} not found")));
    }

    app_state.company_repository.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/companies/by-employee/:employee_id - Company owning the given
/// employee, resolved through the stored routine
pub async fn get_company_by_employee_id(
    State(app_state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<Company>, ApiError> {
    let company = app_state
        .company_repository
        .get_by_employee_id(employee_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("No company found for employee {employee_id}"))
        })?;

    Ok(Json(company))
}

/// GET /api/companies/:id/full - Company with its employees (multi-result)
pub async fn get_company_with_employees(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, ApiError> {
    let company = app_state
        .company_repository
        .get_with_employees(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Company {id} not found")))?;

    Ok(Json(company))
}

/// GET /api/companies/full - All companies with their employees, from the
/// join query. Companies without employees are absent (inner join).
pub async fn list_companies_with_employees(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let companies = app_state.company_repository.list_with_employees().await?;
    Ok(Json(companies))
}

/// POST /api/companies/batch - Transactional batch insert: all entries
/// persist or none do.
pub async fn create_companies(
    State(app_state): State<AppState>,
    Json(payload): Json<Vec<CompanyForCreation>>,
) -> Result<Response, ApiError> {
    for company in &payload {
        validate_fields(&company.name, &company.address, &company.country)?;
    }

    let companies = app_state.company_repository.create_many(&payload).await?;

    Ok((StatusCode::CREATED, Json(companies)).into_response())
}
