use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::partner::{NewPartner, NewPartnerBody, Partner, PartnerCategory, PartnerChanges};
use crate::notification::directory::decode_error;
use crate::routes::api_response::ApiResponse;
use crate::routes::errors::ContentError;

#[derive(Debug, Deserialize)]
pub struct PartnerFilter {
    pub category: Option<PartnerCategory>,
    pub active: Option<bool>,
}

#[tracing::instrument(name = "Listing partners handler", skip(db_pool))]
pub async fn handle_list_partners(
    filter: web::Query<PartnerFilter>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let category = filter.category.map(|category| category.as_ref().to_string());
    let partners = sqlx::query(
        r#"
        SELECT id, name, logo, description, website, category, partnership_start_date, active,
            created_at, updated_at
        FROM partners
        WHERE ($1::text IS NULL OR category = $1) AND ($2::boolean IS NULL OR active = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(category)
    .bind(filter.active)
    .try_map(|row: PgRow| parse_partner_row(&row))
    .fetch_all(db_pool.get_ref())
    .await?;

    Ok(ApiResponse::list(partners).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Fetching a partner handler", skip(db_pool))]
pub async fn handle_get_partner(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let partner = fetch_partner(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("Partner"))?;

    Ok(ApiResponse::data(partner).respond(StatusCode::OK))
}

#[tracing::instrument(
    name = "Creating a partner handler",
    skip(body, db_pool),
    fields(partner_name = %body.name)
)]
pub async fn handle_create_partner(
    body: web::Json<NewPartnerBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let new_partner: NewPartner = body.try_into().map_err(ContentError::ValidationError)?;
    let partner = insert_partner(&db_pool, &new_partner).await?;

    Ok(ApiResponse::data(partner)
        .with_message("Partner created successfully")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Updating a partner handler", skip(body, db_pool))]
pub async fn handle_update_partner(
    path: web::Path<Uuid>,
    body: web::Json<PartnerChanges>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let mut partner = fetch_partner(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("Partner"))?;
    partner
        .apply(body.into_inner())
        .map_err(ContentError::ValidationError)?;
    let partner = update_partner(&db_pool, &partner).await?;

    Ok(ApiResponse::data(partner)
        .with_message("Partner updated successfully")
        .respond(StatusCode::OK))
}

#[tracing::instrument(name = "Deleting a partner handler", skip(db_pool))]
pub async fn handle_delete_partner(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let result = sqlx::query("DELETE FROM partners WHERE id = $1")
        .bind(path.into_inner())
        .execute(db_pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ContentError::NotFound("Partner"));
    }

    Ok(ApiResponse::message("Partner deleted successfully").respond(StatusCode::OK))
}

#[tracing::instrument(name = "Insert a partner into the database", skip(db_pool, new_partner))]
async fn insert_partner(db_pool: &PgPool, new_partner: &NewPartner) -> Result<Partner, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO partners (id, name, logo, description, website, category,
            partnership_start_date, active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING id, name, logo, description, website, category, partnership_start_date, active,
            created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_partner.name.as_ref())
    .bind(new_partner.logo.as_ref())
    .bind(new_partner.description.as_deref())
    .bind(new_partner.website.as_deref())
    .bind(new_partner.category.as_ref())
    .bind(new_partner.partnership_start_date)
    .bind(new_partner.active)
    .bind(Utc::now())
    .try_map(|row: PgRow| parse_partner_row(&row))
    .fetch_one(db_pool)
    .await
}

#[tracing::instrument(name = "Fetching a partner from the database", skip(db_pool))]
async fn fetch_partner(db_pool: &PgPool, id: Uuid) -> Result<Option<Partner>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, name, logo, description, website, category, partnership_start_date, active,
            created_at, updated_at
        FROM partners WHERE id = $1
        "#,
    )
    .bind(id)
    .try_map(|row: PgRow| parse_partner_row(&row))
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(name = "Updating a partner in the database", skip(db_pool, partner))]
async fn update_partner(db_pool: &PgPool, partner: &Partner) -> Result<Partner, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE partners
        SET name = $2, logo = $3, description = $4, website = $5, category = $6,
            partnership_start_date = $7, active = $8, updated_at = $9
        WHERE id = $1
        RETURNING id, name, logo, description, website, category, partnership_start_date, active,
            created_at, updated_at
        "#,
    )
    .bind(partner.id)
    .bind(&partner.name)
    .bind(&partner.logo)
    .bind(partner.description.as_deref())
    .bind(partner.website.as_deref())
    .bind(partner.category.as_ref())
    .bind(partner.partnership_start_date)
    .bind(partner.active)
    .bind(Utc::now())
    .try_map(|row: PgRow| parse_partner_row(&row))
    .fetch_one(db_pool)
    .await
}

fn parse_partner_row(row: &PgRow) -> Result<Partner, sqlx::Error> {
    Ok(Partner {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        logo: row.try_get("logo")?,
        description: row.try_get("description")?,
        website: row.try_get("website")?,
        category: PartnerCategory::parse(row.try_get("category")?).map_err(decode_error)?,
        partnership_start_date: row.try_get("partnership_start_date")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
