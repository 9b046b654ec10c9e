use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::office::{
    Coordinates, NewOffice, NewOfficeBody, Office, OfficeAddress, OfficeChanges, OfficeContact,
    OfficeType,
};
use crate::notification::directory::decode_error;
use crate::routes::api_response::ApiResponse;
use crate::routes::errors::ContentError;

#[derive(Debug, Deserialize)]
pub struct OfficeFilter {
    #[serde(rename = "type")]
    pub office_type: Option<OfficeType>,
    pub active: Option<bool>,
}

#[tracing::instrument(name = "Listing offices handler", skip(db_pool))]
pub async fn handle_list_offices(
    filter: web::Query<OfficeFilter>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let office_type = filter.office_type.map(|office_type| office_type.as_ref().to_string());
    let offices = sqlx::query(
        r#"
        SELECT id, name, office_type, street, city, region, country, postal_code, phone, email,
            fax, latitude, longitude, active, created_at, updated_at
        FROM offices
        WHERE ($1::text IS NULL OR office_type = $1) AND ($2::boolean IS NULL OR active = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(office_type)
    .bind(filter.active)
    .try_map(|row: PgRow| parse_office_row(&row))
    .fetch_all(db_pool.get_ref())
    .await?;

    Ok(ApiResponse::list(offices).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Fetching an office handler", skip(db_pool))]
pub async fn handle_get_office(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let office = fetch_office(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("Office"))?;

    Ok(ApiResponse::data(office).respond(StatusCode::OK))
}

#[tracing::instrument(
    name = "Creating an office handler",
    skip(body, db_pool),
    fields(office_name = %body.name)
)]
pub async fn handle_create_office(
    body: web::Json<NewOfficeBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let new_office: NewOffice = body.try_into().map_err(ContentError::ValidationError)?;
    let office = insert_office(&db_pool, &new_office).await?;

    Ok(ApiResponse::data(office)
        .with_message("Office created successfully")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Updating an office handler", skip(body, db_pool))]
pub async fn handle_update_office(
    path: web::Path<Uuid>,
    body: web::Json<OfficeChanges>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let mut office = fetch_office(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("Office"))?;
    office
        .apply(body.into_inner())
        .map_err(ContentError::ValidationError)?;
    let office = update_office(&db_pool, &office).await?;

    Ok(ApiResponse::data(office)
        .with_message("Office updated successfully")
        .respond(StatusCode::OK))
}

#[tracing::instrument(name = "Deleting an office handler", skip(db_pool))]
pub async fn handle_delete_office(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let result = sqlx::query("DELETE FROM offices WHERE id = $1")
        .bind(path.into_inner())
        .execute(db_pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ContentError::NotFound("Office"));
    }

    Ok(ApiResponse::message("Office deleted successfully").respond(StatusCode::OK))
}

#[tracing::instrument(name = "Insert an office into the database", skip(db_pool, new_office))]
async fn insert_office(db_pool: &PgPool, new_office: &NewOffice) -> Result<Office, sqlx::Error> {
    let (latitude, longitude) = coordinate_columns(new_office.coordinates);

    sqlx::query(
        r#"
        INSERT INTO offices (id, name, office_type, street, city, region, country, postal_code,
            phone, email, fax, latitude, longitude, active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
        RETURNING id, name, office_type, street, city, region, country, postal_code, phone, email,
            fax, latitude, longitude, active, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_office.name.as_ref())
    .bind(new_office.office_type.as_ref())
    .bind(new_office.address.street.as_deref())
    .bind(new_office.address.city.as_deref())
    .bind(new_office.address.region.as_deref())
    .bind(new_office.address.country.as_deref())
    .bind(new_office.address.postal_code.as_deref())
    .bind(new_office.contact.phone.as_deref())
    .bind(new_office.contact.email.as_deref())
    .bind(new_office.contact.fax.as_deref())
    .bind(latitude)
    .bind(longitude)
    .bind(new_office.active)
    .bind(Utc::now())
    .try_map(|row: PgRow| parse_office_row(&row))
    .fetch_one(db_pool)
    .await
}

#[tracing::instrument(name = "Fetching an office from the database", skip(db_pool))]
async fn fetch_office(db_pool: &PgPool, id: Uuid) -> Result<Option<Office>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, name, office_type, street, city, region, country, postal_code, phone, email,
            fax, latitude, longitude, active, created_at, updated_at
        FROM offices WHERE id = $1
        "#,
    )
    .bind(id)
    .try_map(|row: PgRow| parse_office_row(&row))
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(name = "Updating an office in the database", skip(db_pool, office))]
async fn update_office(db_pool: &PgPool, office: &Office) -> Result<Office, sqlx::Error> {
    let (latitude, longitude) = coordinate_columns(office.coordinates);

    sqlx::query(
        r#"
        UPDATE offices
        SET name = $2, office_type = $3, street = $4, city = $5, region = $6, country = $7,
            postal_code = $8, phone = $9, email = $10, fax = $11, latitude = $12,
            longitude = $13, active = $14, updated_at = $15
        WHERE id = $1
        RETURNING id, name, office_type, street, city, region, country, postal_code, phone, email,
            fax, latitude, longitude, active, created_at, updated_at
        "#,
    )
    .bind(office.id)
    .bind(&office.name)
    .bind(office.office_type.as_ref())
    .bind(office.address.street.as_deref())
    .bind(office.address.city.as_deref())
    .bind(office.address.region.as_deref())
    .bind(office.address.country.as_deref())
    .bind(office.address.postal_code.as_deref())
    .bind(office.contact.phone.as_deref())
    .bind(office.contact.email.as_deref())
    .bind(office.contact.fax.as_deref())
    .bind(latitude)
    .bind(longitude)
    .bind(office.active)
    .bind(Utc::now())
    .try_map(|row: PgRow| parse_office_row(&row))
    .fetch_one(db_pool)
    .await
}

fn coordinate_columns(coordinates: Option<Coordinates>) -> (Option<f64>, Option<f64>) {
    match coordinates {
        Some(coordinates) => (Some(coordinates.latitude), Some(coordinates.longitude)),
        None => (None, None),
    }
}

fn parse_office_row(row: &PgRow) -> Result<Office, sqlx::Error> {
    let latitude: Option<f64> = row.try_get("latitude")?;
    let longitude: Option<f64> = row.try_get("longitude")?;
    let coordinates = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    Ok(Office {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        office_type: OfficeType::parse(row.try_get("office_type")?).map_err(decode_error)?,
        address: OfficeAddress {
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            region: row.try_get("region")?,
            country: row.try_get("country")?,
            postal_code: row.try_get("postal_code")?,
        },
        contact: OfficeContact {
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            fax: row.try_get("fax")?,
        },
        coordinates,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
