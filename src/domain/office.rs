use actix_web::web;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::required_text::{nullable, optional_text, RequiredText};
use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfficeType {
    Headquarters,
    Regional,
    Field,
}

impl OfficeType {
    pub fn parse(office_type: String) -> Result<OfficeType, String> {
        match office_type.as_str() {
            "headquarters" => Ok(OfficeType::Headquarters),
            "regional" => Ok(OfficeType::Regional),
            "field" => Ok(OfficeType::Field),
            _ => Err(format!("{} is not a valid office type", office_type)),
        }
    }
}

impl AsRef<str> for OfficeType {
    fn as_ref(&self) -> &str {
        match self {
            OfficeType::Headquarters => "headquarters",
            OfficeType::Regional => "regional",
            OfficeType::Field => "field",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

impl OfficeAddress {
    fn cleaned(self) -> Self {
        Self {
            street: optional_text(self.street),
            city: optional_text(self.city),
            region: optional_text(self.region),
            country: optional_text(self.country),
            postal_code: optional_text(self.postal_code),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficeContact {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub fax: Option<String>,
}

impl OfficeContact {
    fn cleaned(self) -> Result<Self, String> {
        let email = optional_text(self.email)
            .map(SubscriberEmail::parse)
            .transpose()?
            .map(|email| email.as_ref().to_string());

        Ok(Self {
            phone: optional_text(self.phone),
            email,
            fax: optional_text(self.fax),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude {} is out of range", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude {} is out of range", self.longitude));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub office_type: OfficeType,
    pub address: OfficeAddress,
    pub contact: OfficeContact,
    pub coordinates: Option<Coordinates>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewOffice {
    pub name: RequiredText,
    pub office_type: OfficeType,
    pub address: OfficeAddress,
    pub contact: OfficeContact,
    pub coordinates: Option<Coordinates>,
    pub active: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOfficeBody {
    pub name: String,
    #[serde(rename = "type")]
    pub office_type: Option<OfficeType>,
    #[serde(default)]
    pub address: OfficeAddress,
    #[serde(default)]
    pub contact: OfficeContact,
    pub coordinates: Option<Coordinates>,
    pub active: Option<bool>,
}

impl TryFrom<web::Json<NewOfficeBody>> for NewOffice {
    type Error = String;

    fn try_from(body: web::Json<NewOfficeBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();
        if let Some(coordinates) = &body.coordinates {
            coordinates.validate()?;
        }

        Ok(NewOffice {
            name: RequiredText::parse("name", body.name)?,
            office_type: body.office_type.unwrap_or(OfficeType::Field),
            address: body.address.cleaned(),
            contact: body.contact.cleaned()?,
            coordinates: body.coordinates,
            active: body.active.unwrap_or(true),
        })
    }
}

/// Partial update of a stored office. `address` and `contact` are replaced as a whole,
/// `coordinates: null` removes the map position.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfficeChanges {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub office_type: Option<OfficeType>,
    pub address: Option<OfficeAddress>,
    pub contact: Option<OfficeContact>,
    #[serde(default, deserialize_with = "nullable")]
    pub coordinates: Option<Option<Coordinates>>,
    pub active: Option<bool>,
}

impl Office {
    pub fn apply(&mut self, changes: OfficeChanges) -> Result<(), String> {
        if let Some(name) = changes.name {
            self.name = RequiredText::parse("name", name)?.as_ref().to_string();
        }
        if let Some(address) = changes.address {
            self.address = address.cleaned();
        }
        if let Some(contact) = changes.contact {
            self.contact = contact.cleaned()?;
        }
        if let Some(coordinates) = changes.coordinates {
            if let Some(coordinates) = &coordinates {
                coordinates.validate()?;
            }
            self.coordinates = coordinates;
        }
        self.office_type = changes.office_type.unwrap_or(self.office_type);
        self.active = changes.active.unwrap_or(self.active);

        Ok(())
    }
}
