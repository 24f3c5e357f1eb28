use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub sector: String,
    pub founded: String,
    pub ceo: Contact,
    pub open_positions: Vec<String>,
}

/// A job posting flowing through the pipeline. Dataset records carry no id;
/// one is assigned when the record is loaded and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOffer {
    #[serde(skip_deserializing, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub company: String,
    #[serde(default)]
    pub company_logo: Option<String>,
    pub position: String,
    pub description: String,
    pub posted_date: NaiveDate,
    pub recruiters: Vec<Contact>,
    pub hiring_managers: Vec<Contact>,
    #[serde(default)]
    pub company_info: Option<CompanyInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactKind {
    Recruiter,
    HiringManager,
}

impl ContactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ContactKind::Recruiter => "Recruiter",
            ContactKind::HiringManager => "Hiring Manager",
        }
    }
}

/// A person card fanned out from an offer when it enters Applied. Created
/// only by that fan-out; carries a back-reference to the source offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCard {
    pub id: Uuid,
    pub kind: ContactKind,
    pub original_offer_id: Uuid,
    pub company: String,
    pub name: String,
    pub email: String,
}

impl ContactCard {
    pub fn from_contact(offer: &JobOffer, contact: &Contact, kind: ContactKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            original_offer_id: offer.id,
            company: offer.company.clone(),
            name: contact.name.clone(),
            email: contact.email.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Card {
    Offer(JobOffer),
    Contact(ContactCard),
}

impl Card {
    pub fn id(&self) -> Uuid {
        match self {
            Card::Offer(offer) => offer.id,
            Card::Contact(card) => card.id,
        }
    }

    pub fn company(&self) -> &str {
        match self {
            Card::Offer(offer) => &offer.company,
            Card::Contact(card) => &card.company,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocuments {
    pub resume: String,
    pub cover_letter: String,
}
