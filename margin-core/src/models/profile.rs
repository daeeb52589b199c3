use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{epoch_millis, to_base36};

/// Shortest phone entry accepted when creating an account.
pub const MIN_ACCOUNT_PHONE_LEN: usize = 9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("name is required")]
    MissingName,

    #[error("phone number must be at least 9 characters")]
    PhoneTooShort,

    #[error("business name is required")]
    MissingBusinessName,

    #[error("location is required")]
    MissingLocation,

    #[error("unrecognised VAT status '{0}'")]
    InvalidVatStatus(String),

    #[error("unrecognised sector '{0}'")]
    InvalidSector(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl UserAccount {
    /// Creates an in-memory account from raw form input.
    ///
    /// Name and phone are trimmed; a blank email is stored as `None`.
    pub fn register(
        name: &str,
        phone: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, AccountError> {
        let name = name.trim();
        let phone = phone.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(AccountError::MissingName);
        }
        if phone.chars().count() < MIN_ACCOUNT_PHONE_LEN {
            return Err(AccountError::PhoneTooShort);
        }

        Ok(Self {
            id: format!("user-{}", to_base36(epoch_millis(now))),
            name: name.to_string(),
            phone: phone.to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
        })
    }

    /// Stand-in used by the profile page when nobody has signed in.
    pub fn placeholder() -> Self {
        Self {
            id: "local-user".to_string(),
            name: "Duka Owner".to_string(),
            phone: "07xx xxx xxx".to_string(),
            email: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VatStatus {
    VatRegistered,
    #[default]
    NonVat,
}

impl VatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VatRegistered => "vat-registered",
            Self::NonVat => "non-vat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vat-registered" => Some(Self::VatRegistered),
            "non-vat" => Some(Self::NonVat),
            _ => None,
        }
    }
}

impl FromStr for VatStatus {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| AccountError::InvalidVatStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    #[default]
    Retail,
    Wholesale,
    Services,
    Other,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Wholesale => "wholesale",
            Self::Services => "services",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "retail" => Some(Self::Retail),
            "wholesale" => Some(Self::Wholesale),
            "services" => Some(Self::Services),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Retail => "Retail / Duka",
            Self::Wholesale => "Wholesale",
            Self::Services => "Services",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Sector {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| AccountError::InvalidSector(s.to_string()))
    }
}

/// Raw profile form values, before validation.
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub business_name: String,
    pub kra_pin: String,
    pub vat_status: VatStatus,
    pub sector: Sector,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub business_name: String,
    pub kra_pin: Option<String>,
    pub vat_status: VatStatus,
    pub sector: Sector,
    pub location: String,
}

impl TryFrom<ProfileDraft> for BusinessProfile {
    type Error = AccountError;

    fn try_from(draft: ProfileDraft) -> Result<Self, Self::Error> {
        let business_name = draft.business_name.trim();
        let location = draft.location.trim();
        let kra_pin = draft.kra_pin.trim().to_uppercase();

        if business_name.is_empty() {
            return Err(AccountError::MissingBusinessName);
        }
        if location.is_empty() {
            return Err(AccountError::MissingLocation);
        }

        Ok(Self {
            business_name: business_name.to_string(),
            kra_pin: (!kra_pin.is_empty()).then_some(kra_pin),
            vat_status: draft.vat_status,
            sector: draft.sector,
            location: location.to_string(),
        })
    }
}

impl fmt::Display for BusinessProfile {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Business:   {}", self.business_name)?;
        writeln!(f, "Location:   {}", self.location)?;
        writeln!(f, "Sector:     {}", self.sector.label())?;
        writeln!(f, "VAT status: {}", self.vat_status.as_str())?;
        write!(
            f,
            "KRA PIN:    {}",
            self.kra_pin.as_deref().unwrap_or("—")
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(1_704_067_200_000).unwrap()
    }

    #[test]
    fn register_trims_fields_and_derives_id() {
        let user = UserAccount::register("  Wanjiku  ", " 0712345678 ", "", now()).unwrap();

        assert_eq!(user.id, "user-lqu5m2o0");
        assert_eq!(user.name, "Wanjiku");
        assert_eq!(user.phone, "0712345678");
        assert_eq!(user.email, None);
    }

    #[test]
    fn register_keeps_non_blank_email() {
        let user =
            UserAccount::register("Otieno", "0712345678", " otieno@duka.ke ", now()).unwrap();

        assert_eq!(user.email.as_deref(), Some("otieno@duka.ke"));
    }

    #[test]
    fn register_rejects_blank_name() {
        assert_eq!(
            UserAccount::register("   ", "0712345678", "", now()),
            Err(AccountError::MissingName)
        );
    }

    #[test]
    fn register_rejects_short_phone() {
        assert_eq!(
            UserAccount::register("Akinyi", "07123", "", now()),
            Err(AccountError::PhoneTooShort)
        );
    }

    #[test]
    fn profile_requires_business_name_and_location() {
        let missing_name = ProfileDraft {
            location: "Nairobi".to_string(),
            ..Default::default()
        };
        let missing_location = ProfileDraft {
            business_name: "Mama Mboga".to_string(),
            ..Default::default()
        };

        assert_eq!(
            BusinessProfile::try_from(missing_name),
            Err(AccountError::MissingBusinessName)
        );
        assert_eq!(
            BusinessProfile::try_from(missing_location),
            Err(AccountError::MissingLocation)
        );
    }

    #[test]
    fn profile_uppercases_pin_and_defaults_to_retail_non_vat() {
        let profile = BusinessProfile::try_from(ProfileDraft {
            business_name: " Mama Mboga ".to_string(),
            kra_pin: " a012345678z ".to_string(),
            location: " Gikomba ".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(profile.business_name, "Mama Mboga");
        assert_eq!(profile.kra_pin.as_deref(), Some("A012345678Z"));
        assert_eq!(profile.vat_status, VatStatus::NonVat);
        assert_eq!(profile.sector, Sector::Retail);
        assert_eq!(profile.location, "Gikomba");
    }

    #[test]
    fn blank_pin_is_none() {
        let profile = BusinessProfile::try_from(ProfileDraft {
            business_name: "Duka".to_string(),
            kra_pin: "   ".to_string(),
            location: "Kisumu".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert!(profile.kra_pin.is_none());
    }

    #[test]
    fn vat_status_and_sector_codes_round_trip() {
        for status in [VatStatus::VatRegistered, VatStatus::NonVat] {
            assert_eq!(VatStatus::parse(status.as_str()), Some(status));
        }
        for sector in [Sector::Retail, Sector::Wholesale, Sector::Services, Sector::Other] {
            assert_eq!(Sector::parse(sector.as_str()), Some(sector));
        }
        assert_eq!(Sector::parse("mining"), None);
    }

    #[test]
    fn unknown_codes_are_reported_by_from_str() {
        assert_eq!(
            "gold".parse::<VatStatus>(),
            Err(AccountError::InvalidVatStatus("gold".to_string()))
        );
        assert_eq!(
            "mining".parse::<Sector>(),
            Err(AccountError::InvalidSector("mining".to_string()))
        );
        assert_eq!("Wholesale".parse::<Sector>(), Ok(Sector::Wholesale));
        assert_eq!(" vat-registered ".parse::<VatStatus>(), Ok(VatStatus::VatRegistered));
    }
}
