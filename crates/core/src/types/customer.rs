//! Customer contact details collected by the checkout form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A required checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    Name,
    Phone,
    Address,
}

impl CustomerField {
    /// All required fields in form order.
    pub const ALL: [Self; 3] = [Self::Name, Self::Phone, Self::Address];

    /// The form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when parsing [`CustomerDetails`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerError {
    /// One or more required fields were blank after trimming.
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<CustomerField>),
}

fn join_fields(fields: &[CustomerField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw checkout form input, exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl CheckoutForm {
    /// Build a form from its three fields.
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }

    /// Get the raw value of a field.
    #[must_use]
    pub fn field(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Name => &self.name,
            CustomerField::Phone => &self.phone,
            CustomerField::Address => &self.address,
        }
    }
}

/// Validated customer contact details.
///
/// ## Constraints
///
/// - `name`, `phone` and `address` are non-empty after trimming
/// - Stored values are trimmed
///
/// ## Examples
///
/// ```
/// use asn_store_core::{CheckoutForm, CustomerDetails};
///
/// let form = CheckoutForm::new(" Asha ", "98450 00000", "12 MG Road");
/// let details = CustomerDetails::parse(&form).unwrap();
/// assert_eq!(details.name(), "Asha");
///
/// assert!(CustomerDetails::parse(&CheckoutForm::default()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    name: String,
    phone: String,
    address: String,
}

impl CustomerDetails {
    /// Validate a submitted checkout form.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerError::MissingFields`] listing every field that is
    /// blank after trimming whitespace.
    pub fn parse(form: &CheckoutForm) -> Result<Self, CustomerError> {
        let missing: Vec<CustomerField> = CustomerField::ALL
            .into_iter()
            .filter(|field| form.field(*field).trim().is_empty())
            .collect();

        if !missing.is_empty() {
            return Err(CustomerError::MissingFields(missing));
        }

        Ok(Self {
            name: form.name.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            address: form.address.trim().to_owned(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}
