use serde::{Deserialize, Serialize};

use super::errors::OrderError;
use super::value_objects::OrderType;

// ============================================================================
// Customer Details
// ============================================================================
//
// `CustomerInput` mirrors the order form: every field optional. Validation
// turns it into `CustomerDetails`, whose variant always matches the order type.
//
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub flat: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
}

impl CustomerInput {
    pub fn delivery(
        phone: impl Into<String>,
        building: impl Into<String>,
        flat: impl Into<String>,
    ) -> Self {
        Self {
            phone: Some(phone.into()),
            building: Some(building.into()),
            flat: Some(flat.into()),
            ..Default::default()
        }
    }

    pub fn dine_in(table_number: impl Into<String>) -> Self {
        Self {
            table_number: Some(table_number.into()),
            ..Default::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CustomerDetails {
    #[serde(rename_all = "camelCase")]
    Delivery {
        name: Option<String>,
        phone: String,
        building: String,
        flat: String,
    },
    #[serde(rename_all = "camelCase")]
    DineIn {
        name: Option<String>,
        table_number: String,
        phone: Option<String>,
    },
}

impl CustomerDetails {
    /// Check completeness for `order_type` and reject fields of the other type.
    pub fn from_input(order_type: OrderType, input: CustomerInput) -> Result<Self, OrderError> {
        let name = filled(input.name);
        let phone = filled(input.phone);
        let building = filled(input.building);
        let flat = filled(input.flat);
        let table_number = filled(input.table_number);

        match order_type {
            OrderType::Delivery => {
                if table_number.is_some() {
                    return Err(unexpected(order_type, "tableNumber"));
                }
                Ok(CustomerDetails::Delivery {
                    name,
                    phone: phone.ok_or_else(|| missing(order_type, "phone"))?,
                    building: building.ok_or_else(|| missing(order_type, "building"))?,
                    flat: flat.ok_or_else(|| missing(order_type, "flat"))?,
                })
            }
            OrderType::DineIn => {
                if building.is_some() {
                    return Err(unexpected(order_type, "building"));
                }
                if flat.is_some() {
                    return Err(unexpected(order_type, "flat"));
                }
                Ok(CustomerDetails::DineIn {
                    name,
                    table_number: table_number.ok_or_else(|| missing(order_type, "tableNumber"))?,
                    phone,
                })
            }
        }
    }

    pub fn order_type(&self) -> OrderType {
        match self {
            CustomerDetails::Delivery { .. } => OrderType::Delivery,
            CustomerDetails::DineIn { .. } => OrderType::DineIn,
        }
    }

    pub fn phone(&self) -> Option<&str> {
        match self {
            CustomerDetails::Delivery { phone, .. } => Some(phone),
            CustomerDetails::DineIn { phone, .. } => phone.as_deref(),
        }
    }

    /// Phone in E.164 form (`+` then digits), the only form SMS can be sent to.
    pub fn notifiable_phone(&self) -> Option<&str> {
        self.phone().filter(|p| {
            p.strip_prefix('+')
                .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false)
        })
    }

    /// Back to form shape, used when an edit changes the type but not the details.
    pub fn to_input(&self) -> CustomerInput {
        match self.clone() {
            CustomerDetails::Delivery {
                name,
                phone,
                building,
                flat,
            } => CustomerInput {
                name,
                phone: Some(phone),
                building: Some(building),
                flat: Some(flat),
                table_number: None,
            },
            CustomerDetails::DineIn {
                name,
                table_number,
                phone,
            } => CustomerInput {
                name,
                phone,
                building: None,
                flat: None,
                table_number: Some(table_number),
            },
        }
    }
}

fn filled(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn missing(order_type: OrderType, field: &'static str) -> OrderError {
    OrderError::MissingCustomerField { order_type, field }
}

fn unexpected(order_type: OrderType, field: &'static str) -> OrderError {
    OrderError::UnexpectedCustomerField { order_type, field }
}
