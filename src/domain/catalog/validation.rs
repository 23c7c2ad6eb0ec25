use rust_decimal::Decimal;
use std::str::FromStr;

use super::errors::FieldError;
use super::value_objects::{MenuItemPatch, NewMenuItem, RawMenuRow};

// ============================================================================
// Menu Item Validation
// ============================================================================
//
// All helpers return the normalized (trimmed) value on success so callers
// store exactly what was validated.
//
// ============================================================================

pub fn validate_name(name: &str) -> Result<String, FieldError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FieldError::EmptyName);
    }
    Ok(trimmed.to_string())
}

pub fn validate_category(category: &str) -> Result<String, FieldError> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(FieldError::EmptyCategory);
    }
    Ok(trimmed.to_string())
}

/// Upper bound on a single menu price. Keeps every line total and order total
/// well inside `Decimal` range for any `u32` quantity.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

pub fn validate_price(price: Decimal) -> Result<Decimal, FieldError> {
    if price <= Decimal::ZERO {
        return Err(FieldError::NonPositivePrice(price));
    }
    if price > MAX_PRICE {
        return Err(FieldError::PriceTooLarge(price));
    }
    Ok(price.normalize())
}

/// Parse spreadsheet price text. Accepts plain and scientific notation.
pub fn parse_price(text: &str) -> Result<Decimal, FieldError> {
    let trimmed = text.trim();
    let parsed = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| FieldError::UnparseablePrice(trimmed.to_string()))?;
    validate_price(parsed)
}

/// Blank optional text collapses to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Validate a full item, stopping at the first bad field.
pub fn validate_new_item(data: NewMenuItem) -> Result<NewMenuItem, FieldError> {
    Ok(NewMenuItem {
        name: validate_name(&data.name)?,
        price: validate_price(data.price)?,
        category: validate_category(&data.category)?,
        description: normalize_optional(data.description),
        portion: normalize_optional(data.portion),
        image_url: normalize_optional(data.image_url),
        image_hint: normalize_optional(data.image_hint),
    })
}

/// Validate only the fields present in the patch.
pub fn validate_patch(patch: MenuItemPatch) -> Result<MenuItemPatch, FieldError> {
    Ok(MenuItemPatch {
        name: patch.name.as_deref().map(validate_name).transpose()?,
        price: patch.price.map(validate_price).transpose()?,
        category: patch.category.as_deref().map(validate_category).transpose()?,
        description: patch.description.map(normalize_optional),
        portion: patch.portion.map(normalize_optional),
        image_url: patch.image_url.map(normalize_optional),
        image_hint: patch.image_hint.map(normalize_optional),
    })
}

/// Validate an import row, collecting every failing field.
pub fn validate_row(row: &RawMenuRow) -> Result<NewMenuItem, Vec<FieldError>> {
    let name = validate_name(&row.name);
    let price = parse_price(&row.price_text);
    let category = validate_category(&row.category);

    match (name, price, category) {
        (Ok(name), Ok(price), Ok(category)) => Ok(NewMenuItem {
            name,
            price,
            category,
            description: normalize_optional(Some(row.description.clone())),
            portion: normalize_optional(Some(row.portion.clone())),
            image_url: normalize_optional(Some(row.image_url.clone())),
            image_hint: normalize_optional(Some(row.image_hint.clone())),
        }),
        (name, price, category) => Err([name.err(), price.err(), category.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}
