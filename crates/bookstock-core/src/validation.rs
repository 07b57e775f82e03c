//! # Validation Module
//!
//! Turns a caller's [`FieldSet`] into a typed, checked value the store can
//! write without further thought.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (out of scope)                                  │
//! │  └── Immediate user feedback while typing                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── validate_new_book  → NewBook     (defaults applied)               │
//! │  └── validate_changes   → BookChanges (omitted fields untouched)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK constraints (quantity >= 0, price >= 0, phone length)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Order of Checks
//! Checks fail fast in this order: name, supplier phone, price, quantity,
//! supplier name. An insert that is missing both name and phone therefore
//! reports the name.

use crate::error::{ValidationError, ValidationResult};
use crate::fields::{FieldSet, FieldValue};
use crate::money::Money;
use crate::schema::BookColumn;
use crate::MIN_SUPPLIER_PHONE_LEN;

// =============================================================================
// Validated Values
// =============================================================================

/// A fully defaulted, validated book ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    pub supplier_name: String,
    pub supplier_phone: String,
}

/// A validated partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookChanges {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<i64>,
    pub supplier_name: Option<String>,
    pub supplier_phone: Option<String>,
}

impl BookChanges {
    /// Changes that only set the quantity.
    pub fn quantity(quantity: i64) -> Self {
        BookChanges {
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    /// Returns true if nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.supplier_name.is_none()
            && self.supplier_phone.is_none()
    }
}

// =============================================================================
// Field-Set Validators
// =============================================================================

/// Validates a field-set for insert, applying defaults.
///
/// ## Rules
/// 1. `name` required, non-empty after trimming
/// 2. `supplier_phone` required, at least 10 characters after trimming
/// 3. `price` defaults to 0.00, otherwise a non-negative decimal
/// 4. `quantity` defaults to 0, otherwise a non-negative integer
/// 5. `supplier_name` defaults to ""
///
/// Blank text for price, quantity or supplier name counts as not supplied,
/// as an empty form box does. `_id` may not be supplied.
///
/// ## Example
/// ```rust
/// use bookstock_core::fields::FieldSet;
/// use bookstock_core::validation::validate_new_book;
///
/// let ok = FieldSet::new().with_name("Dune").with_supplier_phone("1234567890");
/// let book = validate_new_book(&ok).unwrap();
/// assert_eq!(book.quantity, 0);
/// assert!(book.price.is_zero());
///
/// let missing_name = FieldSet::new().with_supplier_phone("1234567890");
/// assert!(validate_new_book(&missing_name).is_err());
/// ```
pub fn validate_new_book(fields: &FieldSet) -> ValidationResult<NewBook> {
    reject_id(fields)?;

    let name = match fields.get(BookColumn::Name) {
        Some(value) => validate_name(value)?,
        None => return Err(ValidationError::required(BookColumn::Name.label())),
    };

    let supplier_phone = match fields.get(BookColumn::SupplierPhone) {
        Some(value) => validate_supplier_phone(value)?,
        None => return Err(ValidationError::required(BookColumn::SupplierPhone.label())),
    };

    let price = optional_field(fields, BookColumn::Price)
        .map(validate_price)
        .transpose()?
        .unwrap_or_default();

    let quantity = optional_field(fields, BookColumn::Quantity)
        .map(validate_quantity)
        .transpose()?
        .unwrap_or(0);

    let supplier_name = optional_field(fields, BookColumn::SupplierName)
        .map(validate_supplier_name)
        .transpose()?
        .unwrap_or_default();

    Ok(NewBook {
        name,
        price,
        quantity,
        supplier_name,
        supplier_phone,
    })
}

/// Validates a field-set for update. Only supplied fields are checked, and
/// nothing is defaulted.
///
/// ## Errors
/// - Same per-field rules as [`validate_new_book`]
/// - [`ValidationError::NoChanges`] if nothing would be written, including
///   a field-set holding only blank optional fields
pub fn validate_changes(fields: &FieldSet) -> ValidationResult<BookChanges> {
    reject_id(fields)?;

    let changes = BookChanges {
        name: fields
            .get(BookColumn::Name)
            .map(validate_name)
            .transpose()?,
        supplier_phone: fields
            .get(BookColumn::SupplierPhone)
            .map(validate_supplier_phone)
            .transpose()?,
        price: optional_field(fields, BookColumn::Price)
            .map(validate_price)
            .transpose()?,
        quantity: optional_field(fields, BookColumn::Quantity)
            .map(validate_quantity)
            .transpose()?,
        supplier_name: optional_field(fields, BookColumn::SupplierName)
            .map(validate_supplier_name)
            .transpose()?,
    };

    if changes.is_empty() {
        return Err(ValidationError::NoChanges);
    }

    Ok(changes)
}

/// Looks up an optional column, treating blank text as absent.
fn optional_field(fields: &FieldSet, column: BookColumn) -> Option<&FieldValue> {
    fields.get(column).filter(|value| match value {
        FieldValue::Text(text) => !text.trim().is_empty(),
        _ => true,
    })
}

fn reject_id(fields: &FieldSet) -> ValidationResult<()> {
    if fields.contains(BookColumn::Id) {
        return Err(ValidationError::Immutable {
            field: BookColumn::Id.label().to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Single-Field Validators
// =============================================================================

/// Validates a book name: text, non-empty after trimming.
pub fn validate_name(value: &FieldValue) -> ValidationResult<String> {
    let field = BookColumn::Name.label();
    let name = expect_text(field, value)?.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(name.to_string())
}

/// Validates a supplier phone: text, at least 10 characters after trimming.
///
/// ## Example
/// ```rust
/// use bookstock_core::fields::FieldValue;
/// use bookstock_core::validation::validate_supplier_phone;
///
/// assert!(validate_supplier_phone(&"555-0100 x1".into()).is_ok());
/// assert!(validate_supplier_phone(&"555-0100".into()).is_err());
/// ```
pub fn validate_supplier_phone(value: &FieldValue) -> ValidationResult<String> {
    let field = BookColumn::SupplierPhone.label();
    let phone = expect_text(field, value)?.trim();

    if phone.is_empty() {
        return Err(ValidationError::required(field));
    }

    if phone.chars().count() < MIN_SUPPLIER_PHONE_LEN {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min: MIN_SUPPLIER_PHONE_LEN,
        });
    }

    Ok(phone.to_string())
}

/// Validates an optional supplier name. Any text, trimmed.
pub fn validate_supplier_name(value: &FieldValue) -> ValidationResult<String> {
    let field = BookColumn::SupplierName.label();
    Ok(expect_text(field, value)?.trim().to_string())
}

/// Validates a price: a finite, non-negative decimal.
///
/// Text is parsed as a decimal number ("12.5", "3"); the result is rounded
/// to whole cents.
///
/// ## Example
/// ```rust
/// use bookstock_core::fields::FieldValue;
/// use bookstock_core::validation::validate_price;
///
/// assert_eq!(validate_price(&"12.5".into()).unwrap().cents(), 1250);
/// assert_eq!(validate_price(&FieldValue::Integer(4)).unwrap().cents(), 400);
/// assert!(validate_price(&(-1.0).into()).is_err());
/// assert!(validate_price(&"twelve".into()).is_err());
/// ```
pub fn validate_price(value: &FieldValue) -> ValidationResult<Money> {
    let field = BookColumn::Price.label();

    let amount = match value {
        FieldValue::Integer(whole) => *whole as f64,
        FieldValue::Real(amount) => *amount,
        FieldValue::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::invalid(field, "must be a decimal number"))?,
    };

    if !amount.is_finite() {
        return Err(ValidationError::invalid(field, "must be a finite number"));
    }

    // Checked before rounding so that -0.004 is not accepted as 0.00
    if amount < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Money::from_decimal(amount).ok_or_else(|| ValidationError::invalid(field, "is too large"))
}

/// Validates a quantity: a non-negative whole number.
///
/// ## Example
/// ```rust
/// use bookstock_core::fields::FieldValue;
/// use bookstock_core::validation::validate_quantity;
///
/// assert_eq!(validate_quantity(&"7".into()).unwrap(), 7);
/// assert!(validate_quantity(&FieldValue::Integer(-1)).is_err());
/// assert!(validate_quantity(&"2.5".into()).is_err());
/// ```
pub fn validate_quantity(value: &FieldValue) -> ValidationResult<i64> {
    let field = BookColumn::Quantity.label();

    let quantity = match value {
        FieldValue::Integer(quantity) => *quantity,
        FieldValue::Real(_) => {
            return Err(ValidationError::invalid(field, "must be a whole number"));
        }
        FieldValue::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::invalid(field, "must be a whole number"))?,
    };

    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(quantity)
}

fn expect_text<'a>(field: &str, value: &'a FieldValue) -> ValidationResult<&'a str> {
    match value {
        FieldValue::Text(text) => Ok(text),
        _ => Err(ValidationError::invalid(field, "must be text")),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> FieldSet {
        FieldSet::new()
            .with_name("Dune")
            .with_price(12.5)
            .with_quantity(3)
            .with_supplier_phone("1234567890")
    }

    #[test]
    fn test_new_book_applies_defaults() {
        let fields = FieldSet::new()
            .with_name("  Dune  ")
            .with_supplier_phone("1234567890");

        let book = validate_new_book(&fields).unwrap();
        assert_eq!(book.name, "Dune");
        assert_eq!(book.price, Money::zero());
        assert_eq!(book.quantity, 0);
        assert_eq!(book.supplier_name, "");
    }

    #[test]
    fn test_new_book_keeps_supplied_values() {
        let book = validate_new_book(&valid_fields().with_supplier_name("Ace")).unwrap();
        assert_eq!(book.price.cents(), 1250);
        assert_eq!(book.quantity, 3);
        assert_eq!(book.supplier_name, "Ace");
    }

    #[test]
    fn test_name_required() {
        let missing = FieldSet::new().with_supplier_phone("1234567890");
        assert_eq!(
            validate_new_book(&missing),
            Err(ValidationError::required("name"))
        );

        for blank in ["", "   "] {
            let fields = valid_fields().with_name(blank);
            assert_eq!(
                validate_new_book(&fields),
                Err(ValidationError::required("name"))
            );
        }
    }

    #[test]
    fn test_name_checked_before_phone() {
        let fields = FieldSet::new().with_supplier_phone("123");
        assert_eq!(
            validate_new_book(&fields),
            Err(ValidationError::required("name"))
        );
    }

    #[test]
    fn test_supplier_phone_rules() {
        let missing = FieldSet::new().with_name("Dune");
        assert_eq!(
            validate_new_book(&missing),
            Err(ValidationError::required("supplier phone"))
        );

        let short = valid_fields().with_supplier_phone("123456789");
        assert!(matches!(
            validate_new_book(&short),
            Err(ValidationError::TooShort { min: 10, .. })
        ));

        // Padding does not count towards the length.
        let padded = valid_fields().with_supplier_phone("   12345   ");
        assert!(validate_new_book(&padded).is_err());
    }

    #[test]
    fn test_price_rules() {
        assert!(validate_new_book(&valid_fields().with_price(-0.01)).is_err());
        assert!(validate_new_book(&valid_fields().with_price("abc")).is_err());
        assert!(validate_new_book(&valid_fields().with_price(f64::NAN)).is_err());
        assert_eq!(
            validate_new_book(&valid_fields().with_price("0"))
                .unwrap()
                .price,
            Money::zero()
        );
    }

    #[test]
    fn test_price_sign_checked_before_rounding() {
        assert!(matches!(
            validate_price(&FieldValue::Real(-0.004)),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            validate_price(&"-0.001".into()),
            Err(ValidationError::Negative { .. })
        ));
        assert_eq!(validate_price(&FieldValue::Real(0.004)), Ok(Money::zero()));
    }

    #[test]
    fn test_price_out_of_range() {
        assert!(matches!(
            validate_price(&FieldValue::Real(1e300)),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_new_book(&valid_fields().with_price("1e300")),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_blank_optional_fields_take_defaults() {
        let fields = valid_fields()
            .with_price("")
            .with_quantity("  ")
            .with_supplier_name("");

        let book = validate_new_book(&fields).unwrap();
        assert_eq!(book.price, Money::zero());
        assert_eq!(book.quantity, 0);
        assert_eq!(book.supplier_name, "");
    }

    #[test]
    fn test_blank_optional_fields_left_unchanged() {
        let fields = FieldSet::new()
            .with_name("Dune Messiah")
            .with_price("")
            .with_quantity("")
            .with_supplier_name(" ");

        let changes = validate_changes(&fields).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Dune Messiah"));
        assert!(changes.price.is_none());
        assert!(changes.quantity.is_none());
        assert!(changes.supplier_name.is_none());

        let only_blanks = FieldSet::new().with_price("").with_quantity("");
        assert_eq!(validate_changes(&only_blanks), Err(ValidationError::NoChanges));
    }

    #[test]
    fn test_quantity_rules() {
        assert!(matches!(
            validate_new_book(&valid_fields().with_quantity(-1)),
            Err(ValidationError::Negative { .. })
        ));
        assert!(validate_new_book(&valid_fields().with_quantity("three")).is_err());
        assert!(validate_new_book(&valid_fields().with_quantity(1.5)).is_err());
        assert_eq!(
            validate_new_book(&valid_fields().with_quantity(" 12 "))
                .unwrap()
                .quantity,
            12
        );
    }

    #[test]
    fn test_non_text_name_rejected() {
        let fields = valid_fields().with_name(42);
        assert!(matches!(
            validate_new_book(&fields),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_id_cannot_be_supplied() {
        let fields = valid_fields().set(BookColumn::Id, 5);
        assert!(matches!(
            validate_new_book(&fields),
            Err(ValidationError::Immutable { .. })
        ));
        assert!(matches!(
            validate_changes(&fields),
            Err(ValidationError::Immutable { .. })
        ));
    }

    #[test]
    fn test_changes_only_touch_supplied_fields() {
        let changes = validate_changes(&FieldSet::new().with_quantity(5)).unwrap();
        assert_eq!(changes, BookChanges::quantity(5));
        assert!(changes.name.is_none());
        assert!(changes.price.is_none());
    }

    #[test]
    fn test_changes_validate_supplied_fields() {
        assert!(validate_changes(&FieldSet::new().with_name("")).is_err());
        assert!(validate_changes(&FieldSet::new().with_supplier_phone("555")).is_err());
        assert!(validate_changes(&FieldSet::new().with_price(-3)).is_err());
        assert!(validate_changes(&FieldSet::new().with_supplier_name("Ace")).is_ok());
    }

    #[test]
    fn test_empty_changes_rejected() {
        assert_eq!(
            validate_changes(&FieldSet::new()),
            Err(ValidationError::NoChanges)
        );
        assert!(BookChanges::default().is_empty());
    }
}
