//! Request validation for catalog payloads.

mod validation;
pub use validation::{
    require_fields, validate, FieldKind, FieldRule, Shape, Violation, CATEGORY_SHAPE, GOOD_SHAPE,
    GOOD_UPDATE_SHAPE,
};
