//! HTTP handlers for categories and goods.

pub mod categories;
pub mod goods;
pub use categories::*;
pub use goods::*;

use crate::error::AppError;
use crate::service::{require_fields, validate, Shape};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn parse_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}': expected an integer", id_str)))
}

/// Presence check, then shape validation of the whole payload, then typed decode.
fn checked_payload<T: DeserializeOwned>(
    body: serde_json::Map<String, Value>,
    required: &[&str],
    shape: &Shape,
) -> Result<T, AppError> {
    require_fields(&body, required)?;
    let payload = Value::Object(body);
    validate(shape, &payload)?;
    serde_json::from_value(payload).map_err(|e| AppError::BadRequest(format!("{} payload: {}", shape.name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewGood;
    use crate::service::GOOD_SHAPE;
    use serde_json::json;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("1.5"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("99999999999"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn presence_is_checked_before_shape() {
        let Value::Object(body) = json!({"product_name": 7}) else { unreachable!() };
        match checked_payload::<NewGood>(body, &["product_name", "category_id"], &GOOD_SHAPE) {
            Err(AppError::Validation(v)) => {
                assert_eq!(v.len(), 1);
                assert_eq!(v[0].field, "category_id");
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn valid_payload_decodes_with_optional_price() {
        let Value::Object(body) = json!({"product_name": "Milk", "category_id": 3, "note": "x"}) else {
            unreachable!()
        };
        let good: NewGood = checked_payload(body, &["product_name", "category_id"], &GOOD_SHAPE).unwrap();
        assert_eq!(good.product_name, "Milk");
        assert_eq!(good.category_id, 3);
        assert_eq!(good.price, None);
    }
}
