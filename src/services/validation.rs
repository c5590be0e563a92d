use crate::{
    error::{AppError, AppResult},
    models::DESCRIPTION_MAX_LEN,
};

pub(crate) fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn description(value: Option<String>) -> AppResult<Option<String>> {
    match value {
        Some(text) if text.chars().count() > DESCRIPTION_MAX_LEN => Err(AppError::Validation(
            format!("Description must be at most {DESCRIPTION_MAX_LEN} characters"),
        )),
        other => Ok(other),
    }
}

pub(crate) fn price(value: f64) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::Validation("Price must be a finite number".into()));
    }
    if value < 0.0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }
    Ok(value)
}

pub(crate) fn stock_quantity(value: Option<i32>) -> AppResult<Option<i32>> {
    match value {
        Some(stock) if stock < 0 => Err(AppError::Validation(
            "Stock quantity must not be negative".into(),
        )),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected_and_trimmed_otherwise() {
        assert!(required_text("Name", "   ").is_err());
        assert_eq!(required_text("Name", " Laptop ").unwrap(), "Laptop");
    }

    #[test]
    fn price_must_be_finite_and_non_negative() {
        assert_eq!(price(0.0).unwrap(), 0.0);
        assert!(price(-0.01).unwrap_err().to_string().contains("Price"));
        assert!(price(f64::NAN).is_err());
        assert!(price(f64::INFINITY).is_err());
    }

    #[test]
    fn description_length_is_bounded() {
        let long = "x".repeat(DESCRIPTION_MAX_LEN + 1);
        assert!(description(Some(long)).is_err());
        assert!(description(Some("x".repeat(DESCRIPTION_MAX_LEN))).is_ok());
        assert_eq!(description(None).unwrap(), None);
    }

    #[test]
    fn stock_may_be_unknown_but_not_negative() {
        assert_eq!(stock_quantity(None).unwrap(), None);
        assert!(stock_quantity(Some(-1)).is_err());
    }
}
