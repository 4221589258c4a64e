//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! usadas por los custom validators de los DTOs.

use validator::ValidationError;

/// Tamaños de parcel permitidos.
pub const ALLOWED_SIZES: [&str; 3] = ["small", "medium", "large"];

/// Categorías de delicadeza permitidas.
pub const ALLOWED_DELICACIES: [&str; 2] = ["fragile", "non-fragile"];

/// Validar que el tamaño esté dentro del set permitido.
pub fn validate_size(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, &ALLOWED_SIZES, "size")
}

/// Validar que la delicadeza esté dentro del set permitido.
pub fn validate_delicacy(value: &str) -> Result<(), ValidationError> {
    validate_one_of(value, &ALLOWED_DELICACIES, "delicacy")
}

/// Validar que el peso sea estrictamente positivo.
pub fn validate_weight(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        let mut error = ValidationError::new("weight");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Envolver un ValidationError suelto en el contenedor que espera AppError.
pub fn field_errors(
    field: &'static str,
    error: ValidationError,
) -> validator::ValidationErrors {
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);
    errors
}

fn validate_one_of(
    value: &str,
    allowed: &[&str],
    code: &'static str,
) -> Result<(), ValidationError> {
    if !allowed.contains(&value) {
        let mut error = ValidationError::new(code);
        error.add_param("value".into(), &value.to_string());
        error.add_param("allowed_values".into(), &format!("{:?}", allowed));
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_must_be_in_allowed_set() {
        assert!(validate_size("small").is_ok());
        assert!(validate_size("medium").is_ok());
        assert!(validate_size("large").is_ok());
        assert!(validate_size("gigantic").is_err());
    }

    #[test]
    fn delicacy_must_be_in_allowed_set() {
        assert!(validate_delicacy("fragile").is_ok());
        assert!(validate_delicacy("non-fragile").is_ok());
        assert!(validate_delicacy("indestructible").is_err());
    }

    #[test]
    fn weight_must_be_positive() {
        assert!(validate_weight(2.5).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-1.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

}
