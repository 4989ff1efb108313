//! Utilidades de validación
//!
//! Validadores custom usados por los derives de `validator` en los requests
//! de vehículos.

use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    // Formato básico: ABC-1234 o similar
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.len() < 4 || clean_plate.len() > 10 {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    if !clean_plate.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"letters, digits, spaces or dashes".to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Ford").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("ABC-1234").is_ok());
        assert!(validate_license_plate("XY 56 78").is_ok());
        assert!(validate_license_plate("A1").is_err());
        assert!(validate_license_plate("ABCDEFGHIJKL").is_err());
        assert!(validate_license_plate("AB#1234").is_err());
    }
}
