//! Generación de identificadores públicos
//!
//! Tracking numbers, branch codes y employee ids: prefijo + timestamp en
//! base36 + sufijo aleatorio. URL-safe y fácil de transcribir. La unicidad
//! real la garantiza el UNIQUE constraint de la base de datos; el sufijo
//! aleatorio solo hace improbable la colisión entre creaciones concurrentes
//! dentro del mismo milisegundo.

use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 4;

/// Generar un tracking number: `DX` + millis base36 + 4 chars aleatorios.
pub fn generate_tracking_number() -> String {
    format!("DX{}{}", timestamp_base36(), random_suffix())
}

/// Generar un branch code: `BR` + millis base36.
pub fn generate_branch_code() -> String {
    format!("BR{}{}", timestamp_base36(), random_suffix())
}

/// Generar un employee id: `EMP` + millis base36.
pub fn generate_employee_id() -> String {
    format!("EMP{}{}", timestamp_base36(), random_suffix())
}

fn timestamp_base36() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    to_base36(millis as u64)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(SUFFIX_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tracking_number_has_expected_shape() {
        let tracking = generate_tracking_number();
        assert!(tracking.starts_with("DX"));
        assert!(tracking.len() > 2 + SUFFIX_LEN);
        assert!(tracking.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tracking_numbers_are_url_safe() {
        let tracking = generate_tracking_number();
        assert!(!tracking.contains(['/', '?', '#', '%', ' ']));
    }

    #[test]
    fn generations_in_distinct_milliseconds_are_distinct() {
        // El prefijo base36 cambia con el milisegundo, así que generaciones
        // en milisegundos distintos difieren siempre. Dentro del mismo
        // milisegundo el sufijo puede colisionar; eso lo resuelve el UNIQUE
        // de la base con reintento, no el generador.
        let mut generated = HashSet::new();
        for _ in 0..20 {
            generated.insert(generate_tracking_number());
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert_eq!(generated.len(), 20);
    }

    #[test]
    fn base36_round_numbers() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn branch_and_employee_prefixes() {
        assert!(generate_branch_code().starts_with("BR"));
        assert!(generate_employee_id().starts_with("EMP"));
    }
}
