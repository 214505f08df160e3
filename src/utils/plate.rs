//! Normalización de placas
//!
//! Las placas egipcias se escriben con dígitos occidentales o arábigo-índicos
//! (٠١٢٣٤٥٦٧٨٩). Se guardan tal como se escribieron, pero las búsquedas
//! comparan siempre la forma normalizada.

const ARABIC_INDIC_ZERO: u32 = '٠' as u32;

/// Reemplaza los dígitos arábigo-índicos por dígitos occidentales.
pub fn normalize_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '٠'..='٩' => char::from_digit(c as u32 - ARABIC_INDIC_ZERO, 10).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Reemplaza los dígitos occidentales por dígitos arábigo-índicos.
pub fn to_arabic_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => char::from_u32(ARABIC_INDIC_ZERO + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Forma de almacenamiento de una placa de lavado: recortada y en mayúsculas.
pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Forma de comparación: dígitos occidentales, recortada y en mayúsculas.
pub fn search_key(value: &str) -> String {
    normalize_digits(value.trim()).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arabic_digits_become_western() {
        assert_eq!(normalize_digits("أ ب ج ١٢٣٤"), "أ ب ج 1234");
        assert_eq!(normalize_digits("٠٩"), "09");
    }

    #[test]
    fn western_digits_become_arabic() {
        assert_eq!(to_arabic_digits("ABC 1234"), "ABC ١٢٣٤");
    }

    #[test]
    fn plate_is_trimmed_and_uppercased() {
        assert_eq!(normalize_plate("  xyz 123 "), "XYZ 123");
    }

    #[test]
    fn search_key_ignores_case_and_numerals() {
        assert_eq!(search_key("abc١٢٣٤"), search_key("ABC1234"));
        assert_eq!(search_key(" abc1234 "), "ABC1234");
    }
}
