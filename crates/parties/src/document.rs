//! Brazilian tax document format checks (CPF for people, CNPJ for companies).
//!
//! Only the shape is checked: digit count, and not every digit the same. Check
//! digits are not verified.

use bloomshop_core::{ShopError, ShopResult, require_non_empty};

const CPF_DIGITS: usize = 11;
const CNPJ_DIGITS: usize = 14;

/// Keep only ASCII digits, so "123.456.789-01" and "12345678901" compare equal.
pub fn normalize(document: &str) -> String {
    document.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn same_document(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

pub fn validate_cpf(cpf: &str) -> ShopResult<()> {
    validate_shape("cpf", cpf, CPF_DIGITS)
}

pub fn validate_cnpj(cnpj: &str) -> ShopResult<()> {
    validate_shape("cnpj", cnpj, CNPJ_DIGITS)
}

fn validate_shape(field: &str, raw: &str, expected_len: usize) -> ShopResult<()> {
    require_non_empty(field, raw)?;
    let digits = normalize(raw);
    if digits.len() != expected_len {
        return Err(ShopError::validation(format!(
            "{field} must have {expected_len} digits, got {}",
            digits.len()
        )));
    }
    let first = digits.as_bytes()[0];
    if digits.bytes().all(|b| b == first) {
        return Err(ShopError::validation(format!(
            "{field} cannot repeat a single digit"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_accepts_punctuated_and_bare_forms() {
        assert!(validate_cpf("123.456.789-01").is_ok());
        assert!(validate_cpf("12345678901").is_ok());
        assert!(same_document("123.456.789-01", "12345678901"));
    }

    #[test]
    fn cpf_rejects_wrong_length_and_repeated_digits() {
        assert!(matches!(validate_cpf("1234"), Err(ShopError::Validation(_))));
        assert!(matches!(validate_cpf("111.111.111-11"), Err(ShopError::Validation(_))));
        assert!(matches!(validate_cpf(""), Err(ShopError::Validation(_))));
    }

    #[test]
    fn cnpj_requires_fourteen_digits() {
        assert!(validate_cnpj("12.345.678/0001-90").is_ok());
        assert!(validate_cnpj("123.456.789-01").is_err());
    }
}
