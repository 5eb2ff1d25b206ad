use crate::error::{PhoneField, WabaError};
use regex::Regex;
use std::sync::OnceLock;

/// 1 to 15 digits, optional leading `+`, first digit non-zero.
pub fn is_valid_phone_number(number: &str) -> bool {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[1-9][0-9]{0,14}$").unwrap());
    regex.is_match(number)
}

/// Exactly two lowercase letters, an underscore, two uppercase letters.
pub fn is_valid_language_code(code: &str) -> bool {
    static LANG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = LANG_REGEX.get_or_init(|| Regex::new(r"^[a-z]{2}_[A-Z]{2}$").unwrap());
    regex.is_match(code)
}

pub(crate) fn check_phone_number(field: PhoneField, number: &str) -> Result<(), WabaError> {
    if is_valid_phone_number(number) {
        Ok(())
    } else {
        Err(WabaError::InvalidPhoneNumber {
            field,
            number: number.to_owned(),
        })
    }
}

pub(crate) fn check_language_code(code: &str) -> Result<(), WabaError> {
    if is_valid_language_code(code) {
        Ok(())
    } else {
        Err(WabaError::InvalidLanguageCode {
            code: code.to_owned(),
        })
    }
}
