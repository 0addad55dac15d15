//! Digit conversion between Persian, Arabic-Indic and ASCII numerals.

use crate::i18n::Locale;

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
const ARABIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Persian thousands separator (U+066C).
const PERSIAN_GROUP_SEPARATOR: char = '٬';

/// Target digit system for [`convert_numerals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumeralSystem {
    /// `۰`–`۹`
    Persian,
    /// ASCII `0`–`9`
    English,
}

impl NumeralSystem {
    /// Digits used when rendering for a locale.
    pub fn for_locale(locale: Locale) -> NumeralSystem {
        match locale.code() {
            "fa" => NumeralSystem::Persian,
            _ => NumeralSystem::English,
        }
    }
}

/// Convert digits in `text` to the target system.
///
/// Converting to English maps both Persian and Arabic-Indic digits to ASCII.
/// Converting to Persian maps ASCII digits only. Every other character passes
/// through untouched.
pub fn convert_numerals(text: &str, to: NumeralSystem) -> String {
    text.chars()
        .map(|c| match to {
            NumeralSystem::Persian => c
                .to_digit(10)
                .filter(|_| c.is_ascii_digit())
                .map(|d| PERSIAN_DIGITS[d as usize])
                .unwrap_or(c),
            NumeralSystem::English => digit_value(c)
                .and_then(|d| char::from_digit(d, 10))
                .unwrap_or(c),
        })
        .collect()
}

fn digit_value(c: char) -> Option<u32> {
    PERSIAN_DIGITS
        .iter()
        .position(|&d| d == c)
        .or_else(|| ARABIC_DIGITS.iter().position(|&d| d == c))
        .map(|i| i as u32)
}

/// Format an integer with thousands grouping for a locale.
///
/// `en` renders `1,234,567`; `fa` renders `۱٬۲۳۴٬۵۶۷`.
pub fn format_number(n: i64, locale: Locale) -> String {
    let system = NumeralSystem::for_locale(locale);
    let separator = match system {
        NumeralSystem::Persian => PERSIAN_GROUP_SEPARATOR,
        NumeralSystem::English => ',',
    };

    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }

    convert_numerals(&grouped, system)
}
