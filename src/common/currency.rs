// src/common/currency.rs

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const CURRENCY_MARKERS: [&str; 2] = ["R$ ", "R$"];

/// Converte um texto monetário brasileiro ("R$ 1.234,56", "R$1.234,56", "-R$ 10,00")
/// em `Decimal`. Retorna `None` quando o texto não é um número válido.
pub fn parse_brl(raw: &str) -> Option<Decimal> {
    let stripped = CURRENCY_MARKERS
        .iter()
        .fold(raw.to_string(), |acc, marker| acc.replace(marker, ""));
    parse_locale_number(&stripped)
}

/// Número em formato pt-BR: vírgula decimal e ponto como separador de milhar.
/// Sem vírgula, o texto é lido como está ("1234.56").
pub fn parse_locale_number(raw: &str) -> Option<Decimal> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let normalized = match text.split_once(',') {
        None => text.to_string(),
        Some((int_part, frac_part)) => {
            if frac_part.contains(',') || frac_part.contains('.') {
                return None;
            }
            format!("{}.{}", strip_thousands(int_part)?, frac_part)
        }
    };

    if normalized.contains('_') {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

// "1.234.567" -> "1234567"; grupos após o primeiro precisam ter 3 dígitos
fn strip_thousands(int_part: &str) -> Option<String> {
    let mut groups = int_part.split('.');
    let first = groups.next()?;
    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

/// Formata como o texto do faturamento total: "R$ 1,234.56".
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("R$ {}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parses_with_and_without_space_after_marker() {
        assert_eq!(parse_brl("R$ 1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_brl("R$1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_brl("R$ 10,00"), Some(dec("10.00")));
    }

    #[test]
    fn keeps_sign() {
        assert_eq!(parse_brl("-R$ 10,50"), Some(dec("-10.50")));
        assert_eq!(parse_brl("R$ -3,00"), Some(dec("-3.00")));
    }

    #[test]
    fn plain_numbers_pass_through() {
        assert_eq!(parse_brl("1234.56"), Some(dec("1234.56")));
        assert_eq!(parse_brl(" 42 "), Some(dec("42")));
        assert_eq!(parse_brl("R$ 1.234.567,89"), Some(dec("1234567.89")));
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(parse_brl(""), None);
        assert_eq!(parse_brl("R$ "), None);
        assert_eq!(parse_brl("R$ 1,2,3"), None);
        assert_eq!(parse_brl("1.2.3"), None);
        assert_eq!(parse_brl("R$ 12.34,5.6"), None);
        assert_eq!(parse_brl("R$ 1.23,00"), None);
        assert_eq!(parse_brl("dez reais"), None);
    }

    #[test]
    fn formats_grand_total() {
        assert_eq!(format_brl(dec("1234.56")), "R$ 1,234.56");
        assert_eq!(format_brl(dec("15")), "R$ 15.00");
        assert_eq!(format_brl(dec("999.999")), "R$ 1,000.00");
        assert_eq!(format_brl(dec("-1234567.5")), "R$ -1,234,567.50");
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0.00");
    }
}
