use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use super::IntakeError;

pub const IMEI_LENGTH: usize = 15;
pub const TAC_LENGTH: usize = 8;

/// Which identifier a session scans, and therefore which device table it fills.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IdentifierKind {
    /// 15-digit IMEI
    Cellular,
    /// Free-form manufacturer serial number
    Serial,
}

impl IdentifierKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cellular => "IMEI",
            Self::Serial => "serial number",
        }
    }

    pub fn capitalized_label(&self) -> &'static str {
        match self {
            Self::Cellular => "IMEI",
            Self::Serial => "Serial number",
        }
    }

    pub fn with_article(&self) -> &'static str {
        match self {
            Self::Cellular => "an IMEI",
            Self::Serial => "a serial number",
        }
    }

    /// Trims raw scanner input and checks it against the kind's format.
    pub fn normalize(&self, raw: &str) -> Result<String, IntakeError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(IntakeError::EmptyIdentifier(*self));
        }
        match self {
            Self::Cellular if !is_valid_imei(value) => Err(IntakeError::InvalidImei),
            _ => Ok(value.to_string()),
        }
    }
}

/// Exactly 15 ASCII digits.
pub fn is_valid_imei(value: &str) -> bool {
    value.len() == IMEI_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// Type Allocation Code: the first eight digits of an IMEI.
pub fn tac_prefix(imei: &str) -> Option<&str> {
    if is_valid_imei(imei) {
        imei.get(..TAC_LENGTH)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("356938035643809", true)]
    #[case("35693803564380", false)]
    #[case("3569380356438090", false)]
    #[case("35693803564380A", false)]
    #[case("35693803564380٩", false)]
    #[case("", false)]
    fn imei_format(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(is_valid_imei(input), valid);
    }

    #[rstest]
    #[case("  356938035643809 ", Ok("356938035643809".to_string()))]
    #[case("12345", Err(IntakeError::InvalidImei))]
    #[case("   ", Err(IntakeError::EmptyIdentifier(IdentifierKind::Cellular)))]
    fn cellular_normalize(#[case] input: &str, #[case] expected: Result<String, IntakeError>) {
        assert_eq!(IdentifierKind::Cellular.normalize(input), expected);
    }

    #[test]
    fn serial_is_accepted_unvalidated() {
        assert_eq!(
            IdentifierKind::Serial.normalize(" C02XK1ABJG5H ").unwrap(),
            "C02XK1ABJG5H"
        );
        assert_eq!(
            IdentifierKind::Serial.normalize("x").unwrap(),
            "x"
        );
        assert_eq!(
            IdentifierKind::Serial.normalize(""),
            Err(IntakeError::EmptyIdentifier(IdentifierKind::Serial))
        );
    }

    #[test]
    fn tac_is_first_eight_digits() {
        assert_eq!(tac_prefix("356938035643809"), Some("35693803"));
        assert_eq!(tac_prefix("3569"), None);
    }

    #[test]
    fn kind_round_trips_through_strum() {
        assert_eq!("cellular".parse::<IdentifierKind>().unwrap(), IdentifierKind::Cellular);
        assert_eq!(IdentifierKind::Serial.to_string(), "serial");
    }
}
