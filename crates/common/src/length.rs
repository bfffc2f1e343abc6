use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unit a [`Length`] is authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Meter,
    Kilometer,
    AstronomicalUnit,
    LightYear,
    Parsec,
}

impl LengthUnit {
    /// Number of metres in one unit.
    pub fn meters(self) -> f64 {
        match self {
            Self::Meter => 1.0,
            Self::Kilometer => 1.0e3,
            Self::AstronomicalUnit => 1.495_978_707e11,
            Self::LightYear => 9.460_730_472_580_8e15,
            Self::Parsec => 3.085_677_581_491_367e16,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::AstronomicalUnit => "au",
            Self::LightYear => "ly",
            Self::Parsec => "pc",
        }
    }
}

/// Error returned when a unit symbol is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown length unit: {0}")]
pub struct ParseLengthUnitError(pub String);

impl FromStr for LengthUnit {
    type Err = ParseLengthUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(Self::Meter),
            "km" | "kilometer" | "kilometers" => Ok(Self::Kilometer),
            "au" | "astronomical_unit" => Ok(Self::AstronomicalUnit),
            "ly" | "light_year" => Ok(Self::LightYear),
            "pc" | "parsec" => Ok(Self::Parsec),
            other => Err(ParseLengthUnitError(other.to_string())),
        }
    }
}

/// A distance authored in some unit. Arithmetic always happens in metres.
///
/// Deserializes either from a bare number (metres) or from
/// `{ value, unit }`, so scene files can write `radius: 150` or
/// `radius: { value: 1.0, unit: astronomical_unit }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LengthRepr", into = "LengthRepr")]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn meters(value: f64) -> Self {
        Self::new(value, LengthUnit::Meter)
    }

    /// Value converted to metres.
    pub fn to_meters(self) -> f64 {
        self.value * self.unit.meters()
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::meters(1.0)
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Self::meters(value)
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Meters(f64),
    Unit {
        value: f64,
        #[serde(default)]
        unit: LengthUnit,
    },
}

impl From<LengthRepr> for Length {
    fn from(repr: LengthRepr) -> Self {
        match repr {
            LengthRepr::Meters(value) => Self::meters(value),
            LengthRepr::Unit { value, unit } => Self::new(value, unit),
        }
    }
}

impl From<Length> for LengthRepr {
    fn from(length: Length) -> Self {
        match length.unit {
            LengthUnit::Meter => Self::Meters(length.value),
            unit => Self::Unit {
                value: length.value,
                unit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meters_are_identity() {
        assert_eq!(Length::meters(42.0).to_meters(), 42.0);
    }

    #[test]
    fn astronomical_unit_conversion() {
        let l = Length::new(2.0, LengthUnit::AstronomicalUnit);
        assert_eq!(l.to_meters(), 2.0 * 1.495_978_707e11);
    }

    #[test]
    fn parse_unit_symbols() {
        assert_eq!("km".parse::<LengthUnit>(), Ok(LengthUnit::Kilometer));
        assert_eq!(" AU ".parse::<LengthUnit>(), Ok(LengthUnit::AstronomicalUnit));
        assert!("furlong".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn display_uses_symbol() {
        assert_eq!(Length::new(1.5, LengthUnit::LightYear).to_string(), "1.5 ly");
    }
}
