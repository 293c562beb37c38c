//! Descriptive labels for corrected readings
//!
//! Pure threshold mappings, evaluated on corrected values. Lower bounds are
//! inclusive, upper bounds exclusive, except the humidity comfort band which
//! excludes both ends.
//!
//! ```text
//! Pressure (hPa)   storm <970 ≤ rain <990 ≤ change <1010 ≤ fair <1030 ≤ dry
//! Humidity (%)     good when 40 < h < 60, bad otherwise
//! Light (lux)      dark <20 ≤ dim <100 ≤ light <500 ≤ bright
//! ```

use core::fmt;

use crate::constants::thresholds::*;

/// Barometer-style weather descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressureLabel {
    /// Below 970 hPa
    Storm,
    /// 970 to 990 hPa
    Rain,
    /// 990 to 1010 hPa
    Change,
    /// 1010 to 1030 hPa
    Fair,
    /// 1030 hPa and above
    Dry,
}

impl PressureLabel {
    /// Classify a pressure in hPa
    pub fn from_hpa(pressure: f32) -> Self {
        if pressure < PRESSURE_STORM_BELOW_HPA {
            Self::Storm
        } else if pressure < PRESSURE_RAIN_BELOW_HPA {
            Self::Rain
        } else if pressure < PRESSURE_CHANGE_BELOW_HPA {
            Self::Change
        } else if pressure < PRESSURE_FAIR_BELOW_HPA {
            Self::Fair
        } else {
            Self::Dry
        }
    }

    /// Lower-case descriptor
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Storm => "storm",
            Self::Rain => "rain",
            Self::Change => "change",
            Self::Fair => "fair",
            Self::Dry => "dry",
        }
    }

    /// Display descriptor
    pub fn upper(self) -> &'static str {
        match self {
            Self::Storm => "STORM",
            Self::Rain => "RAIN",
            Self::Change => "CHANGE",
            Self::Fair => "FAIR",
            Self::Dry => "DRY",
        }
    }

    /// Icon asset name
    pub fn icon(self) -> &'static str {
        match self {
            Self::Storm => "weather-storm",
            Self::Rain => "weather-rain",
            Self::Change => "weather-change",
            Self::Fair => "weather-fair",
            Self::Dry => "weather-dry",
        }
    }
}

/// Comfort descriptor for relative humidity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HumidityLabel {
    /// Strictly between 40 % and 60 %
    Good,
    /// Anything else
    Bad,
}

impl HumidityLabel {
    /// Classify a relative humidity in %
    pub fn from_percent(humidity: f32) -> Self {
        if humidity > HUMIDITY_GOOD_ABOVE_PCT && humidity < HUMIDITY_GOOD_BELOW_PCT {
            Self::Good
        } else {
            Self::Bad
        }
    }

    /// Lower-case descriptor
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }

    /// Display descriptor
    pub fn upper(self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Bad => "BAD",
        }
    }

    /// Icon asset name
    pub fn icon(self) -> &'static str {
        match self {
            Self::Good => "humidity-good",
            Self::Bad => "humidity-bad",
        }
    }
}

/// Ambient light descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightLabel {
    /// Below 20 lux
    Dark,
    /// 20 to 100 lux
    Dim,
    /// 100 to 500 lux
    Light,
    /// 500 lux and above
    Bright,
}

impl LightLabel {
    /// Classify an illuminance in lux
    pub fn from_lux(light: f32) -> Self {
        if light < LIGHT_DARK_BELOW_LUX {
            Self::Dark
        } else if light < LIGHT_DIM_BELOW_LUX {
            Self::Dim
        } else if light < LIGHT_LIGHT_BELOW_LUX {
            Self::Light
        } else {
            Self::Bright
        }
    }

    /// Lower-case descriptor
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Dim => "dim",
            Self::Light => "light",
            Self::Bright => "bright",
        }
    }

    /// Display descriptor
    pub fn upper(self) -> &'static str {
        match self {
            Self::Dark => "DARK",
            Self::Dim => "DIM",
            Self::Light => "LIGHT",
            Self::Bright => "BRIGHT",
        }
    }

    /// Icon asset name
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "bulb-dark",
            Self::Dim => "bulb-dim",
            Self::Light => "bulb-light",
            Self::Bright => "bulb-bright",
        }
    }
}

impl fmt::Display for PressureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HumidityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LightLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_boundaries() {
        assert_eq!(PressureLabel::from_hpa(969.9), PressureLabel::Storm);
        assert_eq!(PressureLabel::from_hpa(970.0), PressureLabel::Rain);
        assert_eq!(PressureLabel::from_hpa(989.9), PressureLabel::Rain);
        assert_eq!(PressureLabel::from_hpa(990.0), PressureLabel::Change);
        assert_eq!(PressureLabel::from_hpa(1010.0), PressureLabel::Fair);
        assert_eq!(PressureLabel::from_hpa(1029.9), PressureLabel::Fair);
        assert_eq!(PressureLabel::from_hpa(1030.0), PressureLabel::Dry);
    }

    #[test]
    fn humidity_band_excludes_both_ends() {
        assert_eq!(HumidityLabel::from_percent(40.0), HumidityLabel::Bad);
        assert_eq!(HumidityLabel::from_percent(40.1), HumidityLabel::Good);
        assert_eq!(HumidityLabel::from_percent(59.9), HumidityLabel::Good);
        assert_eq!(HumidityLabel::from_percent(60.0), HumidityLabel::Bad);
        assert_eq!(HumidityLabel::from_percent(95.0), HumidityLabel::Bad);
    }

    #[test]
    fn light_boundaries() {
        assert_eq!(LightLabel::from_lux(0.0), LightLabel::Dark);
        assert_eq!(LightLabel::from_lux(19.99), LightLabel::Dark);
        assert_eq!(LightLabel::from_lux(20.0), LightLabel::Dim);
        assert_eq!(LightLabel::from_lux(100.0), LightLabel::Light);
        assert_eq!(LightLabel::from_lux(499.0), LightLabel::Light);
        assert_eq!(LightLabel::from_lux(500.0), LightLabel::Bright);
    }

    #[test]
    fn icons_follow_their_own_channel() {
        assert_eq!(HumidityLabel::Good.icon(), "humidity-good");
        assert_eq!(LightLabel::Dim.icon(), "bulb-dim");
        assert_eq!(PressureLabel::Fair.icon(), "weather-fair");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", PressureLabel::Change), "change");
        assert_eq!(format!("{}", LightLabel::Bright), "bright");
        assert_eq!(HumidityLabel::Bad.upper(), "BAD");
    }
}
