//! Figure sizing: journal column widths, ratio strings and scaling.

use std::{fmt::{Display, Formatter}, str::FromStr};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use crate::Error;

/// Centimetres per inch, the conversion Matplotlib sizes are quoted in.
pub const CM_PER_INCH: f64 = 0.3937008;

/// A proportion written `"a:b"`, e.g. the `"16:9"` of an aspect ratio.
///
/// Both parts must be positive and finite.  `Ratio` parses from and
/// displays as the `"a:b"` string form, also in JSON:
///
/// ```
/// use pubplot::Ratio;
/// let r: Ratio = "16:9".parse()?;
/// assert_eq!(r.factor(), 16. / 9.);
/// assert_eq!(r.to_string(), "16:9");
/// # Ok::<(), pubplot::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratio {
    num: f64,
    den: f64,
}

impl Ratio {
    pub fn new(num: f64, den: f64) -> Result<Ratio, Error> {
        if num > 0. && num.is_finite() && den > 0. && den.is_finite() {
            Ok(Ratio { num, den })
        } else {
            Err(Error::InvalidRatio(format!("{num}:{den}")))
        }
    }

    /// The ratio as a single factor, `a / b`.
    pub fn factor(&self) -> f64 {
        self.num / self.den
    }
}

/// `1:1`.
impl Default for Ratio {
    fn default() -> Self {
        Ratio { num: 1., den: 1. }
    }
}

impl FromStr for Ratio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidRatio(s.to_string());
        let (num, den) = s.split_once(':').ok_or_else(invalid)?;
        let num: f64 = num.trim().parse().map_err(|_| invalid())?;
        let den: f64 = den.trim().parse().map_err(|_| invalid())?;
        Ratio::new(num, den).map_err(|_| invalid())
    }
}

impl Display for Ratio {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}:{}", self.num, self.den)
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Which journal column layout the figure is sized for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,
         Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Single,
    Double,
}

/// Size and resolution of a figure.
///
/// The width in inches is derived from the active column width (in
/// centimetres) scaled by [`width_ratio`](FigureFormat::width_ratio),
/// the height from the width via
/// [`aspect_ratio`](FigureFormat::aspect_ratio); explicit
/// [`width`](FigureFormat::width) / [`height`](FigureFormat::height)
/// values (in inches) short-circuit the derivation.  Both dimensions
/// are then multiplied by the upscaling and compression factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureFormat {
    pub column_type: ColumnType,
    /// Width of a single journal column, in centimetres.
    pub single_column_width: f64,
    /// Width of a double journal column, in centimetres.
    pub double_column_width: f64,
    /// Fraction of the column width the figure occupies.
    pub width_ratio: Ratio,
    /// Width over height.
    pub aspect_ratio: Ratio,
    /// Explicit width in inches, overriding the derivation.
    pub width: Option<f64>,
    /// Explicit height in inches, overriding the derivation.
    pub height: Option<f64>,
    pub compress_width: f64,
    pub compress_height: f64,
    /// Scales both dimensions, e.g. `2.` renders at double size.
    pub upscaling_factor: f64,
    pub dpi: f64,
    /// Relative row heights of a multi-panel grid; `None` means equal.
    pub grid_height_ratios: Option<Vec<f64>>,
    /// Relative column widths of a multi-panel grid; `None` means equal.
    pub grid_width_ratios: Option<Vec<f64>>,
}

impl Default for FigureFormat {
    fn default() -> Self {
        FigureFormat {
            column_type: ColumnType::Single,
            single_column_width: 8.3,
            double_column_width: 17.1,
            width_ratio: Ratio::default(),
            aspect_ratio: Ratio::default(),
            width: None,
            height: None,
            compress_width: 1.,
            compress_height: 1.,
            upscaling_factor: 1.,
            dpi: 600.,
            grid_height_ratios: None,
            grid_width_ratios: None,
        }
    }
}

impl FigureFormat {
    /// Width of the active column, in centimetres.
    pub fn column_width_cm(&self) -> f64 {
        match self.column_type {
            ColumnType::Single => self.single_column_width,
            ColumnType::Double => self.double_column_width,
        }
    }

    /// Width in inches, before scaling.
    pub fn width_in(&self) -> f64 {
        match self.width {
            Some(width) => width,
            None => self.column_width_cm() * CM_PER_INCH
                    * self.width_ratio.factor(),
        }
    }

    /// Height in inches for the given `width`, before scaling.
    pub fn height_in(&self, width: f64) -> f64 {
        match self.height {
            Some(height) => height,
            None => width / self.aspect_ratio.factor(),
        }
    }

    /// Apply the upscaling and compression factors to a derived size.
    pub fn scaled(&self, width: f64, height: f64) -> (f64, f64) {
        (width * self.upscaling_factor * self.compress_width,
         height * self.upscaling_factor * self.compress_height)
    }

    /// The final figure size `(width, height)` in inches.
    pub fn size(&self) -> Result<(f64, f64), Error> {
        self.validate()?;
        let width = self.width_in();
        let height = self.height_in(width);
        Ok(self.scaled(width, height))
    }

    /// Check that every dimension and factor is positive and finite.
    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("single_column_width", self.single_column_width),
            ("double_column_width", self.double_column_width),
            ("compress_width", self.compress_width),
            ("compress_height", self.compress_height),
            ("upscaling_factor", self.upscaling_factor),
            ("dpi", self.dpi),
        ];
        for (name, value) in positive {
            if !(value > 0. && value.is_finite()) {
                return Err(Error::InvalidOption(
                    format!("{name} must be positive, got {value}")));
            }
        }
        for (name, value) in [("width", self.width),
                              ("height", self.height)] {
            if let Some(value) = value {
                if !(value > 0. && value.is_finite()) {
                    return Err(Error::InvalidOption(
                        format!("{name} must be positive, got {value}")));
                }
            }
        }
        for (name, ratios) in [
            ("grid_height_ratios", &self.grid_height_ratios),
            ("grid_width_ratios", &self.grid_width_ratios),
        ] {
            if let Some(ratios) = ratios {
                if ratios.is_empty() {
                    return Err(Error::InvalidOption(
                        format!("{name} must not be empty")));
                }
                if ratios.iter().any(|r| !(*r > 0. && r.is_finite())) {
                    return Err(Error::InvalidOption(
                        format!("{name} entries must be positive")));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_parses_and_displays() -> Result<(), Error> {
        let r: Ratio = "3:2".parse()?;
        assert_eq!(r.factor(), 1.5);
        assert_eq!(r.to_string(), "3:2");
        let r: Ratio = " 1.5 : 2 ".parse()?;
        assert_eq!(r.factor(), 0.75);
        Ok(())
    }

    #[test]
    fn bad_ratios_are_rejected() {
        for s in ["", "1", "1:", ":2", "a:b", "1:0", "-1:2", "1:2:3",
                  "inf:1"] {
            assert!(matches!(s.parse::<Ratio>(),
                             Err(Error::InvalidRatio(_))),
                    "{s:?} should not parse");
        }
    }

    #[test]
    fn ratio_serializes_as_a_string() -> Result<(), serde_json::Error> {
        let r: Ratio = serde_json::from_str("\"16:9\"")?;
        assert_eq!(r.factor(), 16. / 9.);
        assert_eq!(serde_json::to_string(&r)?, "\"16:9\"");
        Ok(())
    }

    #[test]
    fn default_single_column_size() -> Result<(), Error> {
        let (width, height) = FigureFormat::default().size()?;
        assert_eq!(width, 8.3 * CM_PER_INCH);
        assert_eq!(height, width);
        Ok(())
    }

    #[test]
    fn double_column_and_ratios() -> Result<(), Error> {
        let format = FigureFormat {
            column_type: ColumnType::Double,
            width_ratio: "1:2".parse()?,
            aspect_ratio: "4:3".parse()?,
            ..Default::default()
        };
        let (width, height) = format.size()?;
        assert_eq!(width, 17.1 * CM_PER_INCH * 0.5);
        assert_eq!(height, width / (4. / 3.));
        Ok(())
    }

    #[test]
    fn explicit_size_skips_derivation_but_still_scales() -> Result<(), Error> {
        let format = FigureFormat {
            width: Some(4.),
            height: Some(3.),
            upscaling_factor: 2.,
            ..Default::default()
        };
        assert_eq!(format.size()?, (8., 6.));
        Ok(())
    }

    #[test]
    fn compression_applies_per_dimension() -> Result<(), Error> {
        let format = FigureFormat {
            width: Some(4.),
            height: Some(4.),
            compress_width: 0.5,
            compress_height: 0.25,
            ..Default::default()
        };
        assert_eq!(format.size()?, (2., 1.));
        Ok(())
    }

    #[test]
    fn validation_catches_bad_values() {
        let bad = [
            FigureFormat { dpi: 0., ..Default::default() },
            FigureFormat { upscaling_factor: -1., ..Default::default() },
            FigureFormat { width: Some(0.), ..Default::default() },
            FigureFormat { single_column_width: f64::NAN,
                           ..Default::default() },
            FigureFormat { grid_height_ratios: Some(vec![]),
                           ..Default::default() },
            FigureFormat { grid_width_ratios: Some(vec![1., 0.]),
                           ..Default::default() },
        ];
        for format in bad {
            assert!(matches!(format.size(),
                             Err(Error::InvalidOption(_))));
        }
    }

    #[test]
    fn format_round_trips_through_json() -> Result<(), serde_json::Error> {
        let format = FigureFormat {
            column_type: ColumnType::Double,
            aspect_ratio: "16:9".parse().unwrap(),
            grid_width_ratios: Some(vec![2., 1.]),
            ..Default::default()
        };
        let json = serde_json::to_string(&format)?;
        assert!(json.contains("\"16:9\""));
        assert_eq!(serde_json::from_str::<FigureFormat>(&json)?, format);
        Ok(())
    }
}
