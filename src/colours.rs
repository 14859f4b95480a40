//! Colours: ColorBrewer palettes, cycling and mixing.

use serde::{Deserialize, Serialize};
use crate::Error;

/// An RGB colour with channels in `0. ..= 1.`, Matplotlib's convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Colour {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Colour { r, g, b }
    }

    /// Convert from `0 ..= 255` channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Colour { r: r as f64 / 255.,
                 g: g as f64 / 255.,
                 b: b as f64 / 255. }
    }

    /// The `(r, g, b)` tuple Matplotlib colour arguments expect.
    pub fn rgb(&self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }

    /// The `(r, g, b, alpha)` tuple for translucent patches.
    pub fn rgba(&self, alpha: f64) -> (f64, f64, f64, f64) {
        (self.r, self.g, self.b, alpha)
    }
}

/// `(0, 0, 0)`, black.
impl Default for Colour {
    fn default() -> Self {
        Colour::new(0., 0., 0.)
    }
}

impl From<(f64, f64, f64)> for Colour {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Colour::new(r, g, b)
    }
}

impl From<Colour> for (f64, f64, f64) {
    fn from(c: Colour) -> Self {
        c.rgb()
    }
}

fn from_colorous(c: colorous::Color) -> Colour {
    Colour::from_u8(c.r, c.g, c.b)
}

/// The ColorBrewer palette families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteFamily {
    Qualitative,
    Sequential,
    Diverging,
}

impl PaletteFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteFamily::Qualitative => "qualitative",
            PaletteFamily::Sequential => "sequential",
            PaletteFamily::Diverging => "diverging",
        }
    }
}

fn qualitative_set(name: &str) -> Option<&'static [colorous::Color]> {
    let set: &'static [colorous::Color] =
        match name.to_ascii_lowercase().as_str() {
            "accent" => &colorous::ACCENT,
            "dark2" => &colorous::DARK2,
            "paired" => &colorous::PAIRED,
            "pastel1" => &colorous::PASTEL1,
            "pastel2" => &colorous::PASTEL2,
            "set1" => &colorous::SET1,
            "set2" => &colorous::SET2,
            "set3" => &colorous::SET3,
            _ => return None,
        };
    Some(set)
}

fn sequential_gradient(name: &str) -> Option<colorous::Gradient> {
    Some(match name.to_ascii_lowercase().as_str() {
        "blues" => colorous::BLUES,
        "greens" => colorous::GREENS,
        "greys" => colorous::GREYS,
        "oranges" => colorous::ORANGES,
        "purples" => colorous::PURPLES,
        "reds" => colorous::REDS,
        "bugn" => colorous::BLUE_GREEN,
        "bupu" => colorous::BLUE_PURPLE,
        "gnbu" => colorous::GREEN_BLUE,
        "orrd" => colorous::ORANGE_RED,
        "pubu" => colorous::PURPLE_BLUE,
        "pubugn" => colorous::PURPLE_BLUE_GREEN,
        "purd" => colorous::PURPLE_RED,
        "rdpu" => colorous::RED_PURPLE,
        "ylgn" => colorous::YELLOW_GREEN,
        "ylgnbu" => colorous::YELLOW_GREEN_BLUE,
        "ylorbr" => colorous::YELLOW_ORANGE_BROWN,
        "ylorrd" => colorous::YELLOW_ORANGE_RED,
        "viridis" => colorous::VIRIDIS,
        _ => return None,
    })
}

fn diverging_gradient(name: &str) -> Option<colorous::Gradient> {
    Some(match name.to_ascii_lowercase().as_str() {
        "brbg" => colorous::BROWN_GREEN,
        "piyg" => colorous::PINK_GREEN,
        "prgn" => colorous::PURPLE_GREEN,
        "puor" => colorous::PURPLE_ORANGE,
        "rdbu" => colorous::RED_BLUE,
        "rdgy" => colorous::RED_GREY,
        "rdylbu" => colorous::RED_YELLOW_BLUE,
        "rdylgn" => colorous::RED_YELLOW_GREEN,
        "spectral" => colorous::SPECTRAL,
        _ => return None,
    })
}

fn sample(gradient: colorous::Gradient, n: usize) -> Vec<Colour> {
    if n == 1 {
        return vec![from_colorous(gradient.eval_continuous(0.))];
    }
    (0..n).map(|i| from_colorous(gradient.eval_rational(i, n))).collect()
}

/// Return `n` colours from the named ColorBrewer palette.
///
/// Palette names are matched case-insensitively: the qualitative
/// family knows `"Accent"`, `"Dark2"`, `"Paired"`, `"Pastel1"`,
/// `"Pastel2"`, `"Set1"`, `"Set2"` and `"Set3"`; the sequential and
/// diverging families know the gradient names (`"Blues"`, `"YlGnBu"`,
/// `"RdBu"`, `"Spectral"`, …).  Qualitative palettes return their
/// first `n` entries and fail when `n` exceeds the palette size;
/// gradient palettes are sampled at `n` evenly spaced stops.
///
/// ```
/// use pubplot::{palette, PaletteFamily};
/// let colours = palette(PaletteFamily::Qualitative, "Set2", 3)?;
/// assert_eq!(colours.len(), 3);
/// # Ok::<(), pubplot::Error>(())
/// ```
pub fn palette(family: PaletteFamily, name: &str, n: usize)
               -> Result<Vec<Colour>, Error> {
    if n == 0 {
        return Err(Error::InvalidOption(
            "a palette must hold at least one colour".to_string()));
    }
    let unknown = || Error::UnknownPalette { family,
                                             name: name.to_string() };
    match family {
        PaletteFamily::Qualitative => {
            let set = qualitative_set(name).ok_or_else(unknown)?;
            if n > set.len() {
                return Err(Error::InvalidOption(format!(
                    "palette {name:?} holds {} colours, {n} requested",
                    set.len())));
            }
            Ok(set[..n].iter().copied().map(from_colorous).collect())
        }
        PaletteFamily::Sequential => {
            let gradient = sequential_gradient(name).ok_or_else(unknown)?;
            Ok(sample(gradient, n))
        }
        PaletteFamily::Diverging => {
            let gradient = diverging_gradient(name).ok_or_else(unknown)?;
            Ok(sample(gradient, n))
        }
    }
}

/// A named palette together with how many of its colours to take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteSpec {
    pub family: PaletteFamily,
    pub name: String,
    pub n: usize,
}

impl PaletteSpec {
    pub fn new(family: PaletteFamily, name: impl Into<String>, n: usize)
               -> Self {
        PaletteSpec { family, name: name.into(), n }
    }
}

/// An endless iterator cycling over a list of colours, either given
/// explicitly or concatenated from several palettes.
///
/// ```
/// use pubplot::{Colour, ColourCycle};
/// let mut cycle = ColourCycle::new(
///     vec![Colour::new(1., 0., 0.), Colour::new(0., 0., 1.)])?;
/// assert_eq!(cycle.next(), Some(Colour::new(1., 0., 0.)));
/// assert_eq!(cycle.next(), Some(Colour::new(0., 0., 1.)));
/// assert_eq!(cycle.next(), Some(Colour::new(1., 0., 0.)));
/// # Ok::<(), pubplot::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ColourCycle {
    colours: Vec<Colour>,
    next: usize,
}

impl ColourCycle {
    pub fn new(colours: Vec<Colour>) -> Result<Self, Error> {
        if colours.is_empty() {
            return Err(Error::InvalidOption(
                "cannot cycle over an empty colour list".to_string()));
        }
        Ok(ColourCycle { colours, next: 0 })
    }

    /// Cycle over the concatenation of the given palettes.
    pub fn from_palettes(specs: &[PaletteSpec]) -> Result<Self, Error> {
        let mut colours = vec![];
        for spec in specs {
            colours.extend(palette(spec.family, &spec.name, spec.n)?);
        }
        ColourCycle::new(colours)
    }
}

impl Iterator for ColourCycle {
    type Item = Colour;

    fn next(&mut self) -> Option<Colour> {
        let colour = self.colours[self.next];
        self.next = (self.next + 1) % self.colours.len();
        Some(colour)
    }
}

/// How [`mix`] interpolates between its two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixOptions {
    /// Number of interpolation steps when `weights` is not given.
    pub number_of_colours: usize,
    /// Explicit interpolation weights in `0. ..= 1.`; weight `0.` is
    /// the first colour, weight `1.` the second.
    pub weights: Option<Vec<f64>>,
}

impl Default for MixOptions {
    fn default() -> Self {
        MixOptions { number_of_colours: 10, weights: None }
    }
}

fn round5(x: f64) -> f64 {
    (x * 1e5).round() / 1e5
}

/// Linearly interpolate between `a` and `b`.
///
/// With the default options this returns `number_of_colours` steps at
/// weights `i / number_of_colours`, so the run starts at `a` and stops
/// one step short of `b`.  Channels are rounded to five decimals.
pub fn mix(a: Colour, b: Colour, options: &MixOptions) -> Vec<Colour> {
    let weights = match &options.weights {
        Some(weights) => weights.clone(),
        None => (0..options.number_of_colours)
            .map(|i| i as f64 / options.number_of_colours as f64)
            .collect(),
    };
    weights.iter()
        .map(|w| Colour::new(round5((1. - w) * a.r + w * b.r),
                             round5((1. - w) * a.g + w * b.g),
                             round5((1. - w) * a.b + w * b.b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualitative_palettes_return_their_first_entries()
        -> Result<(), Error> {
        let colours = palette(PaletteFamily::Qualitative, "Set2", 3)?;
        assert_eq!(colours.len(), 3);
        // First Set2 colour, (102, 194, 165) in ColorBrewer.
        assert_eq!(colours[0], Colour::from_u8(102, 194, 165));
        Ok(())
    }

    #[test]
    fn qualitative_names_match_case_insensitively() -> Result<(), Error> {
        assert_eq!(palette(PaletteFamily::Qualitative, "set2", 8)?,
                   palette(PaletteFamily::Qualitative, "Set2", 8)?);
        Ok(())
    }

    #[test]
    fn oversized_qualitative_requests_fail() {
        assert!(matches!(palette(PaletteFamily::Qualitative, "Set2", 9),
                         Err(Error::InvalidOption(_))));
    }

    #[test]
    fn gradients_sample_their_endpoints() -> Result<(), Error> {
        let colours = palette(PaletteFamily::Sequential, "Blues", 5)?;
        assert_eq!(colours.len(), 5);
        assert_eq!(colours[0],
                   Colour::from_u8(colorous::BLUES.eval_continuous(0.).r,
                                   colorous::BLUES.eval_continuous(0.).g,
                                   colorous::BLUES.eval_continuous(0.).b));
        let diverging = palette(PaletteFamily::Diverging, "RdBu", 3)?;
        assert_eq!(diverging.len(), 3);
        Ok(())
    }

    #[test]
    fn single_stop_gradients_do_not_divide_by_zero() -> Result<(), Error> {
        let colours = palette(PaletteFamily::Sequential, "Greys", 1)?;
        assert_eq!(colours.len(), 1);
        assert!(colours[0].r.is_finite());
        Ok(())
    }

    #[test]
    fn unknown_palettes_are_rejected_per_family() {
        // "Blues" is sequential, not qualitative.
        assert!(matches!(
            palette(PaletteFamily::Qualitative, "Blues", 3),
            Err(Error::UnknownPalette { family: PaletteFamily::Qualitative,
                                        .. })));
        assert!(matches!(
            palette(PaletteFamily::Sequential, "Set2", 3),
            Err(Error::UnknownPalette { .. })));
    }

    #[test]
    fn zero_colours_is_invalid() {
        assert!(matches!(palette(PaletteFamily::Sequential, "Blues", 0),
                         Err(Error::InvalidOption(_))));
    }

    #[test]
    fn cycle_wraps_around() -> Result<(), Error> {
        let red = Colour::new(1., 0., 0.);
        let blue = Colour::new(0., 0., 1.);
        let cycle = ColourCycle::new(vec![red, blue])?;
        let five: Vec<_> = cycle.take(5).collect();
        assert_eq!(five, vec![red, blue, red, blue, red]);
        Ok(())
    }

    #[test]
    fn empty_cycles_are_rejected() {
        assert!(matches!(ColourCycle::new(vec![]),
                         Err(Error::InvalidOption(_))));
    }

    #[test]
    fn cycle_concatenates_palettes() -> Result<(), Error> {
        let specs = [
            PaletteSpec::new(PaletteFamily::Qualitative, "Set2", 2),
            PaletteSpec::new(PaletteFamily::Qualitative, "Dark2", 2),
        ];
        let cycle = ColourCycle::from_palettes(&specs)?;
        let colours: Vec<_> = cycle.take(4).collect();
        assert_eq!(&colours[..2],
                   &palette(PaletteFamily::Qualitative, "Set2", 2)?[..]);
        assert_eq!(&colours[2..],
                   &palette(PaletteFamily::Qualitative, "Dark2", 2)?[..]);
        Ok(())
    }

    #[test]
    fn mix_defaults_start_at_the_first_colour() {
        let black = Colour::new(0., 0., 0.);
        let white = Colour::new(1., 1., 1.);
        let colours = mix(black, white, &MixOptions::default());
        assert_eq!(colours.len(), 10);
        assert_eq!(colours[0], black);
        // Weight 1.0 is excluded, so the second endpoint never appears.
        assert!(colours.iter().all(|c| *c != white));
        assert_eq!(colours[5], Colour::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn mix_with_explicit_weights_and_rounding() {
        let a = Colour::new(0., 0., 0.);
        let b = Colour::new(1., 1., 1.);
        let options = MixOptions {
            weights: Some(vec![0., 1. / 3., 1.]),
            ..Default::default()
        };
        let colours = mix(a, b, &options);
        assert_eq!(colours, vec![a, Colour::new(0.33333, 0.33333, 0.33333),
                                 b]);
    }
}
