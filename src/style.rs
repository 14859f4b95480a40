//! Styling without global state.
//!
//! The original way of styling Matplotlib figures is to mutate the
//! process-wide `rcParams`; any figure drawn afterwards, by anyone,
//! picks the change up.  [`Style`] instead carries the parameters as a
//! value and applies them through `matplotlib.rc_context`, so they are
//! in force only while one operation runs.

use pyo3::{prelude::*, intern, types::PyDict};
use serde::{Deserialize, Serialize};
use crate::{Colour, Error, Options};

/// A set of Matplotlib `rcParams` applied to a single operation.
///
/// A `Style` is passed to [`prepare`](crate::prepare),
/// [`adjust`](crate::adjust), [`Axes::inset`](crate::Axes::inset) and
/// [`Savefig::style`](crate::Savefig::style); the default style leaves
/// every parameter at Matplotlib's own default.
///
/// ```
/// use pubplot::Style;
/// let style = Style::new()
///     .font_family("serif")
///     .font_size(9.)
///     .with("axes.linewidth", 0.6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style {
    params: Options,
}

impl Style {
    pub fn new() -> Self {
        Style { params: Options::new() }
    }

    /// Build a style from a raw `rcParams` mapping.
    pub fn from_params(params: Options) -> Self {
        Style { params }
    }

    /// Set any `rcParams` key directly, e.g. `"axes.linewidth"`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>,
                value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// `font.family`, e.g. `"serif"` or `"sans-serif"`.
    #[must_use]
    pub fn font_family(self, family: &str) -> Self {
        self.with("font.family", family)
    }

    /// `font.size`, the base font size in points.
    #[must_use]
    pub fn font_size(self, points: f64) -> Self {
        self.with("font.size", points)
    }

    /// `lines.linewidth`, the default line width in points.
    #[must_use]
    pub fn line_width(self, points: f64) -> Self {
        self.with("lines.linewidth", points)
    }

    /// `figure.facecolor`, the figure background.
    #[must_use]
    pub fn face_colour(self, colour: Colour) -> Self {
        self.with("figure.facecolor",
                  serde_json::json!([colour.r, colour.g, colour.b]))
    }

    /// The `rcParams` this style sets.
    pub fn params(&self) -> &Options {
        &self.params
    }

    /// Run `f` inside `matplotlib.rc_context(rc=self.params)`.  The
    /// context is exited whether or not `f` succeeds, so the ambient
    /// `rcParams` are never left modified.
    pub(crate) fn scoped<T>(
        &self, py: Python<'_>,
        f: impl FnOnce(Python<'_>) -> Result<T, Error>) -> Result<T, Error>
    {
        let matplotlib = pymod!(crate::MATPLOTLIB)?;
        let kwargs = PyDict::new(py);
        kwargs.set_item(intern!(py, "rc"),
                        self.params.to_py_dict(py)).unwrap();
        let ctx = matplotlib
            .call_method(py, intern!(py, "rc_context"), (), Some(kwargs))
            .map_err(Error::Python)?;
        ctx.call_method0(py, intern!(py, "__enter__"))
            .map_err(Error::Python)?;
        let result = f(py);
        let exited = ctx.call_method1(
            py, intern!(py, "__exit__"),
            (py.None(), py.None(), py.None()));
        match exited {
            Ok(_) => result,
            Err(e) => result.and(Err(Error::Python(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn helpers_set_the_expected_rc_keys() {
        let style = Style::new()
            .font_family("serif")
            .font_size(9.)
            .line_width(1.2);
        assert_eq!(style.params().get("font.family"), Some(&json!("serif")));
        assert_eq!(style.params().get("font.size"), Some(&json!(9.)));
        assert_eq!(style.params().get("lines.linewidth"), Some(&json!(1.2)));
    }

    #[test]
    fn face_colour_is_an_rgb_triple() {
        let style = Style::new().face_colour(Colour::new(1., 1., 1.));
        assert_eq!(style.params().get("figure.facecolor"),
                   Some(&json!([1., 1., 1.])));
    }

    #[test]
    fn later_values_replace_earlier_ones() {
        let style = Style::new().font_size(9.).font_size(11.);
        assert_eq!(style.params().get("font.size"), Some(&json!(11.)));
        assert_eq!(style.params().len(), 1);
    }

    #[test]
    fn default_style_sets_nothing() {
        assert!(Style::default().params().is_empty());
    }
}
