//! Inset axes: a small detail view connected to its parent axes.

use pyo3::{prelude::*, intern, types::PyDict};
use serde::{Deserialize, Serialize};
use crate::{
    axes::{set_locators, tick_label_params, tick_visibility},
    Axes, Error, Figure, Style,
};

/// Which corners of the inset and of its source region are joined by
/// connector lines.  Corners are Matplotlib's 1–4 (lower left, lower
/// right, upper right, upper left... as `BboxConnector` counts them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectors {
    /// No box or connectors are drawn.
    None,
    /// Two solid connectors, each joining the same corner on both
    /// boxes.
    Two(u8, u8),
    /// Two dashed connectors joining corner `a` to `c` and `b` to `d`.
    Four(u8, u8, u8, u8),
}

impl Default for Connectors {
    fn default() -> Self {
        Connectors::Two(1, 2)
    }
}

impl Connectors {
    /// The `(loc1, loc2)` pair of each connector, plus whether the
    /// decoration is dashed.
    fn pairs(&self) -> Result<Option<([(u8, u8); 2], bool)>, Error> {
        let checked = |corners: &[u8]| {
            match corners.iter().all(|c| (1..=4).contains(c)) {
                true => Ok(()),
                false => Err(Error::InvalidOption(format!(
                    "connector corners must be 1..=4, got {corners:?}"))),
            }
        };
        match *self {
            Connectors::None => Ok(None),
            Connectors::Two(a, b) => {
                checked(&[a, b])?;
                Ok(Some(([(a, a), (b, b)], false)))
            }
            Connectors::Four(a, b, c, d) => {
                checked(&[a, b, c, d])?;
                Ok(Some(([(a, c), (b, d)], true)))
            }
        }
    }
}

/// Placement and dressing of an inset created by [`Axes::inset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsetOptions {
    /// `[x, y, width, height]` of the inset relative to the parent
    /// axes.
    pub position: [f64; 4],
    /// The figure rectangle initially allocated to the inset; the
    /// locator derived from [`position`](InsetOptions::position)
    /// supersedes it.
    pub bounding_box: [f64; 4],
    /// `(major, minor)` spacing of the inset's x ticks.
    pub x_tick_locators: (f64, f64),
    pub y_tick_locators: (f64, f64),
    pub connectors: Connectors,
    pub hide_x_ticklabels: bool,
    pub hide_y_ticklabels: bool,
    pub hide_x_ticks: bool,
    pub hide_y_ticks: bool,
    pub rotation_x_ticks: f64,
    pub rotation_y_ticks: f64,
}

impl Default for InsetOptions {
    fn default() -> Self {
        InsetOptions {
            position: [0.1, 0.1, 0.3, 0.3],
            bounding_box: [0., 0., 0.1, 0.1],
            x_tick_locators: (100., 50.),
            y_tick_locators: (10., 5.),
            connectors: Connectors::default(),
            hide_x_ticklabels: false,
            hide_y_ticklabels: false,
            hide_x_ticks: false,
            hide_y_ticks: false,
            rotation_x_ticks: 0.,
            rotation_y_ticks: 0.,
        }
    }
}

fn decoration_kwargs<'py>(py: Python<'py>, dashed: bool) -> &'py PyDict {
    let kwargs = PyDict::new(py);
    kwargs.set_item(intern!(py, "fc"), intern!(py, "none")).unwrap();
    kwargs.set_item(intern!(py, "ec"), intern!(py, "black")).unwrap();
    if dashed {
        kwargs.set_item(intern!(py, "ls"), intern!(py, "--")).unwrap();
    }
    kwargs
}

/// Draw the box around the source region on the parent and the
/// connector lines on the inset.
fn connect(py: Python<'_>, parent: &PyObject, inset: &PyObject,
           pairs: [(u8, u8); 2], dashed: bool) -> Result<(), Error> {
    let transforms = pymod!(crate::TRANSFORMS)?;
    let inset_locator = pymod!(crate::INSET_LOCATOR)?;
    // The inset view limits, expressed in the parent's data space.
    let view_lim = inset.getattr(py, intern!(py, "viewLim"))
        .map_err(Error::Python)?;
    let trans_data = parent.getattr(py, intern!(py, "transData"))
        .map_err(Error::Python)?;
    let rect = getattr!(py, transforms, "TransformedBbox")
        .call1(py, (view_lim, trans_data))
        .map_err(Error::Python)?;

    let kwargs = decoration_kwargs(py, dashed);
    kwargs.set_item(intern!(py, "fill"), false).unwrap();
    let patch = getattr!(py, inset_locator, "BboxPatch")
        .call(py, (&rect,), Some(kwargs))
        .map_err(Error::Python)?;
    parent.call_method1(py, intern!(py, "add_patch"), (patch,))
        .map_err(Error::Python)?;

    let bbox = inset.getattr(py, intern!(py, "bbox"))
        .map_err(Error::Python)?;
    for (loc1, loc2) in pairs {
        let kwargs = decoration_kwargs(py, dashed);
        kwargs.set_item(intern!(py, "loc1"), loc1).unwrap();
        kwargs.set_item(intern!(py, "loc2"), loc2).unwrap();
        let connector = getattr!(py, inset_locator, "BboxConnector")
            .call(py, (&bbox, &rect), Some(kwargs))
            .map_err(Error::Python)?;
        inset.call_method1(py, intern!(py, "add_patch"), (&connector,))
            .map_err(Error::Python)?;
        connector.call_method1(py, intern!(py, "set_clip_on"), (false,))
            .map_err(Error::Python)?;
    }
    Ok(())
}

impl Axes {
    /// Add an inset to these axes.
    ///
    /// The inset is created on `fig`, pinned to
    /// [`position`](InsetOptions::position) within the parent, and
    /// decorated with the box and connector lines
    /// [`connectors`](InsetOptions::connectors) asks for.  Returns the
    /// inset as an [`Axes`], ready for plotting and
    /// [`adjust`](crate::adjust)ing.
    pub fn inset(&mut self, fig: &Figure, options: &InsetOptions,
                 style: &Style) -> Result<Axes, Error> {
        let pairs = options.connectors.pairs()?;
        let inset_locator = pymod!(crate::INSET_LOCATOR)?;
        Python::with_gil(|py| style.scoped(py, |py| {
            let inset = fig.fig
                .call_method1(py, intern!(py, "add_axes"),
                              (options.bounding_box.to_vec(),))
                .map_err(Error::Python)?;
            let locator = getattr!(py, inset_locator, "InsetPosition")
                .call1(py, (&self.ax, options.position.to_vec()))
                .map_err(Error::Python)?;
            inset.call_method1(py, intern!(py, "set_axes_locator"),
                               (locator,))
                .map_err(Error::Python)?;

            if let Some((pairs, dashed)) = pairs {
                connect(py, &self.ax, &inset, pairs, dashed)?;
            }

            set_locators(py, &inset, "xaxis", options.x_tick_locators)?;
            set_locators(py, &inset, "yaxis", options.y_tick_locators)?;
            tick_label_params(py, &inset, "y", options.hide_y_ticklabels,
                              options.rotation_y_ticks)?;
            tick_label_params(py, &inset, "x", options.hide_x_ticklabels,
                              options.rotation_x_ticks)?;
            tick_visibility(py, &inset, "y", !options.hide_y_ticks)?;
            tick_visibility(py, &inset, "x", !options.hide_x_ticks)?;
            tracing::debug!(position = ?options.position, "added inset");
            Ok(Axes { ax: inset })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adjust, prepare, AxesOptions, FigureFormat};

    #[test]
    fn default_geometry_matches_the_conventions() {
        let options = InsetOptions::default();
        assert_eq!(options.position, [0.1, 0.1, 0.3, 0.3]);
        assert_eq!(options.bounding_box, [0., 0., 0.1, 0.1]);
        assert_eq!(options.x_tick_locators, (100., 50.));
        assert_eq!(options.y_tick_locators, (10., 5.));
        assert_eq!(options.connectors, Connectors::Two(1, 2));
    }

    #[test]
    fn two_corner_connectors_join_like_corners() -> Result<(), Error> {
        assert_eq!(Connectors::Two(1, 3).pairs()?,
                   Some(([(1, 1), (3, 3)], false)));
        assert_eq!(Connectors::Four(1, 2, 3, 4).pairs()?,
                   Some(([(1, 3), (2, 4)], true)));
        assert_eq!(Connectors::None.pairs()?, None);
        Ok(())
    }

    #[test]
    fn out_of_range_corners_are_rejected() {
        assert!(matches!(Connectors::Two(0, 2).pairs(),
                         Err(Error::InvalidOption(_))));
        assert!(matches!(Connectors::Four(1, 2, 3, 5).pairs(),
                         Err(Error::InvalidOption(_))));
    }

    #[test]
    fn inset_on_a_prepared_figure() -> Result<(), Error> {
        let (fig, [[mut ax]]) =
            match prepare::<1, 1>(&FigureFormat::default(), &Style::new()) {
                Err(Error::NoMatplotlib) => return Ok(()),
                result => result?,
            };
        ax.xy(&[0., 100., 200.], &[0., 20., 10.]).plot();
        let options = InsetOptions {
            position: [0.55, 0.55, 0.4, 0.4],
            connectors: Connectors::Four(1, 2, 3, 4),
            hide_y_ticks: true,
            ..Default::default()
        };
        let mut inset = ax.inset(&fig, &options, &Style::new())?;
        inset.xy(&[0., 50.], &[0., 10.]).plot();
        adjust(&fig, &mut inset, &AxesOptions::default(), &Style::new())?;
        fig.close()?;
        Ok(())
    }
}
