//! Dressing axes: labels, ticks, legends, backgrounds and text.

use pyo3::{prelude::*, intern, types::PyDict};
use serde::{Deserialize, Serialize};
use crate::{
    Axes, Colour, ColourCycle, Error, Figure, PaletteSpec, Style,
};

/// How an [`adjust`]ed axes is labelled, ticked and decorated.
///
/// Every field has the conventional publication default; start from
/// `AxesOptions::default()` and override what the figure needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesOptions {
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// Rendered after the label as `"label [unit]"`.
    pub xunit: Option<String>,
    pub yunit: Option<String>,
    pub xlabel_pad: f64,
    pub ylabel_pad: f64,
    pub hide_x_labels: bool,
    pub hide_y_labels: bool,
    pub hide_x_ticklabels: bool,
    pub hide_y_ticklabels: bool,
    pub hide_x_ticks: bool,
    pub hide_y_ticks: bool,
    /// `(major, minor)` spacing for `MultipleLocator`s.
    pub x_tick_locators: Option<(f64, f64)>,
    pub y_tick_locators: Option<(f64, f64)>,
    /// Tick label rotation in degrees; ignored while the labels are
    /// hidden.
    pub rotation_x_ticks: f64,
    pub rotation_y_ticks: f64,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    /// Ignore the [`Background`] limits on this axis and span whatever
    /// the axis currently shows.
    pub xlim_reset: bool,
    pub ylim_reset: bool,
    /// Title drawn at the style's base font size.
    pub title: Option<String>,
    pub backgrounds: Vec<Background>,
    pub legend: Option<LegendOptions>,
    pub margins: Margins,
    pub texts: Vec<Text>,
}

impl Default for AxesOptions {
    fn default() -> Self {
        AxesOptions {
            xlabel: None,
            ylabel: None,
            xunit: None,
            yunit: None,
            xlabel_pad: 4.0,
            ylabel_pad: 4.0,
            hide_x_labels: false,
            hide_y_labels: false,
            hide_x_ticklabels: false,
            hide_y_ticklabels: false,
            hide_x_ticks: false,
            hide_y_ticks: false,
            x_tick_locators: None,
            y_tick_locators: None,
            rotation_x_ticks: 0.,
            rotation_y_ticks: 0.,
            xlim: None,
            ylim: None,
            xlim_reset: false,
            ylim_reset: false,
            title: None,
            backgrounds: vec![],
            legend: None,
            margins: Margins::default(),
            texts: vec![],
        }
    }
}

/// Fractions of the figure the axes edges sit at, passed to
/// `subplots_adjust`.  `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq,
         Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub wspace: Option<f64>,
    pub hspace: Option<f64>,
}

/// A translucent rectangle drawn behind the data.
///
/// A `None` limit endpoint falls back to the current axis limit, so
/// the default background spans the whole plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub colour: Colour,
    pub alpha: f64,
    pub xlim: (Option<f64>, Option<f64>),
    pub ylim: (Option<f64>, Option<f64>),
    pub zorder: i32,
    pub edge_colour: Option<Colour>,
    pub line_width: Option<f64>,
}

impl Default for Background {
    fn default() -> Self {
        Background {
            colour: Colour::default(),
            alpha: 0.2,
            xlim: (None, None),
            ylim: (None, None),
            zorder: 0,
            edge_colour: None,
            line_width: None,
        }
    }
}

/// A string drawn at data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    pub x: f64,
    pub y: f64,
}

impl Text {
    pub fn new(content: impl Into<String>, x: f64, y: f64) -> Self {
        Text { content: content.into(), x, y }
    }
}

/// Where the colours of legend handles come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColourSource {
    /// An explicit list, cycled.
    Colours(Vec<Colour>),
    /// The concatenation of these palettes, cycled.
    Palettes(Vec<PaletteSpec>),
}

impl Default for ColourSource {
    fn default() -> Self {
        ColourSource::Colours(vec![])
    }
}

/// Legend placement: a Matplotlib `loc` string plus the anchor point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendPosition {
    pub loc: String,
    pub anchor: (f64, f64),
}

/// `"lower center"` anchored below the axes.
impl Default for LegendPosition {
    fn default() -> Self {
        LegendPosition { loc: "lower center".to_string(),
                         anchor: (0.5, -0.1) }
    }
}

/// A frameless legend built from explicit handles.
///
/// One handle is created per label: a plain line for a `None` marker,
/// otherwise a size-10 marker on a transparent line.  Colours and
/// markers are cycled independently of each other.  The label `"_"`
/// consumes one colour and one marker without producing a handle,
/// which keeps the cycles aligned with the plotted datasets when some
/// of them should stay out of the legend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
    pub labels: Vec<String>,
    /// One entry per handle, cycled; `None` draws a line handle.
    pub markers: Vec<Option<String>>,
    pub colours: ColourSource,
    pub marker_edge: Option<Colour>,
    pub position: LegendPosition,
    pub ncol: usize,
}

impl LegendOptions {
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>,
               colours: ColourSource) -> Self {
        LegendOptions {
            labels: labels.into_iter().map(|l| l.into()).collect(),
            colours,
            ncol: 1,
            ..Default::default()
        }
    }
}

/// The text an axis label shows: `"label"`, or `"label [unit]"` when a
/// unit is given.
fn axis_label(label: &Option<String>, unit: &Option<String>) -> String {
    match (label, unit) {
        (Some(label), Some(unit)) => format!("{label} [{unit}]"),
        (Some(label), None) => label.clone(),
        (None, _) => String::new(),
    }
}

/// Install `MultipleLocator`s with the `(major, minor)` spacings on
/// `ax.<axis>`, where `axis` is `"xaxis"` or `"yaxis"`.
pub(crate) fn set_locators(py: Python<'_>, ax: &PyObject, axis: &str,
                           locators: (f64, f64)) -> Result<(), Error> {
    let ticker = pymod!(crate::TICKER)?;
    let multiple = getattr!(py, ticker, "MultipleLocator");
    let axis = ax.getattr(py, axis).map_err(Error::Python)?;
    let major = multiple.call1(py, (locators.0,)).map_err(Error::Python)?;
    axis.call_method1(py, intern!(py, "set_major_locator"), (major,))
        .map_err(Error::Python)?;
    let minor = multiple.call1(py, (locators.1,)).map_err(Error::Python)?;
    axis.call_method1(py, intern!(py, "set_minor_locator"), (minor,))
        .map_err(Error::Python)?;
    Ok(())
}

/// `ax.tick_params(axis=axis, direction="in", which="both", ...)`.
pub(crate) fn tick_params(py: Python<'_>, ax: &PyObject, axis: &str,
                          set: impl FnOnce(&PyDict)) -> Result<(), Error> {
    let kwargs = PyDict::new(py);
    kwargs.set_item(intern!(py, "axis"), axis).unwrap();
    kwargs.set_item(intern!(py, "direction"), intern!(py, "in")).unwrap();
    kwargs.set_item(intern!(py, "which"), intern!(py, "both")).unwrap();
    set(kwargs);
    ax.call_method(py, intern!(py, "tick_params"), (), Some(kwargs))
        .map_err(Error::Python)?;
    Ok(())
}

/// Hide or rotate the tick labels of one axis.  The sides carrying
/// labels are axis-specific: left/right for y, bottom/top for x.
pub(crate) fn tick_label_params(py: Python<'_>, ax: &PyObject, axis: &str,
                                hide: bool, rotation: f64)
                                -> Result<(), Error> {
    let sides: [&str; 2] = match axis {
        "y" => ["labelleft", "labelright"],
        _ => ["labelbottom", "labeltop"],
    };
    if hide {
        tick_params(py, ax, axis, |kwargs| {
            for side in sides {
                kwargs.set_item(side, false).unwrap();
            }
        })
    } else if rotation != 0. {
        tick_params(py, ax, axis, |kwargs| {
            kwargs.set_item(intern!(py, "labelrotation"), rotation)
                .unwrap();
        })
    } else {
        Ok(())
    }
}

/// Show or hide the tick marks of one axis, on both of its sides.
pub(crate) fn tick_visibility(py: Python<'_>, ax: &PyObject, axis: &str,
                              visible: bool) -> Result<(), Error> {
    let sides: [&str; 2] = match axis {
        "y" => ["left", "right"],
        _ => ["bottom", "top"],
    };
    tick_params(py, ax, axis, |kwargs| {
        for side in sides {
            kwargs.set_item(side, visible).unwrap();
        }
    })
}

fn set_label(py: Python<'_>, ax: &PyObject, setter: &str, text: &str,
             pad: f64) -> Result<(), Error> {
    let kwargs = PyDict::new(py);
    kwargs.set_item(intern!(py, "labelpad"), pad).unwrap();
    ax.call_method(py, setter, (text,), Some(kwargs))
        .map_err(Error::Python)?;
    Ok(())
}

fn axis_limits(py: Python<'_>, ax: &PyObject, getter: &str)
               -> Result<(f64, f64), Error> {
    ax.call_method0(py, getter)
        .and_then(|lim| lim.extract(py))
        .map_err(Error::Python)
}

fn draw_legend(py: Python<'_>, ax: &PyObject, legend: &LegendOptions)
               -> Result<(), Error> {
    let lines = pymod!(crate::LINES)?;
    let line2d = getattr!(py, lines, "Line2D");
    let mut colours = match &legend.colours {
        ColourSource::Colours(list) => ColourCycle::new(list.clone()),
        ColourSource::Palettes(specs) => ColourCycle::from_palettes(specs),
    }?;
    let empty: Vec<f64> = vec![];
    let mut handles: Vec<PyObject> = vec![];
    let mut labels: Vec<&str> = vec![];
    for (i, label) in legend.labels.iter().enumerate() {
        let colour = colours.next().unwrap();
        let marker = match legend.markers.is_empty() {
            true => None,
            false => legend.markers[i % legend.markers.len()].as_deref(),
        };
        // "_" keeps the cycles moving without adding a handle.
        if label == "_" {
            continue;
        }
        let kwargs = PyDict::new(py);
        match marker {
            None => {
                kwargs.set_item(intern!(py, "color"), colour.rgb())
                    .unwrap();
            }
            Some(marker) => {
                kwargs.set_item(intern!(py, "markerfacecolor"),
                                colour.rgb()).unwrap();
                kwargs.set_item(intern!(py, "markeredgecolor"),
                                legend.marker_edge.map(|c| c.rgb()))
                    .unwrap();
                kwargs.set_item(intern!(py, "markersize"), 10).unwrap();
                kwargs.set_item(intern!(py, "color"),
                                (1., 1., 1., 0.)).unwrap();
                kwargs.set_item(intern!(py, "marker"), marker).unwrap();
            }
        }
        let handle = line2d.call(py, (empty.clone(), empty.clone()),
                                 Some(kwargs))
            .map_err(Error::Python)?;
        handles.push(handle);
        labels.push(label);
    }
    let kwargs = PyDict::new(py);
    kwargs.set_item(intern!(py, "frameon"), false).unwrap();
    kwargs.set_item(intern!(py, "loc"), &legend.position.loc).unwrap();
    kwargs.set_item(intern!(py, "bbox_to_anchor"),
                    legend.position.anchor).unwrap();
    kwargs.set_item(intern!(py, "ncol"), legend.ncol.max(1)).unwrap();
    ax.call_method(py, intern!(py, "legend"), (handles, labels),
                   Some(kwargs))
        .map_err(Error::Python)?;
    Ok(())
}

fn draw_background(py: Python<'_>, ax: &PyObject, options: &AxesOptions,
                   background: &Background) -> Result<(), Error> {
    let patches = pymod!(crate::PATCHES)?;
    let current_x = axis_limits(py, ax, "get_xlim")?;
    let current_y = axis_limits(py, ax, "get_ylim")?;
    let (x0, x1) = match options.xlim_reset {
        true => current_x,
        false => (background.xlim.0.unwrap_or(current_x.0),
                  background.xlim.1.unwrap_or(current_x.1)),
    };
    let (y0, y1) = match options.ylim_reset {
        true => current_y,
        false => (background.ylim.0.unwrap_or(current_y.0),
                  background.ylim.1.unwrap_or(current_y.1)),
    };
    let kwargs = PyDict::new(py);
    kwargs.set_item(intern!(py, "xy"), (x0, y0)).unwrap();
    kwargs.set_item(intern!(py, "width"), x1 - x0).unwrap();
    kwargs.set_item(intern!(py, "height"), y1 - y0).unwrap();
    kwargs.set_item(intern!(py, "zorder"), background.zorder).unwrap();
    kwargs.set_item(intern!(py, "facecolor"),
                    background.colour.rgba(background.alpha)).unwrap();
    kwargs.set_item(intern!(py, "edgecolor"),
                    background.edge_colour.map(|c| c.rgb())).unwrap();
    kwargs.set_item(intern!(py, "linewidth"),
                    background.line_width).unwrap();
    let rect = getattr!(py, patches, "Rectangle")
        .call(py, (), Some(kwargs))
        .map_err(Error::Python)?;
    ax.call_method1(py, intern!(py, "add_patch"), (rect,))
        .map_err(Error::Python)?;
    Ok(())
}

/// Apply `options` to one axes of a prepared figure.
///
/// Labels, locators, tick visibility, the title, the legend, margins,
/// limits, backgrounds and text annotations are set in that order; any
/// legend already on the axes is removed first.  Backgrounds are drawn
/// after the limits so their `None` endpoints pick up the final axis
/// extent.
pub fn adjust(fig: &Figure, ax: &mut Axes, options: &AxesOptions,
              style: &Style) -> Result<(), Error> {
    let matplotlib = pymod!(crate::MATPLOTLIB)?;
    Python::with_gil(|py| style.scoped(py, |py| {
        let ax = &ax.ax;

        let ylabel = match options.hide_y_labels {
            true => String::new(),
            false => axis_label(&options.ylabel, &options.yunit),
        };
        set_label(py, ax, "set_ylabel", &ylabel, options.ylabel_pad)?;
        let xlabel = match options.hide_x_labels {
            true => String::new(),
            false => axis_label(&options.xlabel, &options.xunit),
        };
        set_label(py, ax, "set_xlabel", &xlabel, options.xlabel_pad)?;

        if let Some(locators) = options.y_tick_locators {
            set_locators(py, ax, "yaxis", locators)?;
        }
        if let Some(locators) = options.x_tick_locators {
            set_locators(py, ax, "xaxis", locators)?;
        }

        tick_label_params(py, ax, "y", options.hide_y_ticklabels,
                          options.rotation_y_ticks)?;
        tick_label_params(py, ax, "x", options.hide_x_ticklabels,
                          options.rotation_x_ticks)?;
        tick_visibility(py, ax, "y", !options.hide_y_ticks)?;
        tick_visibility(py, ax, "x", !options.hide_x_ticks)?;

        if let Some(title) = &options.title {
            // Matplotlib scales titles up; pin them to the base size.
            let rc = getattr!(py, matplotlib, "rcParams");
            let size = rc
                .call_method1(py, intern!(py, "__getitem__"),
                              (intern!(py, "font.size"),))
                .map_err(Error::Python)?;
            let kwargs = PyDict::new(py);
            kwargs.set_item(intern!(py, "fontsize"), size).unwrap();
            ax.call_method(py, intern!(py, "set_title"), (title,),
                           Some(kwargs))
                .map_err(Error::Python)?;
        }

        let existing = ax.call_method0(py, intern!(py, "get_legend"))
            .map_err(Error::Python)?;
        if !existing.is_none(py) {
            existing.call_method0(py, intern!(py, "remove"))
                .map_err(Error::Python)?;
        }
        if let Some(legend) = &options.legend {
            draw_legend(py, ax, legend)?;
        }

        let margins = PyDict::new(py);
        for (name, value) in [
            ("left", options.margins.left),
            ("right", options.margins.right),
            ("top", options.margins.top),
            ("bottom", options.margins.bottom),
            ("wspace", options.margins.wspace),
            ("hspace", options.margins.hspace),
        ] {
            if let Some(value) = value {
                margins.set_item(name, value).unwrap();
            }
        }
        if !margins.is_empty() {
            fig.fig.call_method(py, intern!(py, "subplots_adjust"), (),
                                Some(margins))
                .map_err(Error::Python)?;
        }

        if let Some(xlim) = options.xlim {
            ax.call_method1(py, intern!(py, "set_xlim"), (xlim,))
                .map_err(Error::Python)?;
        }
        if let Some(ylim) = options.ylim {
            ax.call_method1(py, intern!(py, "set_ylim"), (ylim,))
                .map_err(Error::Python)?;
        }

        for background in &options.backgrounds {
            draw_background(py, ax, options, background)?;
        }

        for text in &options.texts {
            let kwargs = PyDict::new(py);
            kwargs.set_item(intern!(py, "x"), text.x).unwrap();
            kwargs.set_item(intern!(py, "y"), text.y).unwrap();
            kwargs.set_item(intern!(py, "s"), &text.content).unwrap();
            ax.call_method(py, intern!(py, "text"), (), Some(kwargs))
                .map_err(Error::Python)?;
        }
        Ok(())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{prepare, FigureFormat, PaletteFamily};

    #[test]
    fn labels_carry_optional_units() {
        let label = Some("Voltage".to_string());
        assert_eq!(axis_label(&label, &Some("V".to_string())),
                   "Voltage [V]");
        assert_eq!(axis_label(&label, &None), "Voltage");
        assert_eq!(axis_label(&None, &Some("V".to_string())), "");
    }

    #[test]
    fn defaults_match_the_publication_conventions() {
        let options = AxesOptions::default();
        assert_eq!(options.xlabel_pad, 4.0);
        assert_eq!(options.ylabel_pad, 4.0);
        assert!(options.backgrounds.is_empty());
        assert!(options.legend.is_none());
        let background = Background::default();
        assert_eq!(background.alpha, 0.2);
        assert_eq!(background.colour, Colour::default());
        assert_eq!(background.zorder, 0);
        let position = LegendPosition::default();
        assert_eq!(position.loc, "lower center");
        assert_eq!(position.anchor, (0.5, -0.1));
    }

    #[test]
    fn options_round_trip_through_json() -> Result<(), serde_json::Error> {
        let options = AxesOptions {
            xlabel: Some("Time".to_string()),
            xunit: Some("s".to_string()),
            x_tick_locators: Some((10., 5.)),
            backgrounds: vec![Background {
                xlim: (Some(2.), None),
                ..Default::default()
            }],
            legend: Some(LegendOptions::new(
                ["a", "_", "b"],
                ColourSource::Palettes(vec![PaletteSpec::new(
                    PaletteFamily::Qualitative, "Set2", 3)]))),
            ..Default::default()
        };
        let json = serde_json::to_string(&options)?;
        assert_eq!(serde_json::from_str::<AxesOptions>(&json)?, options);
        Ok(())
    }

    #[test]
    fn adjust_a_full_dressing() -> Result<(), Error> {
        let (fig, [[mut ax]]) =
            match prepare::<1, 1>(&FigureFormat::default(), &Style::new()) {
                Err(Error::NoMatplotlib) => return Ok(()),
                result => result?,
            };
        ax.xy(&[0., 1., 2.], &[1., 0., 2.]).plot();
        let options = AxesOptions {
            xlabel: Some("Time".to_string()),
            xunit: Some("s".to_string()),
            ylabel: Some("Signal".to_string()),
            title: Some("A run".to_string()),
            x_tick_locators: Some((1., 0.5)),
            rotation_x_ticks: 45.,
            hide_y_ticklabels: true,
            xlim: Some((0., 2.)),
            backgrounds: vec![Background {
                xlim: (Some(0.5), Some(1.5)),
                ..Default::default()
            }],
            legend: Some(LegendOptions::new(
                ["run", "_"],
                ColourSource::Colours(vec![Colour::new(0.2, 0.4, 0.6)]))),
            texts: vec![Text::new("peak", 1., 1.8)],
            margins: Margins { bottom: Some(0.15), ..Default::default() },
            ..Default::default()
        };
        adjust(&fig, &mut ax, &options, &Style::new().font_size(8.))?;
        fig.close()?;
        Ok(())
    }

    #[test]
    fn legend_without_colours_is_rejected() -> Result<(), Error> {
        let (fig, [[mut ax]]) =
            match prepare::<1, 1>(&FigureFormat::default(), &Style::new()) {
                Err(Error::NoMatplotlib) => return Ok(()),
                result => result?,
            };
        let options = AxesOptions {
            legend: Some(LegendOptions::new(
                ["run"], ColourSource::Colours(vec![]))),
            ..Default::default()
        };
        let result = adjust(&fig, &mut ax, &options, &Style::new());
        assert!(matches!(result, Err(Error::InvalidOption(_))));
        fig.close()?;
        Ok(())
    }
}
