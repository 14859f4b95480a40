//! Drawing data on an [`Axes`].

use std::mem::swap;
use pyo3::{prelude::*, intern, types::PyDict};
use crate::{Axes, Colour, Data, Numpy};

impl Axes {
    /// Plot `y` versus `x` as lines and/or markers.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubplot::{prepare, FigureFormat, Style};
    /// let (fig, [[mut ax]]) =
    ///     prepare::<1, 1>(&FigureFormat::default(), &Style::new())?;
    /// ax.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.]).plot();
    /// fig.save().to_file("target/xy_plot.pdf")?;
    /// # Ok::<(), pubplot::Error>(())
    /// ```
    #[must_use]
    pub fn xy<'a, D>(&'a mut self, x: &'a D, y: &'a D) -> XY<'a, D>
    where D: Data + ?Sized {
        // The chain leading to plot starts with the data (using this
        // function) so that additional data may be added, sharing
        // common options.  We also mutably borrow `self` to reflect that
        // the final `.plot()` will mutate the underlying Python object.
        XY { axes: self,
             options: PlotOptions::new(),
             data: PlotData::XY(x, y),
             prev_data: vec![] }
    }

    /// Plot `y` versus its indices as lines and/or markers.
    #[must_use]
    pub fn y<'a, D>(&'a mut self, y: &'a D) -> XY<'a, D>
    where D: Data + ?Sized {
        XY { axes: self,
             options: PlotOptions::new(),
             data: PlotData::Y(y),
             prev_data: vec![] }
    }

    /// Draw an unconnected point per `(x, y)` pair.
    #[must_use]
    pub fn scatter<D>(&mut self, x: &D, y: &D) -> &mut Self
    where D: Data + ?Sized {
        let numpy = pymod!(crate::NUMPY).unwrap();
        meth!(self.ax, scatter, py -> {
            let xn = x.to_numpy(py, numpy);
            let yn = y.to_numpy(py, numpy);
            (xn, yn) })
            .unwrap();
        self
    }
}

enum PlotData<'a, D>
where D: ?Sized {
    XY(&'a D, &'a D),
    Y(&'a D),
}

#[derive(Clone)]
struct PlotOptions<'a> {
    fmt: &'a str,
    animated: bool,
    antialiased: bool,
    label: &'a str,
    linewidth: Option<f64>,
    colour: Option<Colour>,
    marker: Option<&'a str>,
}

impl<'a> PlotOptions<'a> {
    fn new() -> PlotOptions<'static> {
        PlotOptions { fmt: "", animated: false, antialiased: true,
                      label: "", linewidth: None, colour: None,
                      marker: None }
    }

    fn kwargs(&'a self, py: Python<'a>) -> &'a PyDict {
        let kwargs = PyDict::new(py);
        if self.animated {
            kwargs.set_item("animated", true).unwrap()
        }
        kwargs.set_item("antialiased", self.antialiased).unwrap();
        if !self.label.is_empty() {
            kwargs.set_item("label", self.label).unwrap()
        }
        if let Some(w) = self.linewidth {
            kwargs.set_item("linewidth", w).unwrap()
        }
        if let Some(c) = self.colour {
            kwargs.set_item("color", c.rgb()).unwrap()
        }
        if let Some(m) = self.marker {
            kwargs.set_item("marker", m).unwrap()
        }
        kwargs
    }

    fn plot_xy<D>(&self, py: Python<'_>, numpy: &Numpy, axes: &Axes,
        x: &D, y: &D)
    where D: Data + ?Sized {
        let xn = x.to_numpy(py, numpy);
        let yn = y.to_numpy(py, numpy);
        axes.ax.call_method(py, "plot", (xn, yn, self.fmt),
                            Some(self.kwargs(py))).unwrap();
    }

    fn plot_y<D>(&self, py: Python<'_>, numpy: &Numpy, axes: &Axes, y: &D)
    where D: Data + ?Sized {
        let yn = y.to_numpy(py, numpy);
        axes.ax.call_method(py, "plot", (yn, self.fmt),
                            Some(self.kwargs(py))).unwrap();
    }

    fn plot_data<D>(&self, py: Python<'_>, numpy: &Numpy, axes: &Axes,
        data: &PlotData<'_, D>)
    where D: Data + ?Sized {
        match data {
            PlotData::XY(x, y) => {
                self.plot_xy(py, numpy, axes, *x, *y) }
            PlotData::Y(y) => {
                self.plot_y(py, numpy, axes, *y) }
        }
    }
}

/// Declare methods to set the options assuming `self.options` exists.
macro_rules! set_plotoptions { () => {
    /// A Matplotlib format string such as `"r."` or `"--"`.
    #[must_use]
    pub fn fmt(mut self, fmt: &'a str) -> Self {
        self.options.fmt = fmt;
        self
    }

    #[must_use]
    pub fn animated(mut self) -> Self {
        self.options.animated = true;
        self
    }

    #[must_use]
    pub fn antialiased(mut self, b: bool) -> Self {
        self.options.antialiased = b;
        self
    }

    /// The label a legend built with
    /// [`LegendOptions`](crate::LegendOptions) or Matplotlib's own
    /// `legend()` shows for this dataset.
    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.options.label = label;
        self
    }

    #[must_use]
    pub fn linewidth(mut self, w: f64) -> Self {
        self.options.linewidth = Some(w);
        self
    }

    /// An explicit line colour, e.g. one drawn from a
    /// [`ColourCycle`](crate::ColourCycle).
    #[must_use]
    pub fn colour(mut self, colour: Colour) -> Self {
        self.options.colour = Some(colour);
        self
    }

    /// A Matplotlib marker such as `"o"` or `"s"`.
    #[must_use]
    pub fn marker(mut self, marker: &'a str) -> Self {
        self.options.marker = Some(marker);
        self
    }
}}

/// A lazy line plot started by [`Axes::xy`] or [`Axes::y`]; nothing is
/// drawn until [`plot`](XY::plot) is called.
pub struct XY<'a, D>
where D: ?Sized {
    axes: &'a Axes,
    // Latest data and its setting.
    options: PlotOptions<'a>,
    data: PlotData<'a, D>,
    // Previous data with their settings.
    prev_data: Vec<(PlotOptions<'a>, PlotData<'a, D>)>,
}

impl<'a, D> XY<'a, D>
where D: Data + ?Sized {
    set_plotoptions!();

    /// Plot the data with the options specified in [`XY`].
    pub fn plot(self) {
        let numpy = pymod!(crate::NUMPY).unwrap();
        Python::with_gil(|py| {
            for (opt, data) in self.prev_data.iter() {
                opt.plot_data(py, numpy, self.axes, data)
            }
            self.options.plot_data(py, numpy, self.axes, &self.data)
        })
    }

    /// Add the dataset (`x`, `y`).
    #[must_use]
    pub fn xy(&mut self, x: &'a D, y: &'a D) -> &mut Self {
        let mut data = PlotData::XY(x, y);
        swap(&mut data, &mut self.data);
        self.prev_data.push((self.options.clone(), data));
        self
    }

    /// Add the dataset `y`.
    #[must_use]
    pub fn y(&mut self, y: &'a D) -> &mut Self {
        let mut data = PlotData::Y(y);
        swap(&mut data, &mut self.data);
        self.prev_data.push((self.options.clone(), data));
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::{prepare, Colour, Error, FigureFormat, Style};

    #[test]
    fn plot_with_colour_and_marker() -> Result<(), Error> {
        let (fig, [[mut ax]]) =
            match prepare::<1, 1>(&FigureFormat::default(), &Style::new()) {
                Err(Error::NoMatplotlib) => return Ok(()),
                result => result?,
            };
        ax.xy(&[1., 2., 3.], &[2., 1., 3.])
            .colour(Colour::new(0.8, 0.2, 0.2))
            .marker("o")
            .label("run 1")
            .plot();
        fig.close()?;
        Ok(())
    }

    #[test]
    fn accumulated_datasets_share_options() -> Result<(), Error> {
        let (fig, [[mut ax]]) =
            match prepare::<1, 1>(&FigureFormat::default(), &Style::new()) {
                Err(Error::NoMatplotlib) => return Ok(()),
                result => result?,
            };
        let x = [0., 1., 2., 3.];
        let y0 = [1., 4., 2., 3.];
        let y1 = [2., 3., 1., 4.];
        let mut chain = ax.xy(&x[..], &y0[..]);
        let _ = chain.xy(&x[..], &y1[..]);
        chain.fmt(".").plot();
        fig.close()?;
        Ok(())
    }
}
