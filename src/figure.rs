//! Figure preparation, display and saving.

use std::path::Path;
use pyo3::{
    prelude::*,
    intern,
    exceptions::{PyFileNotFoundError, PyPermissionError},
    types::PyDict,
};
use numpy::{PyArray1, PyArray2};
use crate::{Error, FigureFormat, Style};

/// The top level container for all the plot elements.
#[derive(Debug)]
pub struct Figure {
    pub(crate) fig: PyObject, // instance of matplotlib.figure.Figure
}

/// One set of axes of a [`Figure`].
#[derive(Debug, Clone)]
pub struct Axes {
    pub(crate) ax: PyObject,
}

#[inline(always)]
fn grid<const R: usize, const C: usize, U>(
    f: impl Fn(usize, usize) -> U) -> [[U; C]; R] {
    let mut r = 0;
    [(); R].map(|_| {
        let mut c = 0;
        let row = [(); C].map(|_| {
            let y = f(r, c);
            c += 1;
            y });
        r += 1;
        row })
}

fn ratios_for<const N: usize>(name: &str, ratios: &Option<Vec<f64>>)
                              -> Result<Vec<f64>, Error> {
    match ratios {
        Some(ratios) if ratios.len() != N => Err(Error::InvalidOption(
            format!("{name} holds {} entries for {N} panels",
                    ratios.len()))),
        Some(ratios) => Ok(ratios.clone()),
        None => Ok(vec![1.; N]),
    }
}

/// Create a figure of `R` × `C` panels sized for a journal column.
///
/// The figure size and resolution come from `format` (see
/// [`FigureFormat::size`]), the styling from `style`.  For multi-panel
/// layouts the relative panel sizes follow
/// [`grid_height_ratios`](FigureFormat::grid_height_ratios) and
/// [`grid_width_ratios`](FigureFormat::grid_width_ratios), whose
/// lengths must match `R` and `C`; `None` gives equally sized panels.
///
/// # Example
///
/// ```no_run
/// use pubplot::{prepare, FigureFormat, Style};
/// let (fig, [[mut top], [mut bottom]]) =
///     prepare::<2, 1>(&FigureFormat::default(), &Style::new())?;
/// # Ok::<(), pubplot::Error>(())
/// ```
pub fn prepare<const R: usize, const C: usize>(
    format: &FigureFormat, style: &Style)
    -> Result<(Figure, [[Axes; C]; R]), Error>
{
    if R == 0 || C == 0 {
        return Err(Error::InvalidOption(
            "a figure needs at least one row and one column".to_string()));
    }
    let (width, height) = format.size()?;
    let height_ratios = ratios_for::<R>("grid_height_ratios",
                                        &format.grid_height_ratios)?;
    let width_ratios = ratios_for::<C>("grid_width_ratios",
                                       &format.grid_width_ratios)?;
    let pyplot = pymod!(crate::PYPLOT)?;
    Python::with_gil(|py| style.scoped(py, |py| {
        let kwargs = PyDict::new(py);
        kwargs.set_item(intern!(py, "figsize"), (width, height)).unwrap();
        kwargs.set_item(intern!(py, "dpi"), format.dpi).unwrap();
        if R > 1 || C > 1 {
            let gridspec = PyDict::new(py);
            gridspec.set_item(intern!(py, "height_ratios"),
                              &height_ratios).unwrap();
            gridspec.set_item(intern!(py, "width_ratios"),
                              &width_ratios).unwrap();
            kwargs.set_item(intern!(py, "gridspec_kw"), gridspec).unwrap();
        }
        let result = getattr!(py, pyplot, "subplots")
            .call(py, (R, C), Some(kwargs))
            .map_err(Error::Python)?;
        let (fig, axs): (PyObject, PyObject) =
            result.extract(py).map_err(Error::Python)?;
        let axes;
        if R == 1 {
            if C == 1 {
                axes = grid(|_, _| Axes { ax: axs.clone() });
            } else { // C > 1
                let axg: &PyArray1<PyObject> = axs.downcast(py).unwrap();
                axes = grid(|_, c| {
                    let ax = axg.get_owned(c).unwrap();
                    Axes { ax } });
            }
        } else { // R > 1
            if C == 1 {
                let axg: &PyArray1<PyObject> = axs.downcast(py).unwrap();
                axes = grid(|r, _| {
                    let ax = axg.get_owned(r).unwrap();
                    Axes { ax } });
            } else { // C > 1
                let axg: &PyArray2<PyObject> = axs.downcast(py).unwrap();
                axes = grid(|r, c| {
                    let ax = axg.get_owned([r, c]).unwrap();
                    Axes { ax } });
            }
        }
        tracing::debug!(rows = R, cols = C, width, height,
                        dpi = format.dpi, "prepared figure");
        Ok((Figure { fig }, axes))
    }))
}

impl Figure {
    /// If using a GUI backend with pyplot, display the figure window.
    ///
    /// ⚠ [This does not manage an GUI event loop][GUI]. Consequently,
    /// the figure may only be shown briefly or not shown at all if
    /// you or your environment are not managing an event loop.  Use
    /// [`pubplot::show()`](crate::show) for that.
    ///
    /// [GUI]: https://matplotlib.org/stable/api/figure_api.html#matplotlib.figure.Figure.show
    pub fn show(self) -> Result<(), Error> {
        Python::with_gil(|py|
            match self.fig.call_method0(py, intern!(py, "show")) {
                Ok(_) => Ok(()),
                Err(e) => Err(Error::Python(e)),
            })
    }

    /// Release the pyplot window backing this figure.  Frame loops
    /// that save many figures in a row should close each one to keep
    /// pyplot's figure registry from growing.
    pub fn close(self) -> Result<(), Error> {
        let pyplot = pymod!(crate::PYPLOT)?;
        Python::with_gil(|py| {
            getattr!(py, pyplot, "close")
                .call1(py, (&self.fig,))
                .map_err(Error::Python)?;
            Ok(())
        })
    }

    pub fn save(&self) -> Savefig {
        Savefig { fig: self.fig.clone(), dpi: None, style: None }
    }
}

/// Options for saving a [`Figure`], created by [`Figure::save`].
pub struct Savefig {
    fig: PyObject,
    dpi: Option<f64>,
    style: Option<Style>,
}

impl Savefig {
    pub fn dpi(&mut self, dpi: f64) -> &mut Self {
        if dpi > 0. {
            self.dpi = Some(dpi);
        } else {
            self.dpi = None;
        }
        self
    }

    /// Render the file under `style` (e.g. for an export-only
    /// background colour).
    pub fn style(&mut self, style: &Style) -> &mut Self {
        self.style = Some(style.clone());
        self
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        Python::with_gil(|py| {
            let savefig = |py: Python<'_>| {
                let kwargs = PyDict::new(py);
                if let Some(dpi) = self.dpi {
                    kwargs.set_item(intern!(py, "dpi"), dpi).unwrap()
                }
                self.fig.call_method(
                    py, intern!(py, "savefig"), (path,), Some(kwargs)
                ).map_err(|e| {
                    if e.is_instance_of::<PyFileNotFoundError>(py) {
                        Error::FileNotFoundError
                    } else if e.is_instance_of::<PyPermissionError>(py) {
                        Error::PermissionError
                    } else {
                        Error::Python(e)
                    }
                })
            };
            match &self.style {
                Some(style) => style.scoped(py, |py| savefig(py)),
                None => savefig(py),
            }
        })?;
        tracing::debug!(path = %path.display(), dpi = self.dpi,
                        "saved figure");
        Ok(())
    }
}

/// Display all open figures.
pub fn show() -> Result<(), Error> {
    let pyplot = pymod!(crate::PYPLOT)?;
    Python::with_gil(|py| {
        getattr!(py, pyplot, "show").call0(py).map_err(Error::Python)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Building figures needs a Python with Matplotlib; the tests pass
    // trivially where it is absent.

    #[test]
    fn prepare_single_panel_and_save() -> Result<(), Error> {
        let format = FigureFormat::default();
        let (fig, [[_ax]]) = match prepare::<1, 1>(&format, &Style::new()) {
            Err(Error::NoMatplotlib) => return Ok(()),
            result => result?,
        };
        let dir = tempfile::tempdir()?;
        fig.save().to_file(dir.path().join("single.png"))?;
        assert!(dir.path().join("single.png").is_file());
        fig.close()?;
        Ok(())
    }

    #[test]
    fn prepare_grid_with_ratios() -> Result<(), Error> {
        let format = FigureFormat {
            grid_height_ratios: Some(vec![2., 1.]),
            ..Default::default()
        };
        let (fig, [[_a, _b], [_c, _d]]) =
            match prepare::<2, 2>(&format, &Style::new()) {
                Err(Error::NoMatplotlib) => return Ok(()),
                result => result?,
            };
        fig.close()?;
        Ok(())
    }

    #[test]
    fn mismatched_grid_ratios_are_rejected() {
        let format = FigureFormat {
            grid_height_ratios: Some(vec![1., 2., 3.]),
            ..Default::default()
        };
        assert!(matches!(prepare::<2, 1>(&format, &Style::new()),
                         Err(Error::InvalidOption(_))));
    }

    #[test]
    fn saving_to_a_missing_directory_fails() -> Result<(), Error> {
        let (fig, [[_ax]]) =
            match prepare::<1, 1>(&FigureFormat::default(), &Style::new()) {
                Err(Error::NoMatplotlib) => return Ok(()),
                result => result?,
            };
        let result = fig.save().to_file("no/such/directory/figure.png");
        assert!(matches!(result, Err(Error::FileNotFoundError)));
        fig.close()?;
        Ok(())
    }
}
