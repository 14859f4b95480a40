//! Publication-quality [Matplotlib][] figures from [Rust][].
//!
//! Usage
//! -----
//!
//! This crate is a thin convenience layer over [Matplotlib][]: it
//! derives figure dimensions from journal column widths and ratio
//! strings ([`FigureFormat`]), applies styling without touching the
//! process-wide `rcParams` ([`Style`]), dresses axes, legends,
//! backgrounds and insets from typed option structs ([`AxesOptions`],
//! [`InsetOptions`]), cycles ColorBrewer palettes ([`palette`],
//! [`ColourCycle`]), and assembles saved frames into a looping GIF
//! ([`make_animation`]).  Free-form option mappings can be merged
//! against defaults and persisted as JSON ([`Options`]).
//!
//! The usual pipeline is [`prepare`] → plot data on the [`Axes`] →
//! [`adjust`] → [`Figure::save`].
//!
//! [Rust]: https://www.rust-lang.org/
//! [Matplotlib]: https://matplotlib.org/

use std::fmt::{Display, Formatter};
use lazy_static::lazy_static;
use pyo3::{prelude::*, intern};

macro_rules! getattr {
    ($py: ident, $lib: expr, $f: literal) => {
        $lib.getattr($py, pyo3::intern!($py, $f)).unwrap()
    };
}

macro_rules! meth {
    ($obj: expr, $m: ident, $py: ident -> $args: expr,
     $e: ident -> $err: expr) => {
        Python::with_gil(|py| {
            let $py = py;
            $obj.call_method1(py, intern!(py, stringify!($m)), $args)
                .map_err(|$e| $err)
        })
    };
    ($obj: expr, $m: ident, $py: ident -> $args: expr) => {
        Python::with_gil(|py| {
            let $py = py;
            $obj.call_method1(py, intern!(py, stringify!($m)), $args)
        })
    };
    ($obj: expr, $m: ident, $args: expr) => {
        Python::with_gil(|py| {
            $obj.call_method1(py, intern!(py, stringify!($m)), $args)
        })
    };
}

/// Import and return a handle to the module `$m`.
macro_rules! pyimport { ($m: literal) => {
    Python::with_gil(|py|
        PyModule::import(py, intern!(py, $m)).map(|m| m.into()))
}}

/// Return a handle to the module `$m`.
/// ⚠ This may try to lock Python's GIL.  Make sure it is executed
/// outside a call to `Python::with_gil`.
macro_rules! pymod { ($m: expr) => {
    $m.as_ref().map_err(|_| $crate::Error::NoMatplotlib)
}}

mod animation;
mod axes;
mod colours;
mod figure;
mod geometry;
mod inset;
mod options;
mod plot;
mod style;

pub use animation::{make_animation, AnimationOptions};
pub use axes::{
    adjust, AxesOptions, Background, ColourSource, LegendOptions,
    LegendPosition, Margins, Text,
};
pub use colours::{
    mix, palette, Colour, ColourCycle, MixOptions, PaletteFamily,
    PaletteSpec,
};
pub use figure::{prepare, show, Axes, Figure, Savefig};
pub use geometry::{ColumnType, FigureFormat, Ratio, CM_PER_INCH};
pub use inset::{Connectors, InsetOptions};
pub use options::{Options, REDACTED};
pub use plot::XY;
pub use style::Style;

/// Possible errors of pubplot functions.
#[derive(Debug)]
pub enum Error {
    /// The Python library "matplotlib" was not found.
    NoMatplotlib,
    /// The path contains an element that is not a directory or does
    /// not exist.
    FileNotFoundError,
    /// Permission denied to access or create the filesystem path.
    PermissionError,
    /// A ratio string was not of the form `"a:b"` with both parts
    /// positive numbers.
    InvalidRatio(String),
    /// No palette with this name exists in the requested family.
    UnknownPalette {
        family: PaletteFamily,
        name: String,
    },
    /// An option value failed validation.
    InvalidOption(String),
    /// Filesystem failure while persisting or loading options.
    Io(std::io::Error),
    /// A persisted options file could not be parsed.
    Json(serde_json::Error),
    /// Failure while reading frames or encoding an animation.
    Image(image::ImageError),
    /// Other Python errors.
    Python(PyErr),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::NoMatplotlib =>
                write!(f, "The matplotlib library has not been found.\n\
Please install it.  See https://matplotlib.org/\n\
If you use Anaconda, see https://github.com/PyO3/pyo3/issues/1554"),
            Error::FileNotFoundError =>
                write!(f, "A path contains an element that is not a \
                           directory or does not exist"),
            Error::PermissionError =>
                write!(f, "Permission denied to access or create the \
                           filesystem path"),
            Error::InvalidRatio(s) =>
                write!(f, "Invalid ratio {s:?}: expected \"a:b\" with \
                           both parts positive numbers"),
            Error::UnknownPalette { family, name } =>
                write!(f, "No {} palette named {name:?}", family.as_str()),
            Error::InvalidOption(msg) =>
                write!(f, "Invalid option: {msg}"),
            Error::Io(e) =>
                write!(f, "I/O error: {e}"),
            Error::Json(e) =>
                write!(f, "Malformed options file: {e}"),
            Error::Image(e) =>
                write!(f, "Image error: {e}"),
            Error::Python(e) =>
                write!(f, "Python error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e)
    }
}

lazy_static! {
    // Import matplotlib modules.
    static ref MATPLOTLIB: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib")
    };
    static ref PYPLOT: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.pyplot")
    };
    static ref TICKER: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.ticker")
    };
    static ref LINES: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.lines")
    };
    static ref PATCHES: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.patches")
    };
    static ref TRANSFORMS: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.transforms")
    };
    static ref INSET_LOCATOR: Result<Py<PyModule>, PyErr> = {
        pyimport!("mpl_toolkits.axes_grid1.inset_locator")
    };
    static ref NUMPY: Result<Numpy, PyErr> = {
        Ok(Numpy {
            numpy: pyimport!("numpy.ctypeslib")?,
            ctypes: pyimport!("ctypes")?,
        })
    };
}

/// Represent a "connection" to the `numpy` module to be able to
/// perform copy-free conversions of data.
#[derive(Clone)]
pub struct Numpy {
    numpy: Py<PyModule>,
    ctypes: Py<PyModule>,
}

/// Trait expressing that `Self` can be converted to a numpy.ndarray
/// (without copying).  `Numpy` is a handle to the numpy library.
pub trait Data {
    fn to_numpy(&self, py: Python, p: &Numpy) -> PyObject;
}

impl<T> Data for T where T: AsRef<[f64]> + ?Sized {
    fn to_numpy(&self, py: Python, p: &Numpy) -> PyObject {
        let x = self.as_ref();
        // ctypes.POINTER(ctypes.c_double)
        let ty = getattr!(py, p.ctypes, "POINTER")
            .call1(py, (getattr!(py, p.ctypes, "c_double"),)).unwrap();
        // ctypes.cast(x.as_ptr(), ty)
        let ptr = getattr!(py, p.ctypes, "cast")
            .call1(py, (x.as_ptr() as usize, ty)).unwrap();
        // numpy.ctypeslib.as_array(ptr, shape=(x.len(),))
        getattr!(py, p.numpy, "as_array")
            .call1(py, (ptr, (x.len(),))).unwrap()
    }
}

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offender() {
        let e = Error::InvalidRatio("1;2".to_string());
        assert!(e.to_string().contains("1;2"));
        let e = Error::UnknownPalette {
            family: PaletteFamily::Qualitative,
            name: "set99".to_string(),
        };
        assert!(e.to_string().contains("qualitative"));
        assert!(e.to_string().contains("set99"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert!(matches!(Error::from(io), Error::Io(_)));
    }
}
