//! Assembling saved frames into a looping GIF.

use std::{
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};
use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, Frame,
};
use serde::{Deserialize, Serialize};
use crate::Error;

/// Where the animation is written and how fast it plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// Directory the file is written to, created if missing.
    pub save_folder: PathBuf,
    pub save_filename: String,
    /// Frames per second; the per-frame delay is `1000 / fps` ms.
    pub fps: u32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        AnimationOptions {
            save_folder: PathBuf::from("."),
            save_filename: "animation.gif".to_string(),
            fps: 5,
        }
    }
}

/// Encode the images at `paths` as one looping GIF, in order, and
/// return the path of the written file.
///
/// Frames may be any still format the `image` crate decodes (the
/// usual case is PNGs saved by [`Savefig`](crate::Savefig) in a frame
/// loop).  The GIF repeats forever.
///
/// ```no_run
/// use pubplot::{make_animation, AnimationOptions};
/// let options = AnimationOptions { fps: 10, ..Default::default() };
/// let gif = make_animation(&["frame0.png", "frame1.png"], &options)?;
/// assert_eq!(gif.file_name().unwrap(), "animation.gif");
/// # Ok::<(), pubplot::Error>(())
/// ```
pub fn make_animation(paths: &[impl AsRef<Path>],
                      options: &AnimationOptions)
                      -> Result<PathBuf, Error> {
    if paths.is_empty() {
        return Err(Error::InvalidOption(
            "an animation needs at least one frame".to_string()));
    }
    if options.fps == 0 {
        return Err(Error::InvalidOption(
            "fps must be at least 1".to_string()));
    }
    fs::create_dir_all(&options.save_folder)?;
    let target = options.save_folder.join(&options.save_filename);
    let file = BufWriter::new(fs::File::create(&target)?);
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite)?;
    let delay = Delay::from_numer_denom_ms(1000, options.fps);
    for path in paths {
        let still = image::open(path.as_ref())?.to_rgba8();
        encoder.encode_frame(Frame::from_parts(still, 0, 0, delay))?;
    }
    tracing::debug!(path = %target.display(), frames = paths.len(),
                    fps = options.fps, "encoded animation");
    Ok(target)
}
