// Render a travelling wave frame by frame and export a looping GIF.

use std::error::Error;
use pubplot::{
    adjust, make_animation, prepare, AnimationOptions, AxesOptions,
    FigureFormat, Style,
};

fn main() -> Result<(), Box<dyn Error>> {
    let style = Style::new().font_size(8.);
    let format = FigureFormat { dpi: 100., ..Default::default() };
    let x: Vec<_> = (0..200).map(|i| i as f64 / 20.).collect();

    let mut frames = vec![];
    for step in 0..20 {
        let phase = step as f64 * std::f64::consts::TAU / 20.;
        let y: Vec<_> = x.iter().map(|x| (x - phase).sin()).collect();
        let (fig, [[mut ax]]) = prepare::<1, 1>(&format, &style)?;
        ax.xy(&x, &y).plot();
        adjust(&fig, &mut ax, &AxesOptions {
            ylim: Some((-1.2, 1.2)),
            ..Default::default()
        }, &style)?;
        let path = format!("target/wave_frame{step:02}.png");
        fig.save().to_file(&path)?;
        fig.close()?;
        frames.push(path);
    }

    let options = AnimationOptions {
        save_folder: "target".into(),
        save_filename: "wave.gif".to_string(),
        fps: 10,
    };
    let gif = make_animation(&frames, &options)?;
    println!("wrote {}", gif.display());
    Ok(())
}
