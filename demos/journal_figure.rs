// A single-column journal figure with a legend and a shaded region.

use std::error::Error;
use pubplot::{
    adjust, palette, prepare, AxesOptions, Background, ColourSource,
    FigureFormat, LegendOptions, PaletteFamily, Style,
};

fn main() -> Result<(), Box<dyn Error>> {
    let format = FigureFormat {
        aspect_ratio: "4:3".parse()?,
        ..Default::default()
    };
    let style = Style::new().font_family("serif").font_size(8.);
    let (fig, [[mut ax]]) = prepare::<1, 1>(&format, &style)?;

    let x: Vec<_> = (0..200).map(|i| i as f64 / 20.).collect();
    let sin: Vec<_> = x.iter().map(|x| x.sin()).collect();
    let cos: Vec<_> = x.iter().map(|x| x.cos()).collect();
    let colours = palette(PaletteFamily::Qualitative, "Set2", 2)?;
    ax.xy(&x, &sin).colour(colours[0]).plot();
    ax.xy(&x, &cos).colour(colours[1]).plot();

    let options = AxesOptions {
        xlabel: Some("Time".to_string()),
        xunit: Some("s".to_string()),
        ylabel: Some("Amplitude".to_string()),
        x_tick_locators: Some((2., 1.)),
        y_tick_locators: Some((0.5, 0.25)),
        backgrounds: vec![Background {
            xlim: (Some(4.), Some(6.)),
            ..Default::default()
        }],
        legend: Some(LegendOptions::new(
            ["sin", "cos"], ColourSource::Colours(colours))),
        ..Default::default()
    };
    adjust(&fig, &mut ax, &options, &style)?;
    fig.save().to_file("target/journal_figure.png")?;
    Ok(())
}
