// A figure with an inset magnifying part of the data.

use std::error::Error;
use pubplot::{
    adjust, prepare, AxesOptions, Colour, Connectors, FigureFormat,
    InsetOptions, Style,
};

fn main() -> Result<(), Box<dyn Error>> {
    let style = Style::new().font_size(8.);
    let (fig, [[mut ax]]) = prepare::<1, 1>(&FigureFormat::default(),
                                            &style)?;

    let x: Vec<_> = (0..=400).map(|i| i as f64).collect();
    let y: Vec<_> = x.iter()
        .map(|x| (x / 40.).sin() * (-x / 300.).exp() * 30.)
        .collect();
    let colour = Colour::from_u8(31, 119, 180);
    ax.xy(&x, &y).colour(colour).plot();
    adjust(&fig, &mut ax, &AxesOptions {
        xlabel: Some("Position".to_string()),
        ylabel: Some("Deflection".to_string()),
        ..Default::default()
    }, &style)?;

    let options = InsetOptions {
        position: [0.55, 0.55, 0.4, 0.4],
        connectors: Connectors::Two(1, 2),
        ..Default::default()
    };
    let mut inset = ax.inset(&fig, &options, &style)?;
    inset.xy(&x[..100], &y[..100]).colour(colour).plot();

    fig.save().to_file("target/inset_detail.png")?;
    Ok(())
}
