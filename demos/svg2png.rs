//! Render drawing document into PNG image
//!
//! Usage: `svg2png <input.svg> <output.png> [config.json]`
use inkpath::{DrawingScene, SceneConfig, Size, SvgDocument, render, write_png};
use std::{env, fs::File, io::BufWriter};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        return Err("usage: svg2png <input.svg> <output.png> [config.json]".into());
    };
    let config = match args.next() {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    let doc = SvgDocument::load(File::open(&input)?)?;
    let mut scene = DrawingScene::new(&config);
    scene.load_document(&doc);
    tracing::info!(strokes = scene.strokes().len(), %input, "document loaded");

    let image = render(&scene, Size::new(doc.width as usize, doc.height as usize));
    write_png(&image, BufWriter::new(File::create(&output)?))?;
    tracing::info!(%output, "image written");
    Ok(())
}
