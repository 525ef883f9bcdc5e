use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use glyphsmith::{
    compile_font, compile_optimized, filters::optimize, CompilationOptions, FontFormat,
    GlyphsmithError,
};

fn command() -> Command {
    Command::new("glyphsmith")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile generated SVG glyphs into OTF or WOFF2 fonts")
        .author("Theme Token Developers")
        .arg(
            Arg::new("input")
                .help("Path to the font data JSON file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Path to the output font file (.otf, .ttf or .woff2)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .help("Set the level of verbosity")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("no_optimize")
                .long("no-optimize")
                .help("Skip glyph repair and kerning generation")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no_kerning")
                .long("no-kerning")
                .help("Do not write a kern table")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("otf")
                .long("otf")
                .help("Write OpenType whatever the output extension")
                .action(ArgAction::SetTrue)
                .conflicts_with("woff2"),
        )
        .arg(
            Arg::new("woff2")
                .long("woff2")
                .help("Write WOFF2 whatever the output extension")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("metadata")
                .long("metadata")
                .help("Print the compiled font's metadata as JSON")
                .action(ArgAction::SetTrue),
        )
}

fn output_format(args: &ArgMatches, output: &std::path::Path) -> Result<FontFormat, String> {
    if args.get_flag("otf") {
        return Ok(FontFormat::Otf);
    }
    if args.get_flag("woff2") {
        return Ok(FontFormat::Woff2);
    }
    output
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(FontFormat::from_extension)
        .ok_or_else(|| {
            format!(
                "Cannot tell the output format from {}; use .otf, .ttf or .woff2",
                output.display()
            )
        })
}

fn run(args: &ArgMatches) -> Result<(), GlyphsmithError> {
    let input_name = args
        .get_one::<String>("input")
        .map(PathBuf::from)
        .unwrap_or_default();
    let output_name = args
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_default();
    let format = output_format(args, &output_name).map_err(GlyphsmithError::InvalidFontData)?;

    log::info!("Loading {}", input_name.display());
    let font_data = glyphsmith::load(&input_name)?;

    let compiled = if args.get_flag("no_optimize") {
        compile_font(&font_data)?
    } else {
        let before_filters = std::time::Instant::now();
        let optimized = optimize(&font_data)?;
        log::info!("Applied filters in {:.2?}", before_filters.elapsed());
        let options = CompilationOptions {
            skip_kerning: args.get_flag("no_kerning"),
            ..Default::default()
        };
        compile_optimized(&optimized, &options)?
    };

    log::info!("Saving {}", output_name.display());
    std::fs::write(&output_name, compiled.bytes(format))?;
    if args.get_flag("metadata") {
        println!("{}", serde_json::to_string_pretty(&compiled.metadata)?);
    }
    Ok(())
}

fn main() {
    let args = command().get_matches();
    env_logger::Builder::new()
        .filter_level(match args.get_count("verbosity") {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
