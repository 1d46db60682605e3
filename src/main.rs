use std::path::{Path, PathBuf};
use std::process::ExitCode;

use textdust::{Color, EffectConfig, FieldBuilder, FontRasterizer, Simulation, SimulationError};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: textdust [TEXT] [--color HEX] [--config FILE] [--font FILE] [--seed N] [--dump-mask FILE]

  TEXT              text to show (default: HELLO)
  --color HEX       particle color, e.g. #a78bfa
  --config FILE     load settings from a JSON file
  --font FILE       render with this font instead of the system sans-serif
  --seed N          make particle sizes and opacities reproducible
  --dump-mask FILE  write the rasterized text as a PNG and exit

Enter submits typed text, Backspace edits it, Escape pauses.
Set RUST_LOG=debug for more output.";

/// Canvas size used for `--dump-mask`, matching the initial window.
const DUMP_SIZE: (u32, u32) = (1280, 720);

#[derive(Debug, Default)]
struct Args {
    text: Option<String>,
    color: Option<String>,
    config: Option<PathBuf>,
    font: Option<PathBuf>,
    seed: Option<u64>,
    dump_mask: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match arg.as_str() {
            "--color" => parsed.color = Some(value("--color")?),
            "--config" => parsed.config = Some(value("--config")?.into()),
            "--font" => parsed.font = Some(value("--font")?.into()),
            "--seed" => {
                let seed = value("--seed")?;
                parsed.seed = Some(seed.parse().map_err(|_| format!("invalid seed: {seed}"))?);
            }
            "--dump-mask" => parsed.dump_mask = Some(value("--dump-mask")?.into()),
            "-h" | "--help" => return Err(String::new()),
            flag if flag.starts_with("--") => return Err(format!("unknown option: {flag}")),
            text if parsed.text.is_none() => parsed.text = Some(text.to_string()),
            extra => return Err(format!("unexpected argument: {extra}")),
        }
    }

    Ok(parsed)
}

fn build_simulation(args: &Args) -> Result<Simulation, SimulationError> {
    let mut simulation = match &args.config {
        Some(path) => Simulation::from_config_file(path)?,
        None => Simulation::new(),
    };

    if let Some(text) = &args.text {
        simulation = simulation.with_text(text.clone());
    }
    if let Some(hex) = &args.color {
        simulation = simulation.with_color(Color::from_hex(hex)?);
    }
    if let Some(font) = &args.font {
        simulation = simulation.with_font(font.clone());
    }
    if let Some(seed) = args.seed {
        simulation = simulation.with_seed(seed);
    }

    Ok(simulation)
}

fn dump_mask(config: &EffectConfig, path: &Path) -> Result<(), SimulationError> {
    let rasterizer = FontRasterizer::new(config.font.as_deref())?;
    let text = config.text.to_uppercase();
    let mut builder = FieldBuilder::new(rasterizer, config.clone());

    let (width, height) = DUMP_SIZE;
    let mask = builder.rasterize(&text, width, height);
    let field = builder.sample(&mask, config.color);
    mask.save_png(path)?;

    tracing::info!(
        "Wrote {}x{} mask for {:?} to {} ({} particles)",
        width,
        height,
        text,
        path.display(),
        field.len()
    );
    Ok(())
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let simulation = build_simulation(args)?;
    match &args.dump_mask {
        Some(path) => dump_mask(simulation.config(), path),
        None => simulation.run(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("textdust: {message}");
            }
            eprintln!("{USAGE}");
            return if message.is_empty() { ExitCode::SUCCESS } else { ExitCode::from(2) };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full() {
        let parsed = parse_args(&args(&[
            "rust", "--color", "#ff0000", "--seed", "9", "--dump-mask", "out.png",
        ]))
        .unwrap();
        assert_eq!(parsed.text.as_deref(), Some("rust"));
        assert_eq!(parsed.color.as_deref(), Some("#ff0000"));
        assert_eq!(parsed.seed, Some(9));
        assert_eq!(parsed.dump_mask, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--seed"])).is_err());
        assert!(parse_args(&args(&["--seed", "x"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["one", "two"])).is_err());
    }

    #[test]
    fn test_config_overrides() {
        let parsed = parse_args(&args(&["hi", "--color", "112233", "--seed", "4"])).unwrap();
        let simulation = build_simulation(&parsed).unwrap();
        let config = simulation.config();
        assert_eq!(config.text, "hi");
        assert_eq!(config.color, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(config.seed, Some(4));
    }

    #[test]
    fn test_bad_color_rejected() {
        let parsed = parse_args(&args(&["--color", "purple"])).unwrap();
        assert!(matches!(build_simulation(&parsed), Err(SimulationError::Color(_))));
    }

    #[test]
    fn test_missing_config_file_is_typed() {
        let parsed = parse_args(&args(&["--config", "/nonexistent/textdust.json"])).unwrap();
        assert!(matches!(build_simulation(&parsed), Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_config_file_then_overrides() {
        let path = std::env::temp_dir().join(format!("textdust-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "text": "file", "seed": 1 }"#).unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let parsed = parse_args(&args(&["--config", &path_arg, "--seed", "2"])).unwrap();
        let simulation = build_simulation(&parsed).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(simulation.config().text, "file");
        assert_eq!(simulation.config().seed, Some(2));
    }
}
