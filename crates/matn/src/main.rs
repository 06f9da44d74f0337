use anyhow::Result;
use imlo::{sanitize, Direction, Transliterator};
use log::LevelFilter;
use matn::config::{Config, DirectionSetting};
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const USAGE: &str = "\
Usage: matn [--to-cyrillic | --to-latin | --auto] [--plain] [--sanitize] [FILE]

Transliterate Uzbek text between Latin and Cyrillic script. Reads FILE, or
standard input when FILE is omitted or '-', and writes the result to standard
output. HTML tags and entities are preserved unless --plain is given.";

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    direction: Option<DirectionSetting>,
    plain: bool,
    sanitize: bool,
    input: Option<PathBuf>,
    help: bool,
}

fn parse_args<I>(args: I) -> Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();

    for arg in args {
        match arg.as_str() {
            "--to-cyrillic" => options.direction = Some(DirectionSetting::LatinToCyrillic),
            "--to-latin" => options.direction = Some(DirectionSetting::CyrillicToLatin),
            "--auto" => options.direction = Some(DirectionSetting::Auto),
            "--plain" => options.plain = true,
            "--sanitize" => options.sanitize = true,
            "-h" | "--help" => options.help = true,
            "-" => options.input = None,
            flag if flag.starts_with("--") => {
                return Err(anyhow::anyhow!("Unknown option: {}", flag));
            }
            path => {
                if options.input.is_some() {
                    return Err(anyhow::anyhow!("Only one input file is supported"));
                }
                options.input = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}

fn resolve_direction(setting: DirectionSetting, text: &str) -> Option<Direction> {
    setting
        .fixed()
        .or_else(|| Direction::for_script(imlo::detect(text)))
}

fn convert(text: &str, direction: Direction, plain: bool) -> String {
    let transliterator = Transliterator::new(direction);
    if plain {
        transliterator.transliterate_text(text)
    } else {
        transliterator.transliterate(text)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("matn", LevelFilter::Debug);
    }
    logger.init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return Err(e);
        }
    };
    if options.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load().await?;
    let setting = options
        .direction
        .unwrap_or(config.transliteration.direction);
    let plain = options.plain || !config.transliteration.preserve_markup;

    let input = match &options.input {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            anyhow::anyhow!("Failed to read input file: {} - {}", path.display(), e)
        })?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };

    let mut output = match resolve_direction(setting, &input) {
        Some(direction) => {
            log::info!("Transliterating {} bytes ({:?})", input.len(), direction);
            convert(&input, direction, plain)
        }
        None => {
            log::warn!("Could not determine the script of the input, leaving it unchanged");
            input
        }
    };

    if options.sanitize {
        output = sanitize::sanitize_editor_html(&output);
    }

    let mut stdout = tokio::io::stdout();
    stdout.write_all(output.as_bytes()).await?;
    stdout.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let options = parse_args(args(&[])).unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_parse_args_flags_and_file() {
        let options = parse_args(args(&["--to-latin", "--plain", "maqola.html"])).unwrap();
        assert_eq!(options.direction, Some(DirectionSetting::CyrillicToLatin));
        assert!(options.plain);
        assert!(!options.sanitize);
        assert_eq!(options.input, Some(PathBuf::from("maqola.html")));
    }

    #[test]
    fn test_parse_args_rejects_unknown_and_extra() {
        assert!(parse_args(args(&["--reverse"])).is_err());
        assert!(parse_args(args(&["a.html", "b.html"])).is_err());
    }

    #[test]
    fn test_resolve_direction() {
        assert_eq!(
            resolve_direction(DirectionSetting::LatinToCyrillic, "Шаҳар"),
            Some(Direction::LatinToCyrillic)
        );
        assert_eq!(
            resolve_direction(DirectionSetting::Auto, "Шаҳар"),
            Some(Direction::CyrillicToLatin)
        );
        assert_eq!(resolve_direction(DirectionSetting::Auto, "42"), None);
    }

    #[test]
    fn test_convert_modes() {
        assert_eq!(
            convert("<b>gul</b>", Direction::LatinToCyrillic, false),
            "<b>гул</b>"
        );
        assert_eq!(
            convert("<b>gul</b>", Direction::LatinToCyrillic, true),
            "<б>гул</б>"
        );
    }
}
