use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const PATTERN: &str = "[{d(%Y-%m-%d %H:%M:%S)}][{l}] {m}{n}";

// Logs to the console and to `path`. The file (and its directory) is created
// if missing and appended to otherwise.
pub fn configure_logger(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    configure_logger_with_level(path, LevelFilter::Info)
}

pub fn configure_logger_with_level(
    path: &str,
    level: LevelFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(level),
        )?;

    log4rs::init_config(config)?;
    Ok(())
}

// Level names as accepted by `log` ("info", "DEBUG", ...); Info when unset
pub fn parse_level(name: Option<&str>) -> Result<LevelFilter, log::ParseLevelError> {
    match name {
        Some(name) => name.parse(),
        None => Ok(LevelFilter::Info),
    }
}
