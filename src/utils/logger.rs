use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};

use crate::errors::{MealError, MealResult};

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} - {M} - {l} - {m}{n}";

pub fn init_logger(level: LevelFilter) -> MealResult<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| MealError::Logger(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| MealError::Logger(e.to_string()))?;
    Ok(())
}
