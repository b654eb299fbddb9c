use log::LevelFilter;
use simplelog::{ConfigBuilder, SimpleLogger};

pub fn setup_simple_logger(is_prod: bool) -> anyhow::Result<()> {
    let level = if is_prod {
        LevelFilter::Info
    } else {
        LevelFilter::Debug
    };

    let logger_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("wa_cloud")
        .add_filter_allow_str("wa_cloud_hook")
        .add_filter_allow_str("ntex")
        .build();

    Ok(SimpleLogger::init(level, logger_config)?)
}
