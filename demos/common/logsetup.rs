use simplelog::*;

#[derive(clap::ArgEnum, Debug, Copy, Clone)]
pub enum Color {
    Auto,
    Always,
    Never,
}

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Sends log messages to stderr, leaving stdout for decompressed data.
pub fn init_logger(verbosity: u8, color: Color) -> anyhow::Result<()> {
    let mut builder = ConfigBuilder::new();
    builder.set_location_level(LevelFilter::Trace);
    builder.set_target_level(LevelFilter::Off);
    builder.set_thread_level(LevelFilter::Off);
    builder.set_time_level(LevelFilter::Off);
    let config = builder.build();

    let color = match color {
        Color::Always => ColorChoice::AlwaysAnsi,
        Color::Auto if atty::is(atty::Stream::Stderr) => ColorChoice::Auto,
        Color::Auto | Color::Never => ColorChoice::Never,
    };

    let level = level_for(verbosity);
    TermLogger::init(level, config.clone(), TerminalMode::Stderr, color)
        .or_else(|_| SimpleLogger::init(level, config))?;
    Ok(())
}
