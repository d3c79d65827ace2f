use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "hunkwatch",
    version,
    about = "Live terminal dashboard for uncommitted git changes",
    long_about = "Live terminal dashboard for uncommitted git changes.\n\n\
        Run it inside a git working tree. Settings are read from \
        ~/.config/hunkwatch/config.toml; set HUNKWATCH_LOG=<file> to write a debug log."
)]
pub struct Cli {}
