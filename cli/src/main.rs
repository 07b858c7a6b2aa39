mod commands;
mod terminal;

use commands::{CommandLine, Commands, ip, scan};
use crossnet_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);
    print::banner();

    let cfg = Config {
        server: commands.server,
        disable_input: commands.no_input,
    };

    match commands.command {
        Commands::Ip => ip::current_ip(&cfg).await,
        Commands::Scan(args) => scan::scan(args, &cfg).await,
    }
}
