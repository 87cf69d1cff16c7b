//! The terminal front-end: queries a running gateway and prints either all
//! countries or the details of one.

use termcolor::StandardStream;

use crate::{
    config::Config,
    frontend::{self, HttpTransport},
    prelude::*,
};


#[derive(Debug, clap::Args)]
pub(crate) struct Args {
    /// Name of the country to show details of. Without it, all countries are
    /// listed.
    #[clap(long)]
    pub(crate) country: Option<String>,
}

pub(crate) async fn run(args: &Args, config: &Config, color: termcolor::ColorChoice) -> Result<()> {
    let transport = HttpTransport::new(&config.frontend.gateway_url)?;
    debug!("Querying gateway at {}", config.frontend.gateway_url);

    let browser = frontend::load(&transport, args.country.clone()).await;

    let mut stdout = StandardStream::stdout(color);
    frontend::terminal::render(&browser.view(), &mut stdout)
        .context("failed to write to stdout")?;

    Ok(())
}
