//! A subcommand making sure the gateway can work in this environment: the
//! configuration loads and the upstream REST API answers.

use crate::{
    args::{self, Args},
    load_config_and_init_logger,
    config::Config,
    prelude::*,
    upstream::UpstreamClient,
};


/// The country looked up to test the upstream connection.
const CHECK_COUNTRY: &str = "France";

pub(crate) async fn run(shared: &args::Shared, args: &Args) -> Result<()> {
    let config = load_config_and_init_logger(shared, args)
        .context("failed to load config: cannot proceed with `check` command")?;


    // Perform main checks
    info!("Starting to verify various things...");
    let upstream = check_upstream(&config).await;
    info!("Done verifing various things");


    // Print summary after all log output
    let mut any_errors = false;
    println!();
    bunt::println!("{$bold+blue+intense}Summary{/$}");
    println!();
    print_outcome(&mut any_errors, "Load configuration", &Ok(()));
    print_outcome(&mut any_errors, "Connection to the REST Countries API", &upstream);

    println!();
    if any_errors {
        bunt::println!("{$red+intense}➡  Errors have occured!{/$}");
        std::process::exit(1);
    } else {
        bunt::println!("{$green+intense}⮕  Everything OK{/$} \
            {$dimmed}(the gateway probably works in this environment){/$}");
        Ok(())
    }
}

fn print_outcome<T>(any_errors: &mut bool, label: &str, result: &Result<T>) {
    match result {
        Ok(_) => {
            bunt::println!(" ▸ {[bold+intense]}  {$green+bold}✔ ok{/$}", label);
        }
        Err(e) => {
            *any_errors = true;
            bunt::println!(" ▸ {[bold+intense]}  {$red+bold}✘ error{/$}", label);
            bunt::println!("      {$red}▶▶▶ {$bold}Error:{/$}{/$} {[yellow+intense]}", e);
            println!();
            bunt::println!("      {$red+italic}Caused by:{/$}");

            for (i, cause) in e.chain().skip(1).enumerate() {
                print!("       {: >1$}", "", i * 2);
                println!("‣ {cause}");
            }
            println!();
        }
    }
}

async fn check_upstream(config: &Config) -> Result<()> {
    let client = UpstreamClient::new(&config.upstream)?;
    debug!("Looking up '{CHECK_COUNTRY}' at {}", client.base_url());

    let countries = client.countries_by_name(CHECK_COUNTRY)
        .await
        .with_context(|| format!("failed to query '{}'", client.base_url()))?;
    if countries.is_empty() {
        bail!("upstream knows no country named '{CHECK_COUNTRY}'");
    }

    Ok(())
}
