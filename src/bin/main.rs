extern crate clap;
extern crate env_logger;
extern crate shlex;
extern crate tickerdesk;

use std::env;

use clap::Parser;
use color_eyre::eyre::Result;
use tickerdesk::app::Dashboard;
use tickerdesk::options::DashboardOptions;

fn main() {
    env_logger::builder().format_timestamp_nanos().init();

    if let Err(err) = real_main() {
        eprintln!("tkd: {err:?}");
        std::process::exit(2);
    }
}

fn parse_args() -> DashboardOptions {
    let mut args = Vec::new();

    args.push(
        env::args()
            .next()
            .expect("there should be at least one arg: the application name"),
    );
    args.extend(
        env::var("TICKERDESK_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    for arg in env::args().skip(1) {
        args.push(arg);
    }

    DashboardOptions::parse_from(args)
}

fn real_main() -> Result<()> {
    color_eyre::install()?;
    let options = parse_args();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    runtime.block_on(local.run_until(async move {
        let mut dashboard = Dashboard::new(options)?;
        dashboard.run().await
    }))
}
