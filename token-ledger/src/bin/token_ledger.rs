//! Token ledger deployment and scenario runner
//!
//! Usage: `token-ledger [CONFIG.toml] [SCENARIO.toml]`
//!
//! Without a config file the defaults plus `TOKEN_*` environment overrides
//! are used. The final state is printed to stdout as JSON.

use anyhow::{bail, Context};
use serde::Serialize;
use token_ledger::{
    metrics::Metrics, scenario::Scenario, scenario::ScenarioReport, snapshot, Address, Config,
    Token,
};

#[derive(Serialize)]
struct Holder {
    address: Address,
    balance: String,
}

#[derive(Serialize)]
struct Summary {
    name: String,
    symbol: String,
    total_supply: String,
    owner: Address,
    paused: bool,
    uniswap_pair: Address,
    max_transaction_amount: String,
    holders: Vec<Holder>,
    events: usize,
    scenario: Option<ScenarioReport>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    if std::env::var_os("TOKEN_LOG_JSON").is_some() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::from_file(path)
                .with_context(|| format!("loading config from {}", path))?;
            config.apply_env()?;
            config.validate()?;
            Ok(config)
        }
        None => Ok(Config::from_env()?),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() > 2 {
        bail!("usage: token-ledger [CONFIG.toml] [SCENARIO.toml]");
    }

    tracing::info!("Starting Victor Voltage token ledger");

    let config = load_config(args.first().map(String::as_str))?;
    let metrics = Metrics::new().context("creating metrics registry")?;

    let mut token = Token::deploy(
        config.deployment.deployer,
        config.deployment.wallets,
        &config.token,
    )?
    .with_metrics(metrics);

    let report = match args.get(1) {
        Some(path) => {
            let scenario = Scenario::from_file(path)
                .with_context(|| format!("loading scenario from {}", path))?;
            tracing::info!(steps = scenario.steps.len(), "Running scenario");
            Some(scenario.run(&mut token))
        }
        None => None,
    };

    token
        .check_invariants()
        .context("ledger invariants violated after scenario")?;

    if let Some(path) = &config.snapshot.path {
        snapshot::save(&token, path)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
    }

    if let Some(metrics) = token.metrics() {
        tracing::debug!(metrics = %metrics.render()?, "Final metrics");
    }

    let unexpected = report
        .as_ref()
        .map(|r| r.unexpected().count())
        .unwrap_or(0);

    let summary = Summary {
        name: token.name().to_string(),
        symbol: token.symbol().to_string(),
        total_supply: token.total_supply().to_string(),
        owner: token.owner(),
        paused: token.is_paused(),
        uniswap_pair: token.uniswap_pair(),
        max_transaction_amount: token.max_transaction_amount().to_string(),
        holders: token
            .holders()
            .map(|(address, balance)| Holder {
                address: *address,
                balance: balance.to_string(),
            })
            .collect(),
        events: token.events().len(),
        scenario: report,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if unexpected > 0 {
        bail!("{} scenario step(s) did not behave as expected", unexpected);
    }

    tracing::info!("Shutting down token ledger");
    Ok(())
}
