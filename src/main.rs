use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use mlp_trainer::{
    evaluate, load_delimited, train_loop, BinaryCrossEntropy, Network, NetworkSpec,
};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MLP_LOG", "error,mlp_trainer=info"))
        .init();

    let matches = Command::new("mlp-trainer")
        .version(clap::crate_version!())
        .about("Train a sigmoid feed-forward binary classifier on a delimited dataset")
        .arg(
            Arg::new("data")
                .help("Headerless delimited file; column 0 is the 0/1 label")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("JSON network specification (layers, initializer, training)")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("train_rows")
                .long("train-rows")
                .help("Rows used for training; the rest are the test set [default: 80%]")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("hidden")
                .long("hidden")
                .help("Hidden units when no config is given")
                .default_value("16")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("epochs")
                .long("epochs")
                .help("Override the number of training epochs")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("lr")
                .long("lr")
                .help("Override the learning rate")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("delimiter")
                .long("delimiter")
                .help("Field delimiter [default: tab, or ',' for .csv files]")
                .value_parser(clap::value_parser!(char)),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        log::error!("Training failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<()> {
    let data_path = matches
        .get_one::<PathBuf>("data")
        .context("missing dataset path")?;
    let delimiter = match matches.get_one::<char>("delimiter") {
        Some(c) if c.is_ascii() => *c as u8,
        Some(c) => bail!("delimiter must be a single ASCII character, got '{c}'"),
        None if data_path.extension().is_some_and(|e| e == "csv") => b',',
        None => b'\t',
    };

    let dataset = load_delimited(data_path, delimiter)
        .with_context(|| format!("failed to load {}", data_path.display()))?;

    let mut spec = match matches.get_one::<PathBuf>("config") {
        Some(path) => NetworkSpec::load_json(path)
            .with_context(|| format!("failed to read network config {}", path.display()))?,
        None => {
            let hidden = *matches.get_one::<usize>("hidden").context("missing --hidden")?;
            NetworkSpec::binary_classifier("default", dataset.feature_count(), hidden)
        }
    };
    if let Some(epochs) = matches.get_one::<usize>("epochs") {
        spec.train.epochs = *epochs;
    }
    if let Some(lr) = matches.get_one::<f64>("lr") {
        spec.train.learning_rate = *lr;
    }
    let output_width = spec
        .validate(dataset.feature_count())
        .with_context(|| format!("network '{}' does not fit the dataset", spec.name))?;
    if output_width != 1 {
        bail!(
            "network '{}' ends in {output_width} outputs; a binary classifier needs exactly 1",
            spec.name
        );
    }

    let train_rows = matches
        .get_one::<usize>("train_rows")
        .copied()
        .unwrap_or(dataset.len() * 4 / 5);
    let (train, test) = dataset.split_at(train_rows)?;
    log::info!("{} training rows, {} test rows", train.len(), test.len());

    let mut network = Network::from_spec(&spec);
    network.initialize(&spec.initializer)?;
    let mut loss_fn = match spec.clip_epsilon {
        Some(eps) => BinaryCrossEntropy::with_epsilon(eps)?,
        None => BinaryCrossEntropy::new(),
    };

    let history = train_loop(&mut network, &mut loss_fn, &train.features, &train.labels, &spec.train)?;
    if let Some(last) = history.last() {
        println!("final train loss: {:.6}", last.train_loss);
        println!("final train accuracy: {:.4}", last.train_accuracy);
    }

    let test_accuracy = evaluate(&network, &test.features, &test.labels, spec.train.threshold)?;
    println!("test accuracy: {test_accuracy:.4}");
    Ok(())
}
