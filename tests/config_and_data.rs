//! Integration tests for JSON network specs and delimited dataset loading.

use std::io::Write;

use mlp_trainer::{
    evaluate, load_delimited, train_loop, BinaryCrossEntropy, Initializer, LayerSpec, Network,
    NetworkSpec, TrainConfig,
};

// ---------------------------------------------------------------------------
// NetworkSpec
// ---------------------------------------------------------------------------

#[test]
fn network_spec_survives_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("net.json");

    let mut spec = NetworkSpec::binary_classifier("saved", 3, 5);
    spec.initializer = Initializer::He { seed: 9 };
    spec.clip_epsilon = Some(1e-7);
    spec.train = TrainConfig::new(10, 0.2);
    spec.save_json(&path).unwrap();

    let loaded = NetworkSpec::load_json(&path).unwrap();
    assert_eq!(loaded.name, "saved");
    assert_eq!(loaded.layers, spec.layers);
    assert_eq!(loaded.initializer, Initializer::He { seed: 9 });
    assert_eq!(loaded.clip_epsilon, Some(1e-7));
    assert_eq!(loaded.train, TrainConfig::new(10, 0.2));
}

#[test]
fn network_spec_json_uses_tagged_layers() {
    let spec = NetworkSpec::binary_classifier("tagged", 2, 2);
    let json = serde_json::to_string(&spec).unwrap();
    assert!(json.contains(r#""type":"linear""#));
    assert!(json.contains(r#""type":"sigmoid""#));
    assert_eq!(spec.layers[1], LayerSpec::Sigmoid);
}

#[test]
fn load_json_reports_missing_file() {
    assert!(NetworkSpec::load_json("/nonexistent/net.json").is_err());
}

// ---------------------------------------------------------------------------
// Dataset loading + training end to end
// ---------------------------------------------------------------------------

#[test]
fn trains_on_loaded_tsv_and_scores_holdout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.tsv");
    let mut file = std::fs::File::create(&path).unwrap();
    // Label is 1 exactly when the first feature is positive. Signs alternate
    // so both classes land in the holdout rows.
    for i in 0..40 {
        let magnitude = (i / 2 + 1) as f64 / 10.0;
        let a = if i % 2 == 0 { magnitude } else { -magnitude };
        let b = ((i * 7) % 5) as f64 / 5.0;
        let label = if a > 0.0 { 1 } else { 0 };
        writeln!(file, "{label}\t{a}\t{b}").unwrap();
    }
    drop(file);

    let dataset = load_delimited(&path, b'\t').unwrap();
    assert_eq!(dataset.len(), 40);
    assert_eq!(dataset.feature_count(), 2);

    let spec = NetworkSpec {
        initializer: Initializer::Xavier { seed: 5 },
        ..NetworkSpec::binary_classifier("tsv", 2, 4)
    };
    assert_eq!(spec.validate(dataset.feature_count()).unwrap(), 1);

    let (train, test) = dataset.split_at(30).unwrap();
    let mut network = Network::from_spec(&spec);
    network.initialize(&spec.initializer).unwrap();

    let config = TrainConfig {
        epochs: 500,
        learning_rate: 1.0,
        log_every: 0,
        ..TrainConfig::default()
    };
    let history = train_loop(
        &mut network,
        &mut BinaryCrossEntropy::new(),
        &train.features,
        &train.labels,
        &config,
    )
    .unwrap();

    let holdout: Vec<f64> = test.labels.column(0).collect();
    assert!(holdout.contains(&0.0) && holdout.contains(&1.0));

    assert!(history.last().unwrap().train_loss < history[0].train_loss);
    let acc = evaluate(&network, &test.features, &test.labels, 0.5).unwrap();
    assert!(acc >= 0.9, "holdout accuracy {acc}");
}
