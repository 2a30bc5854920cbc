// Integration tests for the estimator facade, configuration and serialization

use pwguess::{Config, ConfigError, DataLoader, PasswordEstimator, PatternKind};

fn estimator() -> PasswordEstimator {
    let config = Config {
        reference_year: Some(2020),
        ..Config::default()
    };
    PasswordEstimator::from_config(&config).unwrap()
}

// ============ Estimation Workflow ============

#[test]
fn test_common_password_is_cheap() {
    let result = estimator().estimate("password", Vec::<String>::new());
    assert_eq!(result.sequence.len(), 1);
    let m = &result.sequence[0];
    assert_eq!(m.kind(), PatternKind::Dictionary);
    assert_eq!(m.as_dictionary().unwrap().dictionary_name, "passwords");
    // rank 2, plus 1 for a one-match sequence
    assert_eq!(result.guesses, 3.0);
    assert_eq!(result.score, 0);
}

#[test]
fn test_ordering_of_strength() {
    let estimator = estimator();
    let none = Vec::<String>::new();
    let weak = estimator.estimate("qwerty", none.clone());
    let medium = estimator.estimate("Tr0ub4dour&3", none.clone());
    let strong = estimator.estimate("8$kP!v2#Lq^Zr7@w", none);
    assert!(weak.guesses < medium.guesses);
    assert!(medium.guesses < strong.guesses);
}

#[test]
fn test_user_inputs_lower_guesses() {
    let estimator = estimator();
    let without = estimator.estimate("Vortigaunt1987", Vec::<String>::new());
    let with = estimator.estimate("Vortigaunt1987", ["vortigaunt"]);
    assert!(with.guesses < without.guesses);

    // nothing leaks into the next request
    let again = estimator.estimate("Vortigaunt1987", Vec::<String>::new());
    assert_eq!(again.guesses, without.guesses);
}

#[test]
fn test_estimator_is_shareable_across_threads() {
    let estimator = std::sync::Arc::new(estimator());
    let handles: Vec<_> = ["zorblax", "quixtar"]
        .into_iter()
        .map(|name| {
            let estimator = std::sync::Arc::clone(&estimator);
            std::thread::spawn(move || {
                let password = format!("{}2019", name);
                let own = estimator.estimate(&password, [name]);
                let other = estimator.estimate(&password, ["someoneelse"]);
                own.guesses < other.guesses
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

// ============ Configuration ============

#[test]
fn test_load_config_file() {
    let path = std::env::temp_dir().join(format!("pwguess-config-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "reference_year = 2017\ndictionaries = [\"surnames\"]\nkeyboards = [\"qwerty\"]\n",
    )
    .unwrap();
    let config = Config::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.reference_year(), 2017);
    let estimator = PasswordEstimator::from_config(&config).unwrap();
    assert_eq!(estimator.matcher().reference_year(), 2017);
    // passwords list disabled: "password" is no longer a single cheap word
    let result = estimator.estimate("password", Vec::<String>::new());
    assert!(result.guesses > 3.0);
}

#[test]
fn test_config_errors() {
    let missing = Config::load("/nonexistent/pwguess.toml");
    assert!(matches!(missing, Err(ConfigError::Read { .. })));

    let malformed = Config::from_toml_str("dictionaries = 5");
    assert!(matches!(malformed, Err(ConfigError::Parse(_))));

    let bad_table = Config::from_toml_str("[l33t_table]\na = [\"44\"]").unwrap();
    let err = PasswordEstimator::from_config(&bad_table).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidL33tEntry { .. }));
    assert!(err.to_string().contains("44"));
}

#[test]
fn test_builtin_data_info() {
    let info = DataLoader::info();
    assert_eq!(info.word_counts.len(), 6);
    assert!(info.total_words > 0);
    assert_eq!(
        info.total_words,
        info.word_counts.iter().map(|(_, n)| n).sum::<usize>()
    );
}

// ============ Serialization ============

#[test]
fn test_match_sequence_serializes() {
    let result = estimator().estimate("P@ssw0rd1991", Vec::<String>::new());
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["password"], "P@ssw0rd1991");
    assert_eq!(json["score"], 0);
    let sequence = json["sequence"].as_array().unwrap();
    assert_eq!(sequence.len(), result.sequence.len());
    for (value, m) in sequence.iter().zip(&result.sequence) {
        assert_eq!(value["pattern"], m.kind().to_string());
        assert_eq!(value["i"], m.i);
        assert_eq!(value["j"], m.j);
        assert!(value["guesses"].is_number());
    }
}

#[test]
fn test_l33t_match_serializes_substitutions() {
    let result = estimator().estimate("p4ssw0rd", Vec::<String>::new());
    let json = serde_json::to_value(&result).unwrap();
    let first = &json["sequence"][0];
    assert_eq!(first["pattern"], "dictionary");
    assert_eq!(first["l33t"], true);
    assert_eq!(first["sub"]["4"], "a");
    assert_eq!(first["sub"]["0"], "o");
}
