use evview::biases;
use std::io::Write;

#[test]
fn missing_file() {
    let directory = tempfile::tempdir().unwrap();
    let overrides = biases::load(directory.path().join("biases.bias")).unwrap();
    assert!(overrides.is_empty());
}

#[test]
fn load_and_apply() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"% biases\n100%bias_fo\n999%bias_pr\n1%bias_unknown\n30%bias_diff_off\n")
        .unwrap();
    file.flush().unwrap();
    let overrides = biases::load(file.path()).unwrap();
    assert_eq!(overrides.len(), 4);

    let mut configuration = evview::drivers::Type::PropheseeEvk3Hd.default_configuration();
    assert_eq!(biases::apply(&mut configuration, &overrides), 2);
    match configuration {
        evview::drivers::Configuration::PropheseeEvk3Hd(configuration) => {
            assert_eq!(configuration.biases.fo_p, 100);
            assert_eq!(configuration.biases.diff_off, 30);
            assert_eq!(configuration.biases.pr, 0x69);
        }
    }
}

#[test]
fn malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"100 bias_fo\n").unwrap();
    file.flush().unwrap();
    assert!(matches!(
        biases::load(file.path()),
        Err(evview::Error::Bias(
            evview::drivers::bias::Error::MissingSeparator { line: 1 }
        ))
    ));
}

#[test]
fn apply_file_counts_applied_biases() {
    let directory = tempfile::tempdir().unwrap();
    let default = evview::drivers::Type::PropheseeEvk3Hd.default_configuration();

    let mut configuration = default.clone();
    assert_eq!(
        biases::apply_file(&mut configuration, directory.path().join("biases.bias")).unwrap(),
        0
    );
    assert_eq!(configuration, default);

    let rejected = directory.path().join("rejected.bias");
    std::fs::write(&rejected, "300%bias_fo\n1%bias_unknown\n").unwrap();
    assert_eq!(biases::apply_file(&mut configuration, &rejected).unwrap(), 0);
    assert_eq!(configuration, default);

    let accepted = directory.path().join("accepted.bias");
    std::fs::write(&accepted, "% fo only\n90%bias_fo\n").unwrap();
    assert_eq!(biases::apply_file(&mut configuration, &accepted).unwrap(), 1);
    assert_ne!(configuration, default);
}
