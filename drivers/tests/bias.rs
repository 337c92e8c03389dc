use evview_drivers::bias;

#[test]
fn parse() {
    let biases = bias::parse("100%bias_fo\n200%bias_hpf\n% comment\n300%bias_diff_off\n").unwrap();
    assert_eq!(
        biases,
        [("bias_fo", 100), ("bias_hpf", 200), ("bias_diff_off", 300)]
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect::<bias::BiasFile>()
    );
}

#[test]
fn missing_separator() {
    assert_eq!(
        bias::parse("% header\n100%bias_fo\n42\n"),
        Err(bias::Error::MissingSeparator { line: 3 })
    );
}

#[test]
fn invalid_value() {
    assert!(matches!(
        bias::parse("high%bias_fo\n"),
        Err(bias::Error::Value { line: 1, .. })
    ));
}

#[test]
fn whitespace_and_duplicates() {
    let biases = bias::parse("  -5 % bias_refr \r\n7%bias_refr\n").unwrap();
    assert_eq!(biases.len(), 1);
    assert_eq!(biases["bias_refr"], 7);
}

#[test]
fn blank_line() {
    assert_eq!(
        bias::parse("100%bias_fo\n   \n200%bias_hpf\n"),
        Err(bias::Error::MissingSeparator { line: 2 })
    );
    assert_eq!(
        bias::parse("\n100%bias_fo\n"),
        Err(bias::Error::MissingSeparator { line: 1 })
    );
}

#[test]
fn set_bias() {
    let mut configuration = evview_drivers::Type::PropheseeEvk3Hd.default_configuration();
    configuration.set_bias("bias_fo", 100).unwrap();
    configuration.set_bias("hpf", 200).unwrap();
    configuration.set_bias("bias_diff_off", 255).unwrap();
    match configuration {
        evview_drivers::Configuration::PropheseeEvk3Hd(configuration) => {
            assert_eq!(configuration.biases.fo_p, 100);
            assert_eq!(configuration.biases.hpf, 200);
            assert_eq!(configuration.biases.diff_off, 255);
            assert_eq!(configuration.biases.fo_n, 0x00);
        }
    }
}

#[test]
fn set_bias_errors() {
    let mut configuration = evview_drivers::Type::PropheseeEvk3Hd.default_configuration();
    let default = configuration.clone();
    assert_eq!(
        configuration.set_bias("bias_unknown", 1),
        Err(bias::Error::Name("bias_unknown".to_owned()))
    );
    assert_eq!(
        configuration.set_bias("bias_pr", 256),
        Err(bias::Error::Range {
            name: "bias_pr".to_owned(),
            value: 256,
            minimum: 0,
            maximum: 255,
        })
    );
    assert!(configuration.set_bias("bias_pr", -1).is_err());
    assert_eq!(configuration, default);
}

#[test]
fn configuration_serde() {
    let configuration = evview_drivers::Type::PropheseeEvk3Hd.default_configuration();
    let json = serde_json::to_value(&configuration).unwrap();
    assert_eq!(json["type"], "prophesee_evk3_hd");
    assert_eq!(json["configuration"]["biases"]["fo_p"], 0x4a);
}
