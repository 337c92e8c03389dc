use evview_drivers::bias;

/// Reads bias overrides from `path`.
///
/// A missing or unreadable file is not an error: the camera keeps its default biases.
pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<bias::BiasFile, crate::Error> {
    let content = match std::fs::read_to_string(path.as_ref()) {
        Ok(content) => content,
        Err(error) => {
            log::warn!(
                "Cannot open bias file: {} ({error})",
                path.as_ref().display()
            );
            return Ok(bias::BiasFile::new());
        }
    };
    Ok(bias::parse(&content)?)
}

/// Writes the overrides into `configuration` and returns how many were applied.
///
/// Unknown names and out-of-range values are skipped with a warning.
pub fn apply(
    configuration: &mut evview_drivers::Configuration,
    biases: &bias::BiasFile,
) -> usize {
    let mut applied = 0;
    for (name, value) in biases {
        match configuration.set_bias(name, *value) {
            Ok(()) => {
                log::debug!("{name} = {value}");
                applied += 1;
            }
            Err(error) => log::warn!("{error}"),
        }
    }
    applied
}

/// Loads `path` and applies it to `configuration`, returning how many biases were applied.
pub fn apply_file<P: AsRef<std::path::Path>>(
    configuration: &mut evview_drivers::Configuration,
    path: P,
) -> Result<usize, crate::Error> {
    let applied = apply(configuration, &load(path.as_ref())?);
    if applied > 0 {
        log::info!("Biases are set from the file: {}", path.as_ref().display());
    }
    Ok(applied)
}
