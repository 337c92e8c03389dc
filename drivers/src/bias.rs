//! Bias files and bias names.
//!
//! A bias file lists one override per line as `<value>%<name>`, for instance
//! `83%bias_fo`. Lines starting with `%` are comments. Any other line,
//! blank lines included, must contain a `%`.

/// Bias overrides read from a bias file, by name.
pub type BiasFile = std::collections::BTreeMap<String, i64>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("line {line}: missing '%' between the bias value and name")]
    MissingSeparator { line: usize },

    #[error("line {line}: \"{value}\" is not an integer")]
    Value { line: usize, value: String },

    #[error("unknown bias \"{0}\"")]
    Name(String),

    #[error("bias \"{name}\" must be in the range [{minimum}, {maximum}] (got {value})")]
    Range {
        name: String,
        value: i64,
        minimum: i64,
        maximum: i64,
    },
}

pub fn parse(content: &str) -> Result<BiasFile, Error> {
    let mut biases = BiasFile::new();
    for (index, line) in content.lines().enumerate() {
        if line.starts_with('%') {
            continue;
        }
        let mut fields = line.split('%');
        // unwrap: split always yields at least one field
        let value = fields.next().unwrap();
        let name = fields
            .next()
            .ok_or(Error::MissingSeparator { line: index + 1 })?;
        let value = value.trim().parse::<i64>().map_err(|_| Error::Value {
            line: index + 1,
            value: value.to_owned(),
        })?;
        biases.insert(name.trim().to_owned(), value);
    }
    Ok(biases)
}

/// Strips the `bias_` prefix used by bias files and vendor tools.
pub fn field_name(name: &str) -> &str {
    name.strip_prefix("bias_").unwrap_or(name)
}

pub fn to_u8(name: &str, value: i64) -> Result<u8, Error> {
    u8::try_from(value).map_err(|_| Error::Range {
        name: name.to_owned(),
        value,
        minimum: u8::MIN as i64,
        maximum: u8::MAX as i64,
    })
}
