#[derive(Debug, serde::Serialize)]
pub struct Camera<Configuration> {
    pub name: &'static str,
    pub width: u16,
    pub height: u16,
    pub default_configuration: Configuration,
}
