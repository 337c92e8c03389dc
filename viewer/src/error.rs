#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Device(#[from] evview_drivers::Error),

    #[error(transparent)]
    Raw(#[from] evview_drivers::raw::Error),

    #[error(transparent)]
    Bias(#[from] evview_drivers::bias::Error),

    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error(transparent)]
    Window(#[from] winit::error::OsError),

    // softbuffer errors may hold non-Send platform errors
    #[error("window surface: {0}")]
    Surface(String),
}

impl From<softbuffer::SoftBufferError> for Error {
    fn from(error: softbuffer::SoftBufferError) -> Self {
        Self::Surface(error.to_string())
    }
}
