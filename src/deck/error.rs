use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTML rewriting failed: {0}")]
    Html(#[from] lol_html::errors::RewritingError),

    #[error("Deck has no slides")]
    NoSlides,

    #[error("Unknown slide {0}")]
    UnknownSlide(String),
}

pub type DeckResult<T> = Result<T, DeckError>;
