use thiserror::Error;

/// Low-level errors raised while loading resources or writing the PDF
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to decode the image
    Image(#[from] image::ImageError),

    #[error("font {0} has not been added to the document")]
    /// A font index that doesn't refer to any font in the document
    FontMissing(usize),

    #[error("page {0} is missing from the document")]
    /// A page id in the page order that isn't stored in the document
    PageMissing(usize),

    #[error("the document sink refused to start page {0}")]
    /// A [`PageSink`](crate::PageSink) could not provide a new page
    PageRefused(usize),

    #[error("{what} must be a finite, non-negative length (got {value})")]
    /// An element size that can't be laid out
    InvalidDimension { what: &'static str, value: f32 },
}

/// The margin (or page edge) a configuration error refers to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        };
        f.write_str(name)
    }
}

/// Invalid page geometry or engine settings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("the {side} margin must be a finite, non-negative length (got {value})")]
    NegativeMargin { side: Side, value: f32 },

    #[error("page size {width}x{height} must be finite and positive")]
    InvalidPageSize { width: f32, height: f32 },

    #[error("margins leave no content area ({width}x{height})")]
    EmptyContentArea { width: f32, height: f32 },

    #[error("spacing between elements must be a finite, non-negative length (got {0})")]
    InvalidSpacing(f32),
}

/// Errors reported by the [`Paginator`](crate::Paginator)
#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("creating page {page} failed")]
    PageCreation {
        page: usize,
        #[source]
        source: PDFError,
    },

    #[error("drawing element failed ({kind})")]
    ElementDrawing {
        kind: &'static str,
        #[source]
        source: PDFError,
    },

    #[error("serializing the document failed")]
    Serialization(#[source] PDFError),

    #[error(transparent)]
    /// The output target could not be opened
    Io(#[from] std::io::Error),

    #[error("a previous placement failed; this paginator can no longer be used")]
    Poisoned,
}
