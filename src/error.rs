/// Everything that can go wrong while pulling a photo record out of an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("the buffer is neither a jpeg nor a tiff image")]
    NotAnImage,
    #[error("the image contains no exif segment")]
    NoExifSegment,
    #[error("the exif segment is truncated: {0}")]
    Truncated(&'static str),
    /// Latitude/longitude or their hemisphere references are absent.
    ///
    /// [`crate::extract`] turns this into `Ok(None)`.
    #[error("the image carries no gps data")]
    MissingGpsData,
    #[error("unrecognised hemisphere reference {0:?}")]
    UnknownHemisphere(String),
    #[error("datetime {0:?} has no space between date and time")]
    MalformedDateTime(String),
    #[error("rational {numerator}/0 has a zero denominator")]
    DivisionByZero { numerator: u32 },
    /// 0/0, which callers map to whatever "absent" means to them.
    #[error("rational 0/0 is indeterminate")]
    Indeterminate,
}

pub type Result<T> = std::result::Result<T, Error>;
