use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::gps::{resolve_latitude, resolve_longitude, HemisphereRule};
use crate::tag::Tag;
use crate::{Error, Result, TagReader};

/// A geotagged photo, as handed to the store and the map.
///
/// Only ever built when both coordinates resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thumbnail: Option<Vec<u8>>,
    latitude: f64,
    latitude_ref: String,
    longitude: f64,
    longitude_ref: String,
    date: String,
    time: String,
    make: String,
    model: String,
}

impl PhotoRecord {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    /// Signed decimal degrees, south negative.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// The GPSLatitudeRef the sign was taken from.
    pub fn latitude_ref(&self) -> &str {
        &self.latitude_ref
    }

    /// Signed decimal degrees, west negative.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn longitude_ref(&self) -> &str {
        &self.longitude_ref
    }

    /// `(latitude, longitude)`
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// "YYYY:MM:DD", as exif stores it.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// "HH:MM:SS"
    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Same record without the thumbnail bytes.
    pub fn without_thumbnail(&self) -> Self {
        Self {
            thumbnail: None,
            ..self.clone()
        }
    }
}

/// Knobs for [`Extractor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub hemisphere: HemisphereRule,
}

/// Turns image bytes into [`PhotoRecord`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Read the GPS position and camera details out of an image.
    ///
    /// Returns `Ok(None)` when the image has no location, which is common and
    /// not an error. Images without exif at all, corrupt rationals and
    /// datetimes without a space between date and time are errors.
    pub fn extract(
        &self,
        data: &[u8],
        identifier: impl Into<String>,
        thumbnail: Option<Vec<u8>>,
    ) -> Result<Option<PhotoRecord>> {
        let identifier = identifier.into();
        let reader = TagReader::open(data)?;

        let latitude_ref = reader.string(Tag::GpsLatitudeRef);
        let longitude_ref = reader.string(Tag::GpsLongitudeRef);
        let rule = self.options.hemisphere;
        let coordinates = resolve_latitude(
            reader.rational3(Tag::GpsLatitude).as_ref(),
            latitude_ref,
            rule,
        )
        .and_then(|lat| {
            resolve_longitude(
                reader.rational3(Tag::GpsLongitude).as_ref(),
                longitude_ref,
                rule,
            )
            .map(|long| (lat, long))
        });

        let (latitude, longitude) = match coordinates {
            Ok(c) => c,
            Err(Error::MissingGpsData) => {
                info!(%identifier, "photo has no gps data");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let (date, time) = match reader
            .string(Tag::DateTime)
            .or_else(|| reader.string(Tag::DateTimeOriginal))
        {
            Some(datetime) => split_datetime(datetime)?,
            None => {
                debug!(%identifier, "photo has no datetime");
                (String::new(), String::new())
            }
        };

        Ok(Some(PhotoRecord {
            identifier,
            thumbnail,
            latitude,
            latitude_ref: latitude_ref.unwrap_or_default().to_owned(),
            longitude,
            longitude_ref: longitude_ref.unwrap_or_default().to_owned(),
            date,
            time,
            make: reader.string(Tag::Make).unwrap_or_default().to_owned(),
            model: reader.string(Tag::Model).unwrap_or_default().to_owned(),
        }))
    }
}

/// Extract with default options and no thumbnail.
pub fn extract(data: &[u8], identifier: impl Into<String>) -> Result<Option<PhotoRecord>> {
    Extractor::default().extract(data, identifier, None)
}

fn split_datetime(datetime: &str) -> Result<(String, String)> {
    datetime
        .split_once(' ')
        .map(|(date, time)| (date.to_owned(), time.to_owned()))
        .ok_or_else(|| Error::MalformedDateTime(datetime.to_owned()))
}
