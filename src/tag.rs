
// only the tags the photo extractor reads, add here as needed

pub const EXIF_IFD_POINTER: u16 = 0x8769;
pub const GPS_INFO_IFD_POINTER: u16 = 0x8825;

pub const MAKE: u16 = 0x010f;
pub const MODEL: u16 = 0x0110;
pub const DATE_TIME: u16 = 0x0132;

pub mod exif {
    pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
}

pub mod gps {
    pub const LATITUDE_REF: u16 = 0x0001;
    pub const LATITUDE: u16 = 0x0002;
    pub const LONGITUDE_REF: u16 = 0x0003;
    pub const LONGITUDE: u16 = 0x0004;
}

/// IFD a tag lives in. Tag numbers overlap between IFDs, GPS ones in particular.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Directory {
    Ifd0,
    Exif,
    Gps,
}

/// The tags a [`crate::TagReader`] can be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    GpsLatitudeRef,
    GpsLatitude,
    GpsLongitudeRef,
    GpsLongitude,
    Make,
    Model,
    DateTime,
    DateTimeOriginal,
}

impl Tag {
    /// Which IFD the tag is found in, and its number there.
    pub const fn location(self) -> (Directory, u16) {
        match self {
            Tag::GpsLatitudeRef => (Directory::Gps, gps::LATITUDE_REF),
            Tag::GpsLatitude => (Directory::Gps, gps::LATITUDE),
            Tag::GpsLongitudeRef => (Directory::Gps, gps::LONGITUDE_REF),
            Tag::GpsLongitude => (Directory::Gps, gps::LONGITUDE),
            Tag::Make => (Directory::Ifd0, MAKE),
            Tag::Model => (Directory::Ifd0, MODEL),
            Tag::DateTime => (Directory::Ifd0, DATE_TIME),
            Tag::DateTimeOriginal => (Directory::Exif, exif::DATE_TIME_ORIGINAL),
        }
    }
}
