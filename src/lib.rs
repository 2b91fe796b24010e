//! Pull GPS position and camera details out of a photo's EXIF header.
//!
//! Only the handful of tags needed to put a photo on a map are read: the GPS
//! latitude/longitude with their hemisphere references, the capture datetime,
//! and the camera make and model.
//!
//! ```no_run
//! let bytes = std::fs::read("IMG_2222.JPG").unwrap();
//! match photomapper::extract(&bytes, "IMG_2222.JPG") {
//!     Ok(Some(photo)) => println!("{:?}", photo.coordinates()),
//!     Ok(None) => println!("no location"),
//!     Err(e) => println!("unreadable: {}", e),
//! }
//! ```

mod error;
pub mod exif;
pub mod gps;
mod photo;
mod rational;
pub mod store;
pub mod tag;

pub use error::{Error, Result};
pub use exif::TagReader;
pub use gps::HemisphereRule;
pub use photo::{extract, ExtractOptions, Extractor, PhotoRecord};
pub use rational::Rational;
pub use store::{JsonStore, MemoryStore, PhotoStore};
pub use tag::Tag;
