// http://vip.sugovica.hu/Sardi/kepnezo/JPEG%20File%20Layout%20and%20Format.htm
// https://www.imperialviolet.org/binary/jpeg/
// http://dev.exiv2.org/projects/exiv2/wiki/The_Metadata_in_JPEG_files

use std::io::{self, Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};
use tracing::debug;

use crate::{Error, Result};

pub(crate) const SOI: [u8; 2] = [0xFF, 0xD8];
const EXIF_HEADER: [u8; 6] = [b'E', b'x', b'i', b'f', 0x00, 0x00];

/// Find the APP1 Exif segment of a jpeg and return the TIFF block inside it.
///
/// Scanning stops at start-of-scan or end-of-image, nothing after those can
/// hold metadata.
pub fn extract_exif(data: &[u8]) -> Result<&[u8]> {
    let mut rdr = Cursor::new(data);
    loop {
        // find next segment marker
        if 0xFF != rdr.read_u8().map_err(eof)? {
            return Err(Error::NoExifSegment);
        }

        let seg_id = rdr.read_u8().map_err(eof)?;
        match seg_id {
            // standalone markers, no length follows
            0x01 | 0xD0..=0xD8 => {}
            // fill byte, the real id is next
            0xFF => rdr.set_position(rdr.position() - 1),
            0xD9 | 0xDA => {
                debug!(marker = seg_id, "reached image data without finding exif");
                return Err(Error::NoExifSegment);
            }
            _ => {
                let len = rdr.read_u16::<BigEndian>().map_err(eof)? as usize;
                let start = rdr.position() as usize;
                let end = (start + len)
                    .checked_sub(2)
                    .filter(|&end| end >= start && end <= data.len())
                    .ok_or(Error::Truncated("jpeg segment length"))?;

                if seg_id == 0xE1 {
                    let mut hdr = [0u8; 6];
                    if end - start >= hdr.len() {
                        rdr.read_exact(&mut hdr).map_err(eof)?;
                        if hdr == EXIF_HEADER {
                            debug!(offset = start, len = end - start, "found exif segment");
                            return Ok(&data[start + hdr.len()..end]);
                        }
                    }
                }
                rdr.set_position(end as u64);
            }
        }
    }
}

fn eof(_: io::Error) -> Error {
    Error::NoExifSegment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_app1_after_other_segments() {
        let mut jpeg = SOI.to_vec();
        // APP0 / JFIF
        jpeg.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x07, b'J', b'F', b'I', b'F', 0x00]);
        // APP1 / XMP, same marker but not exif
        jpeg.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x05, b'h', b't', b't']);
        jpeg.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x0C]);
        jpeg.extend_from_slice(&EXIF_HEADER);
        jpeg.extend_from_slice(b"MM\0*");
        jpeg.extend_from_slice(&[0xFF, 0xD9]);

        assert_eq!(extract_exif(&jpeg), Ok(&b"MM\0*"[..]));
    }

    #[test]
    fn stops_at_start_of_scan() {
        let mut jpeg = SOI.to_vec();
        jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0x12, 0x34]);
        assert_eq!(extract_exif(&jpeg), Err(Error::NoExifSegment));
    }

    #[test]
    fn truncated_input() {
        assert_eq!(extract_exif(&SOI), Err(Error::NoExifSegment));
        assert_eq!(extract_exif(&[0xFF, 0xD8, 0xFF, 0xE1, 0x00]), Err(Error::NoExifSegment));

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE1, 0x01, 0x00, b'E', b'x'];
        assert_eq!(extract_exif(&jpeg), Err(Error::Truncated("jpeg segment length")));
    }
}
