pub mod jpeg;

use std::io::{self, Cursor, Read};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use tracing::debug;

use crate::tag::{self, Directory, Tag};
use crate::{Error, Rational, Result};

/// Parsed IFD0 plus the Exif and GPS sub-IFDs of one image.
#[derive(Clone, Debug)]
pub struct TagReader {
    big_endian: bool,
    ifds: Vec<Ifd>,
}

impl TagReader {
    /// Locate the exif block of a jpeg (or take a bare tiff as-is) and parse it.
    pub fn open(data: &[u8]) -> Result<Self> {
        if data.starts_with(&jpeg::SOI) {
            let segment = jpeg::extract_exif(data)?;
            // an APP1 claiming to be exif without a tiff header inside
            return Self::from_tiff(segment).map_err(|e| match e {
                Error::NotAnImage | Error::Truncated("tiff header") => Error::NoExifSegment,
                e => e,
            });
        }
        Self::from_tiff(data)
    }

    /// Parse a TIFF structured exif block, starting at its byte order marker.
    pub fn from_tiff(data: &[u8]) -> Result<Self> {
        let big_endian = match data.get(..2) {
            Some(b"MM") => true,
            Some(b"II") => false,
            _ => return Err(Error::NotAnImage),
        };

        if big_endian {
            Self::parse::<BigEndian>(data, big_endian)
        } else {
            Self::parse::<LittleEndian>(data, big_endian)
        }
    }

    fn parse<B: ByteOrder>(data: &[u8], big_endian: bool) -> Result<Self> {
        let header = data.get(..8).ok_or(Error::Truncated("tiff header"))?;
        if B::read_u16(&header[2..]) != 42 {
            return Err(Error::NotAnImage);
        }
        let offset_to_ifd = B::read_u32(&header[4..]);

        let mut rdr = Cursor::new(data);
        rdr.set_position(offset_to_ifd as u64);
        let ifd0 = Ifd::new::<B>(&mut rdr, Directory::Ifd0)?;

        // follow known pointers to the sub-IFDs, one level only
        let mut children = vec![];
        for (pointer, dir) in [
            (tag::EXIF_IFD_POINTER, Directory::Exif),
            (tag::GPS_INFO_IFD_POINTER, Directory::Gps),
        ] {
            if let Some(off) = ifd0.find(pointer).and_then(EntryData::as_offset) {
                rdr.set_position(off as u64);
                children.push(Ifd::new::<B>(&mut rdr, dir)?);
            }
        }

        let mut ifds = vec![ifd0];
        ifds.append(&mut children);

        Ok(TagReader { big_endian, ifds })
    }

    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    pub fn ifds(&self) -> &[Ifd] {
        &self.ifds
    }

    fn get(&self, tag: Tag) -> Option<&EntryData> {
        let (dir, id) = tag.location();
        self.ifds.iter().find(|ifd| ifd.dir == dir)?.find(id)
    }

    /// First three values of a RATIONAL tag, i.e. a GPS degrees/minutes/seconds triple.
    pub fn rational3(&self, tag: Tag) -> Option<[Rational; 3]> {
        match self.get(tag)? {
            EntryData::URational(v) if v.len() >= 3 => Some([v[0], v[1], v[2]]),
            _ => None,
        }
    }

    pub fn string(&self, tag: Tag) -> Option<&str> {
        match self.get(tag)? {
            EntryData::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

/// Image file directory - container for a collection of Entries
#[derive(Clone, Debug)]
pub struct Ifd {
    pub dir: Directory,
    pub entries: Vec<Entry>,
}

impl Ifd {
    fn new<B: ByteOrder>(rdr: &mut Cursor<&[u8]>, dir: Directory) -> Result<Self> {
        let num_headers = rdr
            .read_u16::<B>()
            .map_err(|_| Error::Truncated("ifd entry count"))?;

        // headers are contiguous, followed by offset_to_next_ifd and entry data
        let mut hdrs = Vec::with_capacity(num_headers as usize);
        for _ in 0..num_headers {
            hdrs.push(EntryHeader::decode::<B>(rdr).map_err(|_| Error::Truncated("ifd entry"))?);
        }

        // the next IFD is the thumbnail's, which we have no use for
        let block: &[u8] = rdr.get_ref();
        let entries = hdrs
            .iter()
            .filter_map(|h| Entry::from_header::<B>(block, h))
            .collect();

        Ok(Ifd { dir, entries })
    }

    fn find(&self, tag: u16) -> Option<&EntryData> {
        self.entries.iter().find(|e| e.tag == tag).map(|e| &e.data)
    }
}

#[derive(Debug)]
enum OffsetValue {
    Offset(u32),
    Value([u8; 4]),
}

#[derive(Debug)]
struct EntryHeader {
    tag: u16,
    format: u16,
    count: u32,
    offset_val: OffsetValue,
}

impl EntryHeader {
    fn decode<B: ByteOrder>(rdr: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let tag = rdr.read_u16::<B>()?;
        let format = rdr.read_u16::<B>()?;
        let count = rdr.read_u32::<B>()?;

        // if all the data fits into 4 bytes, expect an OffsetValue::Value encoded immediately,
        // otherwise expect an OffsetValue::Offset to the data
        let mut buf = [0u8; 4];
        rdr.read_exact(&mut buf)?;
        let offset_val = if datatype_sz(format) as u64 * count as u64 <= 4 {
            OffsetValue::Value(buf)
        } else {
            OffsetValue::Offset(B::read_u32(&buf))
        };

        Ok(EntryHeader {
            tag,
            format,
            count,
            offset_val,
        })
    }

    fn data_sz(&self) -> usize {
        datatype_sz(self.format).saturating_mul(self.count as usize)
    }
}

fn datatype_sz(format: u16) -> usize {
    match format {
        1 /*Byte*/ | 2 /*Ascii*/ | 6 /*SignedByte*/ | 7 /*Undef*/ => 1,
        3 /*UShort*/ | 8 /*SShort*/ => 2,
        4 /*ULong*/ | 9 /*SLong*/ | 11 /*Float32*/ | 13 /*Ifd*/ => 4,
        5 /*URational*/ | 10 /*SRational*/ | 12 /*Float64*/ => 8,
        _ => 0,
    }
}

/// individual entry within an IFD
#[derive(Clone, Debug)]
pub struct Entry {
    pub tag: u16,
    pub data: EntryData,
}

impl Entry {
    /// `None` for formats we don't read and for data lying past the end of the block.
    fn from_header<B: ByteOrder>(block: &[u8], h: &EntryHeader) -> Option<Self> {
        let raw = match h.offset_val {
            OffsetValue::Value(ref v) => &v[..h.data_sz()],
            OffsetValue::Offset(o) => {
                let start = o as usize;
                let data = start
                    .checked_add(h.data_sz())
                    .and_then(|end| block.get(start..end));
                if data.is_none() {
                    debug!(tag = h.tag, offset = o, "entry data lies beyond the exif block");
                }
                data?
            }
        };

        let data = EntryData::decode::<B>(h.format, h.count, raw)?;
        Some(Entry { tag: h.tag, data })
    }
}

/// Data associated with an Entry
#[derive(Clone, Debug, PartialEq)]
pub enum EntryData {
    Ascii(String),
    UShort(Vec<u16>),
    ULong(Vec<u32>),
    URational(Vec<Rational>),
}

impl EntryData {
    fn decode<B: ByteOrder>(format: u16, count: u32, d: &[u8]) -> Option<Self> {
        match format {
            2 => {
                // the NUL should end it, but don't insist
                let end = d.iter().position(|&c| c == 0).unwrap_or(d.len());
                Some(EntryData::Ascii(String::from_utf8_lossy(&d[..end]).into_owned()))
            }
            3 => Some(EntryData::UShort(
                d.chunks_exact(2).map(B::read_u16).collect(),
            )),
            4 | 13 => Some(EntryData::ULong(
                d.chunks_exact(4).map(B::read_u32).collect(),
            )),
            5 => Some(EntryData::URational(
                d.chunks_exact(8)
                    .map(|c| Rational::new(B::read_u32(&c[..4]), B::read_u32(&c[4..])))
                    .collect(),
            )),
            v => {
                debug!(format = v, count, "skipping entry of unread format");
                None
            }
        }
    }

    fn as_offset(&self) -> Option<u32> {
        match self {
            EntryData::ULong(v) => v.first().copied(),
            EntryData::UShort(v) => v.first().map(|&o| o as u32),
            _ => None,
        }
    }
}
