//! Builds small jpeg/tiff buffers carrying just the tags a test needs.

#![allow(dead_code)]

use byteorder::{ByteOrder, WriteBytesExt};

pub const EXIF_IFD_POINTER: u16 = 0x8769;
pub const GPS_INFO_IFD_POINTER: u16 = 0x8825;

#[derive(Clone, Debug)]
pub enum Value {
    Ascii(String),
    Long(u32),
    Rationals(Vec<(u32, u32)>),
}

impl Value {
    pub fn ascii(s: &str) -> Self {
        Value::Ascii(s.to_owned())
    }

    pub fn dms(d: u32, m: u32, s: u32) -> Self {
        Value::Rationals(vec![(d, 1), (m, 1), (s, 1)])
    }

    fn format_code(&self) -> u16 {
        match self {
            Value::Ascii(_) => 2,
            Value::Long(_) => 4,
            Value::Rationals(_) => 5,
        }
    }

    fn count(&self) -> u32 {
        match self {
            Value::Ascii(s) => s.len() as u32 + 1,
            Value::Long(_) => 1,
            Value::Rationals(v) => v.len() as u32,
        }
    }

    fn encode<B: ByteOrder>(&self) -> Vec<u8> {
        let mut w = vec![];
        match self {
            Value::Ascii(s) => {
                w.extend_from_slice(s.as_bytes());
                w.push(0);
            }
            Value::Long(v) => w.write_u32::<B>(*v).unwrap(),
            Value::Rationals(v) => {
                for &(n, d) in v {
                    w.write_u32::<B>(n).unwrap();
                    w.write_u32::<B>(d).unwrap();
                }
            }
        }
        w
    }
}

/// Tags for IFD0, the Exif sub-IFD and the GPS sub-IFD.
#[derive(Clone, Debug, Default)]
pub struct Exif {
    pub ifd0: Vec<(u16, Value)>,
    pub exif: Vec<(u16, Value)>,
    pub gps: Option<Vec<(u16, Value)>>,
}

impl Exif {
    /// A photo taken in Pittsburgh, 40°26'46" N 79°58'56" W.
    pub fn pittsburgh() -> Self {
        Exif {
            ifd0: vec![
                (0x010f, Value::ascii("Apple")),
                (0x0110, Value::ascii("iPhone 6")),
                (0x0132, Value::ascii("2015:03:14 15:09:26")),
            ],
            exif: vec![],
            gps: Some(vec![
                (0x0001, Value::ascii("N")),
                (0x0002, Value::dms(40, 26, 46)),
                (0x0003, Value::ascii("W")),
                (0x0004, Value::dms(79, 58, 56)),
            ]),
        }
    }

    pub fn set(entries: &mut Vec<(u16, Value)>, tag: u16, value: Value) {
        entries.retain(|(t, _)| *t != tag);
        entries.push((tag, value));
    }

    pub fn remove(entries: &mut Vec<(u16, Value)>, tag: u16) {
        entries.retain(|(t, _)| *t != tag);
    }

    /// TIFF block; sub-IFDs are written first so IFD0 knows where they are.
    pub fn tiff<B: ByteOrder>(&self, marker: &[u8; 2]) -> Vec<u8> {
        let mut buf = marker.to_vec();
        buf.write_u16::<B>(42).unwrap();
        buf.write_u32::<B>(0).unwrap(); // patched below

        let mut ifd0 = self.ifd0.clone();
        if !self.exif.is_empty() {
            let off = buf.len() as u32;
            write_ifd::<B>(&mut buf, &self.exif);
            ifd0.push((EXIF_IFD_POINTER, Value::Long(off)));
        }
        if let Some(gps) = &self.gps {
            let off = buf.len() as u32;
            write_ifd::<B>(&mut buf, gps);
            ifd0.push((GPS_INFO_IFD_POINTER, Value::Long(off)));
        }

        let ifd0_offset = buf.len() as u32;
        write_ifd::<B>(&mut buf, &ifd0);
        B::write_u32(&mut buf[4..8], ifd0_offset);
        buf
    }

    pub fn big_endian_tiff(&self) -> Vec<u8> {
        self.tiff::<byteorder::BigEndian>(b"MM")
    }

    pub fn little_endian_tiff(&self) -> Vec<u8> {
        self.tiff::<byteorder::LittleEndian>(b"II")
    }

    pub fn jpeg(&self) -> Vec<u8> {
        wrap_jpeg(&self.big_endian_tiff())
    }
}

fn write_ifd<B: ByteOrder>(buf: &mut Vec<u8>, entries: &[(u16, Value)]) {
    const IFD_HEADER_LEN: usize = 12;
    const NEXT_IFD_PTR_LEN: usize = 4;

    let data_start = buf.len() + 2 + entries.len() * IFD_HEADER_LEN + NEXT_IFD_PTR_LEN;
    let mut data = vec![];

    buf.write_u16::<B>(entries.len() as u16).unwrap();
    for (tag, value) in entries {
        let bytes = value.encode::<B>();
        buf.write_u16::<B>(*tag).unwrap();
        buf.write_u16::<B>(value.format_code()).unwrap();
        buf.write_u32::<B>(value.count()).unwrap();
        if bytes.len() > 4 {
            buf.write_u32::<B>((data_start + data.len()) as u32).unwrap();
            data.extend_from_slice(&bytes);
        } else {
            // immediate data must be padded to 4 bytes
            let mut imm = bytes;
            imm.resize(4, 0);
            buf.extend_from_slice(&imm);
        }
    }
    buf.write_u32::<B>(0).unwrap();
    buf.extend_from_slice(&data);
}

/// SOI, a JFIF APP0, the exif APP1, a token scan and EOI.
pub fn wrap_jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8];
    jpeg.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    jpeg.extend_from_slice(b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
    jpeg.extend_from_slice(&[0xFF, 0xE1]);
    jpeg.write_u16::<byteorder::BigEndian>((2 + 6 + tiff.len()) as u16).unwrap();
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);
    jpeg.extend_from_slice(&plain_jpeg()[2..]);
    jpeg
}

/// A jpeg with no metadata segments at all.
pub fn plain_jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02, 0x00, 0x3F, 0xFF, 0xD9]
}
