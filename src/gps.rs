use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Rational, Result};

/// How hemisphere references turn into a coordinate's sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HemisphereRule {
    /// Latitude is negative only for exactly "S". Longitude is positive only
    /// for exactly "E" and negative for anything else, so a garbage longitude
    /// ref flips the sign while a garbage latitude ref does not.
    #[default]
    Legacy,
    /// "S" and "W" are negative, "N" and "E" positive, anything else is
    /// rejected with [`Error::UnknownHemisphere`].
    Strict,
}

/// Fold degrees, minutes and seconds into decimal degrees.
///
/// A 0/0 component counts as zero. No rounding or clamping is done.
pub fn to_decimal_degrees(deg: Rational, min: Rational, sec: Rational) -> Result<f64> {
    Ok(component(deg)? + component(min)? / 60.0 + component(sec)? / 3600.0)
}

fn component(r: Rational) -> Result<f64> {
    match r.to_f64() {
        Err(Error::Indeterminate) => Ok(0.0),
        v => v,
    }
}

/// Signed latitude from the GPSLatitude triple and GPSLatitudeRef.
pub fn resolve_latitude(
    raw: Option<&[Rational; 3]>,
    reference: Option<&str>,
    rule: HemisphereRule,
) -> Result<f64> {
    let (degrees, reference) = unsigned(raw, reference)?;
    let negative = match rule {
        HemisphereRule::Legacy => reference == "S",
        HemisphereRule::Strict => strict_sign(reference, "N", "S")?,
    };
    Ok(if negative { -degrees } else { degrees })
}

/// Signed longitude from the GPSLongitude triple and GPSLongitudeRef.
pub fn resolve_longitude(
    raw: Option<&[Rational; 3]>,
    reference: Option<&str>,
    rule: HemisphereRule,
) -> Result<f64> {
    let (degrees, reference) = unsigned(raw, reference)?;
    let negative = match rule {
        HemisphereRule::Legacy => reference != "E",
        HemisphereRule::Strict => strict_sign(reference, "E", "W")?,
    };
    Ok(if negative { -degrees } else { degrees })
}

fn unsigned<'a>(raw: Option<&[Rational; 3]>, reference: Option<&'a str>) -> Result<(f64, &'a str)> {
    let (Some([deg, min, sec]), Some(reference)) = (raw, reference) else {
        return Err(Error::MissingGpsData);
    };
    if reference.is_empty() {
        return Err(Error::MissingGpsData);
    }
    Ok((to_decimal_degrees(*deg, *min, *sec)?, reference))
}

fn strict_sign(reference: &str, positive: &str, negative: &str) -> Result<bool> {
    if reference == positive {
        Ok(false)
    } else if reference == negative {
        Ok(true)
    } else {
        warn!(reference, "unrecognised hemisphere reference");
        Err(Error::UnknownHemisphere(reference.to_owned()))
    }
}
