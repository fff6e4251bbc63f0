//! IGC record parsing.
//!
//! Only the records the tracker needs are interpreted: the `HFDTE`, `HFPLT`,
//! `HFGTY` and `HFGID` headers and `B` fix records. Everything else is skipped.

use chrono::NaiveDate;
use log::debug;

use crate::distance::track_length_km;
use crate::errors::IgcError;

/// A single position fix, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
}

/// Parsed flight log.
#[derive(Debug, Clone, PartialEq)]
pub struct IgcTrack {
    pub date: NaiveDate,
    pub pilot: String,
    pub glider_type: String,
    pub glider_id: String,
    pub fixes: Vec<Fix>,
}

impl IgcTrack {
    /// Flown distance over all fixes, in km.
    pub fn track_length(&self) -> f64 {
        let points: Vec<(f64, f64)> = self
            .fixes
            .iter()
            .map(|fix| (fix.latitude, fix.longitude))
            .collect();
        track_length_km(&points)
    }
}

/// Parses the textual content of an IGC file.
pub fn parse(content: &str) -> Result<IgcTrack, IgcError> {
    let content = content.trim_start_matches('\u{feff}');
    if !content.trim_start().starts_with('A') {
        return Err(IgcError::NotIgc);
    }

    let mut date = None;
    let mut pilot = String::new();
    let mut glider_type = String::new();
    let mut glider_id = String::new();
    let mut fixes = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim_end();
        let number = index + 1;
        match line.as_bytes().first() {
            Some(b'H') => {
                let Some(code) = line.get(2..5) else {
                    continue;
                };
                match code {
                    "DTE" => date = Some(parse_date(line, number)?),
                    "PLT" => pilot = header_value(line),
                    "GTY" => glider_type = header_value(line),
                    "GID" => glider_id = header_value(line),
                    _ => {}
                }
            }
            Some(b'B') => fixes.push(parse_fix(line, number)?),
            _ => {}
        }
    }

    let date = date.ok_or(IgcError::MissingHeader("HFDTE"))?;
    debug!("Parsed IGC log of {} with {} fixes", date, fixes.len());
    Ok(IgcTrack {
        date,
        pilot,
        glider_type,
        glider_id,
        fixes,
    })
}

/// Value after the first `:`; headers without one carry it after the code.
fn header_value(line: &str) -> String {
    match line.split_once(':') {
        Some((_, value)) => value.trim().to_string(),
        None => line.get(5..).unwrap_or_default().trim().to_string(),
    }
}

/// `HFDTEDDMMYY` or `HFDTEDATE:DDMMYY[,NN]`.
fn parse_date(line: &str, number: usize) -> Result<NaiveDate, IgcError> {
    let malformed = |reason: &str| IgcError::MalformedRecord {
        line: number,
        reason: reason.to_string(),
    };

    let value = match line.split_once(':') {
        Some((_, value)) => value,
        None => line.get(5..).unwrap_or_default(),
    };
    let digits = value
        .trim()
        .get(..6)
        .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| malformed("date must be DDMMYY"))?;

    let day = digits[0..2].parse().map_err(|_| malformed("bad day"))?;
    let month = digits[2..4].parse().map_err(|_| malformed("bad month"))?;
    let yy: i32 = digits[4..6].parse().map_err(|_| malformed("bad year"))?;
    let year = if yy < 80 { 2000 + yy } else { 1900 + yy };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| malformed("date out of range"))
}

/// `BHHMMSSDDMMmmmNDDDMMmmmEV...`
fn parse_fix(line: &str, number: usize) -> Result<Fix, IgcError> {
    let malformed = |reason: &str| IgcError::MalformedRecord {
        line: number,
        reason: reason.to_string(),
    };
    if line.len() < 24 || !line.is_ascii() {
        return Err(malformed("fix record too short"));
    }

    let latitude = coordinate(&line[7..9], &line[9..14], &line[14..15], 'S')
        .ok_or_else(|| malformed("bad latitude"))?;
    let longitude = coordinate(&line[15..18], &line[18..23], &line[23..24], 'W')
        .ok_or_else(|| malformed("bad longitude"))?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(malformed("coordinate out of range"));
    }
    Ok(Fix {
        latitude,
        longitude,
    })
}

/// Degrees plus minutes-in-thousandths, negated for the given hemisphere.
fn coordinate(
    degrees: &str,
    thousandth_minutes: &str,
    hemisphere: &str,
    negative: char,
) -> Option<f64> {
    let degrees: f64 = degrees.parse().ok()?;
    let minutes = thousandth_minutes.parse::<u32>().ok()? as f64 / 1000.0;
    if minutes >= 60.0 {
        return None;
    }
    let value = degrees + minutes / 60.0;
    match hemisphere.chars().next()? {
        c if c == negative => Some(-value),
        'N' | 'S' | 'E' | 'W' => Some(value),
        _ => None,
    }
}
