// GestureWatch - Host-side Recordings
//
// Reads the raw-capture text stream (`aX,aY,aZ,gX,gY,gZ` rows, blank lines
// between gestures, header possibly repeated after a device reset).

use std::io::{Read, Write};

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder, Terminator, Trim, WriterBuilder};

use crate::config::{CHANNELS, RAW_HEADER};
use crate::sample::RawSample;

enum Row {
    Header,
    Blank,
    Sample(RawSample),
    Malformed(String),
}

fn classify(record: &ByteRecord) -> Row {
    if record.iter().all(<[u8]>::is_empty) {
        return Row::Blank;
    }
    if record.get(0) == Some(&b"aX"[..]) {
        return Row::Header;
    }
    if record.len() != CHANNELS {
        return Row::Malformed(format!("expected {} values, got {}", CHANNELS, record.len()));
    }

    let mut channels = [0.0f32; CHANNELS];
    for (slot, field) in channels.iter_mut().zip(record.iter()) {
        // Serial noise at connect or reset is not guaranteed to be UTF-8.
        let Ok(text) = std::str::from_utf8(field) else {
            return Row::Malformed("not valid UTF-8".into());
        };
        match text.parse::<f32>() {
            Ok(v) => *slot = v,
            Err(_) => return Row::Malformed(format!("invalid number {:?}", text)),
        }
    }
    Row::Sample(RawSample::from_channels(channels))
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Recording {
    pub samples: Vec<RawSample>,
    /// Rows dropped because they were not six numbers (including undecodable
    /// serial noise).
    pub skipped: usize,
}

pub fn load_recording<R: Read>(input: R) -> Result<Recording> {
    let mut recording = Recording::default();

    for (idx, result) in reader(input).byte_records().enumerate() {
        let record = result.with_context(|| format!("Unreadable row {}", idx + 1))?;
        match classify(&record) {
            Row::Sample(s) => recording.samples.push(s),
            Row::Header | Row::Blank => {}
            Row::Malformed(why) => {
                log::warn!("Skipping row {}: {}", idx + 1, why);
                recording.skipped += 1;
            }
        }
    }

    Ok(recording)
}

// ---------------------------------------------------------------------------
// Capture (serial stream -> training CSV)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    pub gestures: usize,
    pub samples: usize,
    pub rejected: usize,
}

/// Copy valid rows to `output` under a single header, counting a gesture
/// every `window_len` accepted rows.
pub fn capture<R: Read, W: Write>(
    input: R,
    output: W,
    window_len: usize,
) -> Result<CaptureSummary> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(output);
    writer.write_record(RAW_HEADER.split(','))?;

    let mut summary = CaptureSummary::default();
    let mut in_gesture = 0usize;

    for (idx, result) in reader(input).byte_records().enumerate() {
        let record = result.with_context(|| format!("Unreadable line {}", idx + 1))?;
        match classify(&record) {
            Row::Sample(_) => {
                writer.write_record(&record)?;
                summary.samples += 1;
                in_gesture += 1;
                if in_gesture == window_len {
                    in_gesture = 0;
                    summary.gestures += 1;
                    writer.flush()?;
                    log::info!(
                        "{} samples saved, total gestures captured: {}",
                        window_len,
                        summary.gestures
                    );
                }
            }
            Row::Header | Row::Blank => {}
            Row::Malformed(why) => {
                log::warn!("Unexpected line format ({}): {:?}", why, record);
                summary.rejected += 1;
            }
        }
    }

    writer.flush()?;
    Ok(summary)
}
