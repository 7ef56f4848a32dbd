#![allow(dead_code)]

use midiscore::vlq;

/// Assembles a track body one delta-tagged event at a time.
#[derive(Default)]
pub struct TrackBuilder {
    bytes: Vec<u8>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(mut self, delta: u32, data: &[u8]) -> Self {
        let mut buf = [0; 4];
        self.bytes
            .extend_from_slice(vlq::encode(delta, &mut buf).unwrap());
        self.bytes.extend_from_slice(data);
        self
    }

    /// Raw bytes with no delta in front, for running status data.
    pub fn raw(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(data);
        self
    }

    pub fn note_on(self, delta: u32, channel: u8, pitch: u8, velocity: u8) -> Self {
        self.event(delta, &[0x90 | channel, pitch, velocity])
    }

    pub fn note_off(self, delta: u32, channel: u8, pitch: u8, velocity: u8) -> Self {
        self.event(delta, &[0x80 | channel, pitch, velocity])
    }

    pub fn tempo(self, delta: u32, micros_per_quarter: u32) -> Self {
        let [_, a, b, c] = micros_per_quarter.to_be_bytes();
        self.event(delta, &[0xFF, 0x51, 0x03, a, b, c])
    }

    pub fn meta(self, delta: u32, kind: u8, payload: &[u8]) -> Self {
        let mut data = vec![0xFF, kind];
        let mut buf = [0; 4];
        data.extend_from_slice(vlq::encode(payload.len() as u32, &mut buf).unwrap());
        data.extend_from_slice(payload);
        self.event(delta, &data)
    }

    pub fn end(self, delta: u32) -> Self {
        self.event(delta, &[0xFF, 0x2F, 0x00])
    }

    pub fn body(&self) -> &[u8] {
        &self.bytes
    }

    pub fn chunk(&self) -> Vec<u8> {
        chunk(b"MTrk", &self.bytes)
    }
}

pub fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

pub fn header(format: u16, tracks: u16, division: u16) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&format.to_be_bytes());
    body.extend_from_slice(&tracks.to_be_bytes());
    body.extend_from_slice(&division.to_be_bytes());
    chunk(b"MThd", &body)
}

/// A complete file with one `MTrk` chunk per builder.
pub fn file(format: u16, division: u16, tracks: &[TrackBuilder]) -> Vec<u8> {
    let mut out = header(format, tracks.len() as u16, division);
    for track in tracks {
        out.extend(track.chunk());
    }
    out
}
