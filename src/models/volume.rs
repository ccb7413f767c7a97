//! Volume representations, reduced to an amplitude for ISiS `loud_accents`

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "VolumeSpec", into = "VolumeSpec")]
pub enum Volume {
    /// Linear amplitude, 0.0 - 1.0
    Direct(f64),
    /// Decibel relative to full scale (0 dB = amplitude 1)
    Decibel(f64),
    /// MIDI velocity 0-127
    MidiVelocity(u8),
}

impl Volume {
    /// Linear amplitude clamped to 0.0 - 1.0
    pub fn amplitude(&self) -> f64 {
        let amplitude = match self {
            Volume::Direct(amplitude) => *amplitude,
            Volume::Decibel(db) => 10f64.powf(db / 20.0),
            Volume::MidiVelocity(velocity) => *velocity as f64 / 127.0,
        };
        amplitude.clamp(0.0, 1.0)
    }
}

/// Wire shape: 0.5, {decibel: -6} or {velocity: 100}
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum VolumeSpec {
    Direct(f64),
    Decibel { decibel: f64 },
    Velocity { velocity: u8 },
}

impl From<VolumeSpec> for Volume {
    fn from(spec: VolumeSpec) -> Self {
        match spec {
            VolumeSpec::Direct(amplitude) => Volume::Direct(amplitude),
            VolumeSpec::Decibel { decibel } => Volume::Decibel(decibel),
            VolumeSpec::Velocity { velocity } => Volume::MidiVelocity(velocity),
        }
    }
}

impl From<Volume> for VolumeSpec {
    fn from(volume: Volume) -> Self {
        match volume {
            Volume::Direct(amplitude) => VolumeSpec::Direct(amplitude),
            Volume::Decibel(decibel) => VolumeSpec::Decibel { decibel },
            Volume::MidiVelocity(velocity) => VolumeSpec::Velocity { velocity },
        }
    }
}
