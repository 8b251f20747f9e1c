use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MorseElementType {
    Dot,
    Dash,
    Gap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorseElement {
    pub element_type: MorseElementType,
    pub duration_seconds: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingParams {
    pub wpm: i32,
    pub word_gap_multiplier: f32,
    /// 0.0 = metronomic ITU timing, 1.0 = maximum bounded jitter.
    pub humanization_factor: f32,
    pub random_seed: u64,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            wpm: 20,
            word_gap_multiplier: 1.0,
            humanization_factor: 0.0,
            random_seed: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToneParams {
    pub sample_rate: u32,
    pub freq_hz: f32,
    pub volume: f32,
}

impl Default for ToneParams {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            freq_hz: 700.0,
            volume: 0.5,
        }
    }
}

/// Channel impairments, applied in order drift -> fading -> noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelParams {
    /// AWGN level as signal-to-noise ratio in dB. `None` disables noise.
    pub noise_snr_db: Option<f32>,
    pub fading_enabled: bool,
    pub fade_depth: f32,
    pub fade_freq: f32,
    pub drift_enabled: bool,
    /// Peak carrier deviation in Hz.
    pub drift_amount: f32,
    /// Drift modulation rate in Hz.
    pub drift_rate: f32,
    pub noise_seed: u64,
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            noise_snr_db: None,
            fading_enabled: false,
            fade_depth: 0.5,
            fade_freq: 0.5,
            drift_enabled: false,
            drift_amount: 5.0,
            drift_rate: 0.2,
            noise_seed: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeParams {
    #[serde(flatten)]
    pub timing: TimingParams,
    #[serde(flatten)]
    pub tone: ToneParams,
    #[serde(flatten)]
    pub channel: ChannelParams,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeOutput {
    pub morse: String,
    #[serde(skip)]
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub duration_seconds: f32,
    pub channel_effects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecodeParams {
    /// Moving-RMS envelope window, in seconds.
    pub envelope_window_sec: f32,
    /// Runs shorter than this are treated as threshold chatter and merged.
    pub min_run_sec: f32,
    pub bandpass_enabled: bool,
    pub bandpass_width_hz: f32,
    pub tone_min_hz: f32,
    pub tone_max_hz: f32,
    pub include_visualization: bool,
    pub visualization_points: usize,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            envelope_window_sec: 0.010,
            min_run_sec: 0.005,
            bandpass_enabled: true,
            bandpass_width_hz: 100.0,
            tone_min_hz: 100.0,
            tone_max_hz: 3000.0,
            include_visualization: true,
            visualization_points: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    On,
    Off,
}

/// A maximal stretch of one binary state in the digitized signal. Runs
/// partition the sample stream with no gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    pub start: usize,
    pub duration: usize,
}

/// OFF-run duration class, serialized as 0|1|2 for the visualization contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum GapClass {
    Intra = 0,
    Letter = 1,
    Word = 2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnRunViz {
    pub duration: u64,
    pub label: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffRunViz {
    pub duration: u64,
    pub label: GapClass,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusteringViz {
    pub on: Vec<OnRunViz>,
    pub off: Vec<OffRunViz>,
    pub on_centers: Vec<f32>,
    pub off_centers: Vec<f32>,
    pub on_boundaries: Vec<f32>,
    pub off_boundaries: Vec<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Visualization {
    pub audio: Vec<f32>,
    pub envelope: Vec<f32>,
    pub threshold: f32,
    pub square: Vec<u8>,
    pub clustering: ClusteringViz,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecodeOutput {
    pub morse: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
}
