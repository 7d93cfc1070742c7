//! Request normalization.
//!
//! [`normalize_request`] turns one operation's raw parameters into a
//! [`NormalizedRequest`] or the first [`ValidationError`] found. Fields are
//! visited in a fixed order:
//!
//! 1. list fields: `ckQualities`, `spkQualities`, `kernelList`, `spiceqlNames`, `types`
//! 2. kernel search options: `searchKernels`, `fullKernelPath`, `limitCk`, `limitSpk`
//! 3. time points: `ets`, or `startEts`/`stopEts` with `numRecords` or `exposureDuration`
//! 4. the operation's own scalar fields, in declaration order
//!
//! Nothing is forwarded unless every field validates.

use crate::compute::list::normalize_list;
use crate::compute::times::{TimeInputs, derive_times};
use crate::compute::validation::{
    optional_bool, optional_float, optional_int, optional_text, require_float, require_int,
    require_text,
};
use crate::config::NormalizeConfig;
use crate::error::ValidationError;
use ephemq_types::kernel::{KernelSearchOptions, all_kernel_types, default_qualities};
use ephemq_types::raw::RawValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw, unvalidated parameters of a single request.
///
/// Deserializes from a JSON body as-is, or from query-string pairs via
/// [`RawParams::from_query_pairs`]. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawParams {
    // time points
    pub ets: Option<RawValue>,
    pub start_ets: Option<RawValue>,
    pub stop_ets: Option<RawValue>,
    pub num_records: Option<RawValue>,
    pub exposure_duration: Option<RawValue>,

    // lists
    pub ck_qualities: Option<RawValue>,
    pub spk_qualities: Option<RawValue>,
    pub kernel_list: Option<RawValue>,
    pub spiceql_names: Option<RawValue>,
    pub types: Option<RawValue>,

    // kernel search
    pub search_kernels: Option<RawValue>,
    pub full_kernel_path: Option<RawValue>,
    pub limit_ck: Option<RawValue>,
    pub limit_spk: Option<RawValue>,

    // operation fields
    pub target: Option<RawValue>,
    pub observer: Option<RawValue>,
    pub frame: Option<RawValue>,
    pub abcorr: Option<RawValue>,
    pub mission: Option<RawValue>,
    pub to_frame: Option<RawValue>,
    pub ref_frame: Option<RawValue>,
    pub frame_code: Option<RawValue>,
    pub sclk: Option<RawValue>,
    pub et: Option<RawValue>,
    pub utc: Option<RawValue>,
    pub format: Option<RawValue>,
    pub precision: Option<RawValue>,
    pub target_id: Option<RawValue>,
    pub key: Option<RawValue>,
    pub initial_frame: Option<RawValue>,
    pub observ_start: Option<RawValue>,
    pub observ_end: Option<RawValue>,
    pub target_frame: Option<RawValue>,
    pub start_et: Option<RawValue>,
    pub stop_et: Option<RawValue>,
    pub start_time: Option<RawValue>,
    pub stop_time: Option<RawValue>,
    pub overwrite: Option<RawValue>,
}

impl RawParams {
    /// Builds parameters from query-string pairs.
    ///
    /// Every value stays text. A key that repeats becomes a list of its
    /// values in arrival order.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = serde_json::Map::new();
        for (key, value) in pairs {
            let value = serde_json::Value::String(value.into());
            match map.entry(key.into()) {
                serde_json::map::Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                serde_json::map::Entry::Occupied(mut slot) => match slot.get_mut() {
                    serde_json::Value::Array(items) => items.push(value),
                    existing => {
                        let first = existing.take();
                        *existing = serde_json::Value::Array(vec![first, value]);
                    }
                },
            }
        }

        Self::from_json(serde_json::Value::Object(map))
    }

    /// Builds parameters from an already parsed JSON value.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value)
            .map_err(|e| ValidationError::Parse(format!("malformed request parameters: {}", e)))
    }

    fn time_inputs(&self) -> TimeInputs<'_> {
        TimeInputs {
            ets: self.ets.as_ref(),
            start: self.start_ets.as_ref(),
            stop: self.stop_ets.as_ref(),
            count: self.num_records.as_ref(),
            duration: self.exposure_duration.as_ref(),
        }
    }
}

/// Operations the external engine answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    GetTargetStates,
    GetTargetOrientations,
    StrSclkToEt,
    DoubleSclkToEt,
    DoubleEtToSclk,
    UtcToEt,
    EtToUtc,
    TranslateNameToCode,
    TranslateCodeToName,
    GetFrameInfo,
    GetTargetFrameInfo,
    FindMissionKeywords,
    FindTargetKeywords,
    FrameTrace,
    ExtractExactCkTimes,
    GetExactTargetOrientations,
    SearchForKernelsets,
}

impl Operation {
    pub const ALL: [Operation; 17] = [
        Operation::GetTargetStates,
        Operation::GetTargetOrientations,
        Operation::StrSclkToEt,
        Operation::DoubleSclkToEt,
        Operation::DoubleEtToSclk,
        Operation::UtcToEt,
        Operation::EtToUtc,
        Operation::TranslateNameToCode,
        Operation::TranslateCodeToName,
        Operation::GetFrameInfo,
        Operation::GetTargetFrameInfo,
        Operation::FindMissionKeywords,
        Operation::FindTargetKeywords,
        Operation::FrameTrace,
        Operation::ExtractExactCkTimes,
        Operation::GetExactTargetOrientations,
        Operation::SearchForKernelsets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::GetTargetStates => "getTargetStates",
            Operation::GetTargetOrientations => "getTargetOrientations",
            Operation::StrSclkToEt => "strSclkToEt",
            Operation::DoubleSclkToEt => "doubleSclkToEt",
            Operation::DoubleEtToSclk => "doubleEtToSclk",
            Operation::UtcToEt => "utcToEt",
            Operation::EtToUtc => "etToUtc",
            Operation::TranslateNameToCode => "translateNameToCode",
            Operation::TranslateCodeToName => "translateCodeToName",
            Operation::GetFrameInfo => "getFrameInfo",
            Operation::GetTargetFrameInfo => "getTargetFrameInfo",
            Operation::FindMissionKeywords => "findMissionKeywords",
            Operation::FindTargetKeywords => "findTargetKeywords",
            Operation::FrameTrace => "frameTrace",
            Operation::ExtractExactCkTimes => "extractExactCkTimes",
            Operation::GetExactTargetOrientations => "getExactTargetOrientations",
            Operation::SearchForKernelsets => "searchForKernelsets",
        }
    }

    /// Route path, e.g. `/getTargetStates`.
    pub fn path(self) -> String {
        format!("/{}", self.name())
    }

    fn default_limit_ck(self) -> i64 {
        match self {
            Operation::ExtractExactCkTimes => 1,
            _ => KernelSearchOptions::DEFAULT_LIMIT_CK,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s.trim_start_matches('/'))
            .ok_or_else(|| ValidationError::Parse(format!("unknown operation: {}", s)))
    }
}

/// Validated, operation-specific engine arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Query {
    GetTargetStates {
        ets: Vec<f64>,
        target: String,
        observer: String,
        frame: String,
        abcorr: String,
        mission: String,
        ck_qualities: Vec<String>,
        spk_qualities: Vec<String>,
    },
    GetTargetOrientations {
        ets: Vec<f64>,
        to_frame: i64,
        ref_frame: i64,
        mission: String,
        ck_qualities: Vec<String>,
    },
    StrSclkToEt {
        frame_code: i64,
        sclk: String,
        mission: String,
    },
    DoubleSclkToEt {
        frame_code: i64,
        sclk: f64,
        mission: String,
    },
    DoubleEtToSclk {
        frame_code: i64,
        et: f64,
        mission: String,
    },
    UtcToEt {
        utc: String,
    },
    EtToUtc {
        et: f64,
        format: String,
        precision: f64,
    },
    TranslateNameToCode {
        frame: String,
        mission: String,
    },
    TranslateCodeToName {
        frame: i64,
        mission: String,
    },
    GetFrameInfo {
        frame: i64,
        mission: String,
    },
    GetTargetFrameInfo {
        target_id: i64,
        mission: String,
    },
    FindMissionKeywords {
        key: String,
        mission: String,
    },
    FindTargetKeywords {
        key: String,
        mission: String,
    },
    FrameTrace {
        et: f64,
        initial_frame: i64,
        mission: String,
        ck_qualities: Vec<String>,
        spk_qualities: Vec<String>,
    },
    ExtractExactCkTimes {
        observ_start: f64,
        observ_end: f64,
        target_frame: i64,
        mission: String,
        ck_qualities: Vec<String>,
    },
    GetExactTargetOrientations {
        start_et: f64,
        stop_et: f64,
        to_frame: i64,
        ref_frame: i64,
        mission: String,
        ck_qualities: Vec<String>,
    },
    SearchForKernelsets {
        spiceql_names: Vec<String>,
        types: Vec<String>,
        start_time: f64,
        stop_time: f64,
        ck_qualities: Vec<String>,
        spk_qualities: Vec<String>,
        overwrite: bool,
    },
}

impl Query {
    pub fn operation(&self) -> Operation {
        match self {
            Query::GetTargetStates { .. } => Operation::GetTargetStates,
            Query::GetTargetOrientations { .. } => Operation::GetTargetOrientations,
            Query::StrSclkToEt { .. } => Operation::StrSclkToEt,
            Query::DoubleSclkToEt { .. } => Operation::DoubleSclkToEt,
            Query::DoubleEtToSclk { .. } => Operation::DoubleEtToSclk,
            Query::UtcToEt { .. } => Operation::UtcToEt,
            Query::EtToUtc { .. } => Operation::EtToUtc,
            Query::TranslateNameToCode { .. } => Operation::TranslateNameToCode,
            Query::TranslateCodeToName { .. } => Operation::TranslateCodeToName,
            Query::GetFrameInfo { .. } => Operation::GetFrameInfo,
            Query::GetTargetFrameInfo { .. } => Operation::GetTargetFrameInfo,
            Query::FindMissionKeywords { .. } => Operation::FindMissionKeywords,
            Query::FindTargetKeywords { .. } => Operation::FindTargetKeywords,
            Query::FrameTrace { .. } => Operation::FrameTrace,
            Query::ExtractExactCkTimes { .. } => Operation::ExtractExactCkTimes,
            Query::GetExactTargetOrientations { .. } => Operation::GetExactTargetOrientations,
            Query::SearchForKernelsets { .. } => Operation::SearchForKernelsets,
        }
    }
}

/// A fully validated request, ready for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRequest {
    #[serde(flatten)]
    pub query: Query,
    pub options: KernelSearchOptions,
}

impl NormalizedRequest {
    pub fn operation(&self) -> Operation {
        self.query.operation()
    }
}

/// Normalized list fields, before the operation picks what it needs.
struct Lists {
    ck_qualities: Vec<String>,
    spk_qualities: Vec<String>,
    spiceql_names: Option<Vec<String>>,
    types: Vec<String>,
}

fn normalize_lists(params: &RawParams, config: &NormalizeConfig) -> (Lists, Vec<String>) {
    let ck_qualities =
        normalize_list(params.ck_qualities.as_ref(), config).unwrap_or_else(default_qualities);
    let spk_qualities =
        normalize_list(params.spk_qualities.as_ref(), config).unwrap_or_else(default_qualities);
    let kernel_list = normalize_list(params.kernel_list.as_ref(), config).unwrap_or_default();
    let spiceql_names = normalize_list(params.spiceql_names.as_ref(), config);
    let types = normalize_list(params.types.as_ref(), config).unwrap_or_else(all_kernel_types);

    log::debug!(
        "normalized lists: ckQualities={:?} spkQualities={:?} kernelList={:?}",
        ck_qualities,
        spk_qualities,
        kernel_list
    );

    (
        Lists {
            ck_qualities,
            spk_qualities,
            spiceql_names,
            types,
        },
        kernel_list,
    )
}

fn search_options(
    operation: Operation,
    params: &RawParams,
    kernel_list: Vec<String>,
) -> Result<KernelSearchOptions, ValidationError> {
    let defaults = KernelSearchOptions::default();
    Ok(KernelSearchOptions {
        use_web: false,
        search_kernels: optional_bool(
            "searchKernels",
            params.search_kernels.as_ref(),
            defaults.search_kernels,
        )?,
        full_kernel_path: optional_bool(
            "fullKernelPath",
            params.full_kernel_path.as_ref(),
            defaults.full_kernel_path,
        )?,
        limit_ck: optional_int("limitCk", params.limit_ck.as_ref(), operation.default_limit_ck())?,
        limit_spk: optional_int("limitSpk", params.limit_spk.as_ref(), defaults.limit_spk)?,
        kernel_list,
    })
}

/// Normalizes the raw parameters of `operation`.
///
/// Fails with the first error found; see the module docs for field order.
///
/// # Examples
///
/// ```
/// use ephemq::config::NormalizeConfig;
/// use ephemq::request::{Operation, Query, RawParams, normalize_request};
///
/// let params = RawParams::from_query_pairs([
///     ("target", "LUNAR RECONNAISSANCE ORBITER"),
///     ("observer", "MOON"),
///     ("frame", "J2000"),
///     ("abcorr", "None"),
///     ("mission", "lroc"),
///     ("ets", "[302228504.36824864]"),
/// ])?;
///
/// let request = normalize_request(Operation::GetTargetStates, &params, &NormalizeConfig::default())?;
/// match request.query {
///     Query::GetTargetStates { ets, ck_qualities, .. } => {
///         assert_eq!(ets, vec![302228504.36824864]);
///         assert_eq!(ck_qualities, vec!["smithed", "reconstructed"]);
///     }
///     other => panic!("unexpected query {:?}", other),
/// }
/// # Ok::<(), ephemq::ValidationError>(())
/// ```
pub fn normalize_request(
    operation: Operation,
    params: &RawParams,
    config: &NormalizeConfig,
) -> Result<NormalizedRequest, ValidationError> {
    let (lists, kernel_list) = normalize_lists(params, config);
    let options = search_options(operation, params, kernel_list)?;

    let p = params;
    let mission = || optional_text("mission", p.mission.as_ref(), "");
    let times = || derive_times(p.time_inputs(), config);

    let query = match operation {
        Operation::GetTargetStates => {
            let ets = times()?;
            Query::GetTargetStates {
                ets,
                target: require_text("target", p.target.as_ref())?,
                observer: require_text("observer", p.observer.as_ref())?,
                frame: require_text("frame", p.frame.as_ref())?,
                abcorr: require_text("abcorr", p.abcorr.as_ref())?,
                mission: mission()?,
                ck_qualities: lists.ck_qualities,
                spk_qualities: lists.spk_qualities,
            }
        }
        Operation::GetTargetOrientations => {
            let ets = times()?;
            Query::GetTargetOrientations {
                ets,
                to_frame: require_int("toFrame", p.to_frame.as_ref())?,
                ref_frame: require_int("refFrame", p.ref_frame.as_ref())?,
                mission: mission()?,
                ck_qualities: lists.ck_qualities,
            }
        }
        Operation::StrSclkToEt => Query::StrSclkToEt {
            frame_code: require_int("frameCode", p.frame_code.as_ref())?,
            sclk: require_text("sclk", p.sclk.as_ref())?,
            mission: mission()?,
        },
        Operation::DoubleSclkToEt => Query::DoubleSclkToEt {
            frame_code: require_int("frameCode", p.frame_code.as_ref())?,
            sclk: require_float("sclk", p.sclk.as_ref())?,
            mission: mission()?,
        },
        Operation::DoubleEtToSclk => Query::DoubleEtToSclk {
            frame_code: require_int("frameCode", p.frame_code.as_ref())?,
            et: require_float("et", p.et.as_ref())?,
            mission: mission()?,
        },
        Operation::UtcToEt => Query::UtcToEt {
            utc: require_text("utc", p.utc.as_ref())?,
        },
        Operation::EtToUtc => Query::EtToUtc {
            et: require_float("et", p.et.as_ref())?,
            format: require_text("format", p.format.as_ref())?,
            precision: require_float("precision", p.precision.as_ref())?,
        },
        Operation::TranslateNameToCode => Query::TranslateNameToCode {
            frame: require_text("frame", p.frame.as_ref())?,
            mission: mission()?,
        },
        Operation::TranslateCodeToName => Query::TranslateCodeToName {
            frame: require_int("frame", p.frame.as_ref())?,
            mission: mission()?,
        },
        Operation::GetFrameInfo => Query::GetFrameInfo {
            frame: require_int("frame", p.frame.as_ref())?,
            mission: mission()?,
        },
        Operation::GetTargetFrameInfo => Query::GetTargetFrameInfo {
            target_id: require_int("targetId", p.target_id.as_ref())?,
            mission: mission()?,
        },
        Operation::FindMissionKeywords => Query::FindMissionKeywords {
            key: require_text("key", p.key.as_ref())?,
            mission: mission()?,
        },
        Operation::FindTargetKeywords => Query::FindTargetKeywords {
            key: require_text("key", p.key.as_ref())?,
            mission: mission()?,
        },
        Operation::FrameTrace => Query::FrameTrace {
            et: require_float("et", p.et.as_ref())?,
            initial_frame: require_int("initialFrame", p.initial_frame.as_ref())?,
            mission: mission()?,
            ck_qualities: lists.ck_qualities,
            spk_qualities: lists.spk_qualities,
        },
        Operation::ExtractExactCkTimes => Query::ExtractExactCkTimes {
            observ_start: require_float("observStart", p.observ_start.as_ref())?,
            observ_end: require_float("observEnd", p.observ_end.as_ref())?,
            target_frame: require_int("targetFrame", p.target_frame.as_ref())?,
            mission: mission()?,
            ck_qualities: lists.ck_qualities,
        },
        Operation::GetExactTargetOrientations => Query::GetExactTargetOrientations {
            start_et: require_float("startEt", p.start_et.as_ref())?,
            stop_et: require_float("stopEt", p.stop_et.as_ref())?,
            to_frame: require_int("toFrame", p.to_frame.as_ref())?,
            ref_frame: require_int("refFrame", p.ref_frame.as_ref())?,
            mission: mission()?,
            ck_qualities: lists.ck_qualities,
        },
        Operation::SearchForKernelsets => Query::SearchForKernelsets {
            spiceql_names: lists.spiceql_names.ok_or_else(|| {
                ValidationError::MissingParameter("spiceqlNames is required".to_string())
            })?,
            types: lists.types,
            start_time: optional_float("startTime", p.start_time.as_ref(), -f64::MAX)?,
            stop_time: optional_float("stopTime", p.stop_time.as_ref(), f64::MAX)?,
            ck_qualities: lists.ck_qualities,
            spk_qualities: lists.spk_qualities,
            overwrite: optional_bool("overwrite", p.overwrite.as_ref(), false)?,
        },
    };

    log::debug!("normalized {} request", operation);
    Ok(NormalizedRequest { query, options })
}
