//! Derivation of ephemeris time sequences.
//!
//! A caller either lists times (`ets`) or describes them with `startEts`,
//! `stopEts` and exactly one of `numRecords` or `exposureDuration`. The
//! start/stop/duration triple may also be given as equal-length parallel
//! lists, one half-open segment per index.
//!
//! ## Duration ranges
//!
//! A duration range is half-open: `start + i * duration` for every `i` whose
//! value is below `stop`. The point count is
//! `ceil((stop - start) / duration - step_tolerance)`, so a `stop` that lands
//! on a step within floating point noise is excluded rather than emitted as a
//! near-duplicate of `stop`. Points are computed by multiplication, never by
//! accumulation.

use crate::compute::literal::{Literal, parse_literal, parse_number};
use crate::config::NormalizeConfig;
use crate::error::ValidationError;
use ephemq_types::raw::RawValue;
use ephemq_types::time::TimeSpec;

pub const ETS: &str = "ets";
pub const START_ETS: &str = "startEts";
pub const STOP_ETS: &str = "stopEts";
pub const NUM_RECORDS: &str = "numRecords";
pub const EXPOSURE_DURATION: &str = "exposureDuration";

type Result<T> = std::result::Result<T, ValidationError>;

/// The raw time parameters of one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeInputs<'a> {
    pub ets: Option<&'a RawValue>,
    pub start: Option<&'a RawValue>,
    pub stop: Option<&'a RawValue>,
    pub count: Option<&'a RawValue>,
    pub duration: Option<&'a RawValue>,
}

/// A numeric parameter that is either one number or a list of numbers.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Scalar(f64),
    Sequence(Vec<f64>),
}

impl Shape {
    fn describe(&self) -> &'static str {
        match self {
            Shape::Scalar(_) => "a number",
            Shape::Sequence(_) => "a list",
        }
    }
}

fn shape_of(field: &str, raw: &RawValue) -> Result<Shape> {
    match raw {
        RawValue::Number(v) => Ok(Shape::Scalar(*v)),
        RawValue::Text(s) => Ok(match parse_literal(field, s)? {
            Literal::Scalar(v) => Shape::Scalar(v),
            Literal::Sequence(values) => Shape::Sequence(values),
        }),
        RawValue::List(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| element(field, idx, item))
            .collect::<Result<Vec<_>>>()
            .map(Shape::Sequence),
        RawValue::Bool(_) => Err(ValidationError::TypeMismatch(format!(
            "{} must be a number or a list of numbers, got a boolean",
            field
        ))),
    }
}

fn element(field: &str, idx: usize, item: &RawValue) -> Result<f64> {
    match item {
        RawValue::Number(v) => Ok(*v),
        RawValue::Text(s) => parse_number(&format!("{}[{}]", field, idx), s),
        other => Err(ValidationError::TypeMismatch(format!(
            "{} element at index {} must be a number, got a {}",
            field,
            idx,
            other.kind()
        ))),
    }
}

fn count_of(raw: &RawValue) -> Result<usize> {
    let count = match shape_of(NUM_RECORDS, raw)? {
        Shape::Scalar(v) => v,
        Shape::Sequence(_) => {
            return Err(ValidationError::TypeMismatch(format!(
                "{} must be a single integer, got a list",
                NUM_RECORDS
            )));
        }
    };

    if !count.is_finite() || count.fract() != 0.0 || count < 1.0 {
        return Err(ValidationError::InvalidValue(format!(
            "{} must be a positive integer, got: {}",
            NUM_RECORDS, count
        )));
    }
    Ok(count as usize)
}

/// Resolves raw time parameters into a [`TimeSpec`] without expanding it.
///
/// `ets` wins whenever it is present; range parameters are then ignored.
pub fn resolve_time_spec(inputs: TimeInputs<'_>) -> Result<TimeSpec> {
    if let Some(ets) = inputs.ets {
        let values = match shape_of(ETS, ets)? {
            Shape::Scalar(v) => vec![v],
            Shape::Sequence(values) => values,
        };
        return Ok(TimeSpec::explicit(values));
    }

    let mut missing = Vec::new();
    if inputs.start.is_none() {
        missing.push(START_ETS);
    }
    if inputs.stop.is_none() {
        missing.push(STOP_ETS);
    }
    if inputs.count.is_none() && inputs.duration.is_none() {
        missing.push("numRecords or exposureDuration");
    }

    let (Some(start), Some(stop)) = (inputs.start, inputs.stop) else {
        return Err(missing_range(&missing));
    };
    if !missing.is_empty() {
        return Err(missing_range(&missing));
    }

    let start = shape_of(START_ETS, start)?;
    let stop = shape_of(STOP_ETS, stop)?;

    match (inputs.count, inputs.duration) {
        (Some(_), Some(_)) => Err(ValidationError::MissingParameter(format!(
            "exactly one of {} or {} may accompany {} and {}, got both",
            NUM_RECORDS, EXPOSURE_DURATION, START_ETS, STOP_ETS
        ))),
        (Some(count), None) => match (start, stop) {
            (Shape::Scalar(start), Shape::Scalar(stop)) => {
                Ok(TimeSpec::by_count(start, stop, count_of(count)?))
            }
            (start, stop) => Err(ValidationError::TypeMismatch(format!(
                "{} requires {} and {} to be numbers, got {} and {}",
                NUM_RECORDS,
                START_ETS,
                STOP_ETS,
                start.describe(),
                stop.describe()
            ))),
        },
        (None, Some(duration)) => {
            match (start, stop, shape_of(EXPOSURE_DURATION, duration)?) {
                (Shape::Scalar(start), Shape::Scalar(stop), Shape::Scalar(duration)) => {
                    Ok(TimeSpec::by_duration(start, stop, duration))
                }
                (Shape::Sequence(starts), Shape::Sequence(stops), Shape::Sequence(durations)) => {
                    check_lengths(&starts, &stops, &durations)?;
                    Ok(TimeSpec::segmented(starts, stops, durations))
                }
                (start, stop, duration) => Err(ValidationError::TypeMismatch(format!(
                    "{}, {} and {} must be all numbers or all lists of the same length, got {}, {} and {}",
                    START_ETS,
                    STOP_ETS,
                    EXPOSURE_DURATION,
                    start.describe(),
                    stop.describe(),
                    duration.describe()
                ))),
            }
        }
        (None, None) => Err(missing_range(&["numRecords or exposureDuration"])),
    }
}

fn missing_range(missing: &[&str]) -> ValidationError {
    ValidationError::MissingParameter(format!(
        "supply either {}, or {}, {} and one of {} or {}; missing: {}",
        ETS,
        START_ETS,
        STOP_ETS,
        NUM_RECORDS,
        EXPOSURE_DURATION,
        missing.join(", ")
    ))
}

fn check_lengths(starts: &[f64], stops: &[f64], durations: &[f64]) -> Result<()> {
    if starts.len() == stops.len() && stops.len() == durations.len() {
        return Ok(());
    }
    Err(ValidationError::LengthMismatch(format!(
        "{}, {} and {} must have the same length, got {}, {} and {}",
        START_ETS,
        STOP_ETS,
        EXPOSURE_DURATION,
        starts.len(),
        stops.len(),
        durations.len()
    )))
}

/// Expands a [`TimeSpec`] into its ordered time points.
///
/// Never returns an empty sequence; an empty result is an
/// [`ValidationError::InvalidValue`].
pub fn expand_time_spec(spec: &TimeSpec, config: &NormalizeConfig) -> Result<Vec<f64>> {
    let times = match spec {
        TimeSpec::ExplicitTimes { values } => {
            if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(ValidationError::InvalidValue(format!(
                    "{} must contain only finite times, got: {}",
                    ETS, bad
                )));
            }
            check_capacity(values.len(), config)?;
            let mut values = values.clone();
            if config.sort_explicit_times {
                values.sort_by(f64::total_cmp);
            }
            if config.dedup_explicit_times {
                values.dedup();
            }
            values
        }
        TimeSpec::RangeByCount { start, stop, count } => {
            by_count(*start, *stop, *count, config)?
        }
        TimeSpec::RangeByDuration {
            start,
            stop,
            duration,
        } => half_open(*start, *stop, *duration, config)?,
        TimeSpec::SegmentedRangeByDuration {
            starts,
            stops,
            durations,
        } => {
            check_lengths(starts, stops, durations)?;
            let mut times = Vec::new();
            for (idx, ((start, stop), duration)) in
                starts.iter().zip(stops).zip(durations).enumerate()
            {
                let segment = half_open(*start, *stop, *duration, config).map_err(|e| match e {
                    ValidationError::InvalidValue(msg) => {
                        ValidationError::InvalidValue(format!("segment {}: {}", idx, msg))
                    }
                    other => other,
                })?;
                times.extend(segment);
                check_capacity(times.len(), config)?;
            }
            times
        }
    };

    if times.is_empty() {
        return Err(ValidationError::InvalidValue(match spec {
            TimeSpec::ExplicitTimes { .. } => format!("{} must contain at least one time", ETS),
            _ => format!(
                "time range yields no times; {} must be below {}",
                START_ETS, STOP_ETS
            ),
        }));
    }

    log::debug!("expanded {} into {} times", spec_kind(spec), times.len());
    Ok(times)
}

/// Resolves and expands raw time parameters in one step.
///
/// # Examples
///
/// ```
/// use ephemq::compute::times::{TimeInputs, derive_times};
/// use ephemq::config::NormalizeConfig;
/// use ephemq_types::raw::RawValue;
///
/// let (start, stop, duration) = (RawValue::from(0.0), RawValue::from(10.0), RawValue::from(3.0));
/// let inputs = TimeInputs {
///     start: Some(&start),
///     stop: Some(&stop),
///     duration: Some(&duration),
///     ..Default::default()
/// };
/// let times = derive_times(inputs, &NormalizeConfig::default()).unwrap();
/// assert_eq!(times, vec![0.0, 3.0, 6.0, 9.0]);
/// ```
pub fn derive_times(inputs: TimeInputs<'_>, config: &NormalizeConfig) -> Result<Vec<f64>> {
    let spec = resolve_time_spec(inputs)?;
    expand_time_spec(&spec, config)
}

fn spec_kind(spec: &TimeSpec) -> &'static str {
    match spec {
        TimeSpec::ExplicitTimes { .. } => "explicit times",
        TimeSpec::RangeByCount { .. } => "count range",
        TimeSpec::RangeByDuration { .. } => "duration range",
        TimeSpec::SegmentedRangeByDuration { .. } => "segmented duration range",
    }
}

fn check_bounds(start: f64, stop: f64) -> Result<()> {
    if !start.is_finite() || !stop.is_finite() {
        return Err(ValidationError::InvalidValue(format!(
            "{} and {} must be finite, got {} and {}",
            START_ETS, STOP_ETS, start, stop
        )));
    }
    if !(stop - start).is_finite() {
        return Err(ValidationError::InvalidValue(format!(
            "span from {} to {} is too large to represent",
            start, stop
        )));
    }
    Ok(())
}

fn check_capacity(len: usize, config: &NormalizeConfig) -> Result<()> {
    if len > config.max_time_points {
        return Err(ValidationError::InvalidValue(format!(
            "time range yields {} times, more than the limit of {}",
            len, config.max_time_points
        )));
    }
    Ok(())
}

fn by_count(start: f64, stop: f64, count: usize, config: &NormalizeConfig) -> Result<Vec<f64>> {
    check_bounds(start, stop)?;
    if count == 0 {
        return Err(ValidationError::InvalidValue(format!(
            "{} must be a positive integer, got: 0",
            NUM_RECORDS
        )));
    }
    check_capacity(count, config)?;

    if count == 1 {
        return Ok(vec![start]);
    }

    let step = (stop - start) / (count - 1) as f64;
    Ok((0..count)
        .map(|i| {
            if i == count - 1 {
                stop
            } else {
                start + i as f64 * step
            }
        })
        .collect())
}

fn half_open(start: f64, stop: f64, duration: f64, config: &NormalizeConfig) -> Result<Vec<f64>> {
    check_bounds(start, stop)?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(ValidationError::InvalidValue(format!(
            "{} must be a positive number, got: {}",
            EXPOSURE_DURATION, duration
        )));
    }
    if stop <= start {
        return Ok(Vec::new());
    }

    let steps = ((stop - start) / duration - config.step_tolerance).ceil();
    if !steps.is_finite() || steps > config.max_time_points as f64 {
        return Err(ValidationError::InvalidValue(format!(
            "time range yields more than the limit of {} times",
            config.max_time_points
        )));
    }

    // start itself is always emitted once it lies below stop
    let steps = steps.max(1.0) as usize;
    Ok((0..steps).map(|i| start + i as f64 * duration).collect())
}
