/*!
 * Timing transformations over cue sequences.
 *
 * All operations mutate `begin`/`end` in place. There is no undo: applying the
 * inverse parameters is the only way back.
 */

use chrono::TimeDelta;
use log::debug;

use crate::cue::Cue;
use crate::errors::TimingError;
use crate::timestamp::{from_millis_f64, to_millis_f64};

/// Move every cue by `delta`
pub fn shift(cues: &mut [Cue], delta: TimeDelta) {
    for cue in cues.iter_mut() {
        cue.begin += delta;
        cue.end += delta;
    }
    debug!("Shifted {} cues by {}ms", cues.len(), delta.num_milliseconds());
}

/// Linearly remap the cues `first..=last` so that cue `first` begins at `new_start`
/// and cue `last` begins at `new_end`.
///
/// Both bounds of every cue in the range are mapped with the same ratio, anchored
/// on the begin time of cue `first`. Cues outside the range are left alone.
pub fn rescale_range(
    cues: &mut [Cue],
    first: usize,
    last: usize,
    new_start: TimeDelta,
    new_end: TimeDelta,
) -> Result<(), TimingError> {
    if first > last || last >= cues.len() {
        return Err(TimingError::InvalidRange {
            first,
            last,
            len: cues.len(),
        });
    }

    let anchor = cues[first].begin;
    let span = to_millis_f64(cues[last].begin - anchor);
    if span == 0.0 {
        return Err(TimingError::DegenerateRange { first, last });
    }

    let ratio = to_millis_f64(new_end - new_start) / span;
    let remap = |time: TimeDelta| new_start + from_millis_f64(ratio * to_millis_f64(time - anchor));

    for cue in &mut cues[first..=last] {
        cue.begin = remap(cue.begin);
        cue.end = remap(cue.end);
    }

    debug!("Rescaled cues {}..={} with ratio {:.6}", first, last, ratio);
    Ok(())
}

/// Rescale the whole sequence
pub fn rescale(cues: &mut [Cue], new_start: TimeDelta, new_end: TimeDelta) -> Result<(), TimingError> {
    let last = cues.len().checked_sub(1).ok_or(TimingError::InvalidRange {
        first: 0,
        last: 0,
        len: 0,
    })?;
    rescale_range(cues, 0, last, new_start, new_end)
}

/// Take timings from a reference sequence.
///
/// With equal lengths timings are copied pairwise. Otherwise the target is rescaled
/// between the reference's first and last *begin* times.
pub fn resync(cues: &mut [Cue], reference: &[Cue]) -> Result<(), TimingError> {
    if cues.len() == reference.len() {
        for (cue, source) in cues.iter_mut().zip(reference) {
            cue.begin = source.begin;
            cue.end = source.end;
        }
        debug!("Copied timings of {} cues from reference", cues.len());
        return Ok(());
    }

    let (first, last) = match (reference.first(), reference.last()) {
        (Some(first), Some(last)) => (first.begin, last.begin),
        _ => return Err(TimingError::EmptyReference),
    };

    debug!(
        "Cue counts differ ({} vs {}), rescaling to reference bounds",
        cues.len(),
        reference.len()
    );
    rescale(cues, first, last)
}
