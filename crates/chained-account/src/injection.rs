//! Return-data injection.
//!
//! An [`Injection`] copies a byte range of an earlier call's result over a byte range of a later
//! call's input. Rules never resize the input, and a rule that does not fit is skipped without
//! failing the call.

use alloy_primitives::Bytes;
use tracing::trace;

use crate::Injection;

/// Why an injection rule was not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectionSkip {
    /// `sourceCallIndex` is past the end of the results.
    SourceOutOfRange,
    /// The referenced result is empty, either because the call returned nothing or because it
    /// has not run yet.
    SourceEmpty,
    /// The source range runs past the end of the referenced result.
    SourceRangeOutOfBounds,
    /// The target range runs past the end of the input.
    TargetRangeOutOfBounds,
}

/// Applies a single rule to `buffer` in place.
///
/// Returns the reason the rule was skipped, if it was.
pub fn apply_injection(
    buffer: &mut [u8],
    injection: &Injection,
    results: &[Bytes],
) -> Result<(), InjectionSkip> {
    let index = injection.sourceCallIndex as usize;
    let source_offset = injection.sourceReturnOffset as usize;
    let length = injection.sourceReturnLength as usize;
    let target_offset = injection.targetCalldataOffset as usize;

    let source = results.get(index).ok_or(InjectionSkip::SourceOutOfRange)?;
    if source.is_empty() {
        return Err(InjectionSkip::SourceEmpty);
    }
    if source_offset + length > source.len() {
        return Err(InjectionSkip::SourceRangeOutOfBounds);
    }
    if target_offset + length > buffer.len() {
        return Err(InjectionSkip::TargetRangeOutOfBounds);
    }

    buffer[target_offset..target_offset + length]
        .copy_from_slice(&source[source_offset..source_offset + length]);
    Ok(())
}

/// Produces the patched input of a call.
///
/// Rules are applied in order on a copy of `original`, so a later rule overwrites bytes written
/// by an earlier one when their target ranges overlap. `original` itself is never modified.
pub fn apply_injections(original: &[u8], injections: &[Injection], results: &[Bytes]) -> Bytes {
    apply_injections_with(original, injections, results, |_, _| {})
}

/// Like [`apply_injections`], but hands every skipped rule to `on_skip` together with its
/// position in `injections`.
pub fn apply_injections_with<F>(
    original: &[u8],
    injections: &[Injection],
    results: &[Bytes],
    mut on_skip: F,
) -> Bytes
where
    F: FnMut(usize, InjectionSkip),
{
    let mut patched = original.to_vec();
    for (position, injection) in injections.iter().enumerate() {
        match apply_injection(&mut patched, injection, results) {
            Ok(()) => trace!(
                target: "chained_account::injection",
                position,
                source = injection.sourceCallIndex,
                length = injection.sourceReturnLength,
                offset = injection.targetCalldataOffset,
                "Applied injection"
            ),
            Err(reason) => {
                trace!(
                    target: "chained_account::injection",
                    position,
                    ?reason,
                    "Skipped injection"
                );
                on_skip(position, reason);
            }
        }
    }
    patched.into()
}
