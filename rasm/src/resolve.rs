//! Pass 2: patches every unresolved reference with the final label
//! addresses, range-checking PC-relative offsets.

use rcpu::constants;

use crate::error::{AssemblyError, ErrorKind};
use crate::parser::{Context, ReferenceKind, UnresolvedReference};

fn undefined(reference: &UnresolvedReference) -> AssemblyError {
    AssemblyError::new(
        ErrorKind::UndefinedLabel,
        reference.line,
        format!("label `{}` is not defined", reference.label),
        &reference.source,
    )
}

fn checked_offset(
    reference: &UnresolvedReference,
    target: u16,
    base: i32,
) -> Result<i16, AssemblyError> {
    let offset = i32::from(target) - base;
    if (constants::RRI_IMMEDIATE_MIN..=constants::RRI_IMMEDIATE_MAX).contains(&offset) {
        Ok(offset as i16)
    } else {
        Err(AssemblyError::new(
            ErrorKind::OutOfRange,
            reference.line,
            format!(
                "`{}` is {} bytes away; the offset must lie in [-64, 63]",
                reference.label, offset
            ),
            &reference.source,
        ))
    }
}

/// Resolves and clears every reference collected in pass 1. All
/// non-immediate fields of the patched words are preserved.
pub(crate) fn resolve(context: &mut Context) -> Result<(), AssemblyError> {
    let references = std::mem::take(&mut context.references);

    for reference in &references {
        let target = context
            .symbols
            .address_of(&reference.label)
            .ok_or_else(|| undefined(reference))?;

        match reference.kind {
            ReferenceKind::Branch => {
                let immediate =
                    checked_offset(reference, target, i32::from(reference.pc) + 2)?;
                patch_instruction(context, reference, immediate);
            }
            ReferenceKind::LoadStore => {
                let immediate = checked_offset(reference, target, i32::from(reference.pc))?;
                patch_instruction(context, reference, immediate);
            }
            ReferenceKind::MoviUpper => {
                let upper = i32::from(target) >> constants::UPPER_SHIFT;
                if !(0..=constants::RI_IMMEDIATE_MAX).contains(&upper) {
                    return Err(AssemblyError::new(
                        ErrorKind::OutOfRange,
                        reference.line,
                        format!("upper bits of `{}` do not fit in 10 bits", reference.label),
                        &reference.source,
                    ));
                }
                patch_instruction(context, reference, upper as i16);
            }
            ReferenceKind::MoviLower => {
                let lower = i32::from(target) & constants::LOW_BITS_MASK;
                patch_instruction(context, reference, lower as i16);
            }
            ReferenceKind::Fill => {
                let index = reference.data_index.expect("fill references patch data");
                context.data[index].value = target;
            }
        }
    }

    Ok(())
}

fn patch_instruction(context: &mut Context, reference: &UnresolvedReference, immediate: i16) {
    let index = reference
        .instruction_index
        .expect("instruction references patch instructions");
    context.instructions[index].instruction.immediate = immediate;
}
