//! Per-opcode execution. Each executor is a pure transition from a
//! processor state (plus memory for `lw`/`sw`) to a successor state
//! and an [`Effect`] describing what the step touched.

use thiserror::Error;

use crate::memory::MemoryError;
use crate::{constants, Instruction, Memory, Opcode, ProcessorState, RegisterId};

/// Observation record of a single executed instruction.
///
/// The debugger and viewer collaborators consume these; the engine
/// itself never inspects them.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Effect {
    /// Register written by the step, if any.
    pub destination: Option<RegisterId>,
    /// Data address read or written by `lw`/`sw`.
    pub memory_address: Option<u16>,
    /// Where control went (or would have gone) for `beq`/`jalr`.
    pub branch_target: Option<u16>,
    /// True when a `beq` actually redirected control.
    pub branch_taken: bool,
}

/// A failed execution step. Faults carry the PC of the faulting step
/// and, where one was decoded, the rendered instruction text.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum Fault {
    #[error("step requested on a halted processor")]
    Halted,
    #[error("program counter {pc:#06x} outside memory of {size} bytes")]
    PcOutOfRange { pc: u16, size: usize },
    #[error("program counter {pc:#06x} is not word-aligned")]
    PcMisaligned { pc: u16 },
    #[error("invalid instruction word {word:#06x} at {pc:#06x}")]
    InvalidInstruction { word: u16, pc: u16 },
    #[error("`{instruction}` at {pc:#06x}: {source}")]
    DataAccess {
        pc: u16,
        instruction: String,
        source: MemoryError,
    },
    #[error("step limit of {limit} instructions reached")]
    LimitReached { limit: u64 },
}

/// Executes one decoded instruction against `state` and `memory`.
///
/// On success the returned state has its instruction count advanced
/// by one. The caller (normally [`Engine::step`](crate::Engine::step))
/// is responsible for fetch, decode and PC validation.
pub fn execute(
    instruction: &Instruction,
    state: ProcessorState,
    memory: &mut Memory,
) -> Result<(ProcessorState, Effect), Fault> {
    let result = match instruction.opcode {
        Opcode::ADD => Ok(add(instruction, state)),
        Opcode::ADDI => Ok(addi(instruction, state)),
        Opcode::NAND => Ok(nand(instruction, state)),
        Opcode::LUI => Ok(lui(instruction, state)),
        Opcode::SW => sw(instruction, state, memory),
        Opcode::LW => lw(instruction, state, memory),
        Opcode::BEQ => Ok(beq(instruction, state)),
        Opcode::JALR => Ok(jalr(instruction, state)),
    };

    match result {
        Ok((next, effect)) => Ok((next.with_count_incremented(), effect)),
        Err(source) => Err(Fault::DataAccess {
            pc: state.pc(),
            instruction: instruction.to_string(),
            source,
        }),
    }
}

fn next_pc(state: ProcessorState) -> u16 {
    state.pc().wrapping_add(constants::WORD_BYTES)
}

/// `rB + imm` as an unsigned 16-bit data address.
fn effective_address(state: ProcessorState, instruction: &Instruction) -> u16 {
    (state.register(instruction.reg_b) as u16).wrapping_add(instruction.immediate as u16)
}

fn write_back(
    state: ProcessorState,
    destination: RegisterId,
    value: i16,
) -> (ProcessorState, Effect) {
    (
        state.with_register(destination, value).with_pc(next_pc(state)),
        Effect {
            destination: Some(destination),
            ..Effect::default()
        },
    )
}

fn add(instruction: &Instruction, state: ProcessorState) -> (ProcessorState, Effect) {
    let value =
        state.register(instruction.reg_b).wrapping_add(state.register(instruction.reg_c));
    write_back(state, instruction.reg_a, value)
}

fn addi(instruction: &Instruction, state: ProcessorState) -> (ProcessorState, Effect) {
    let value = state.register(instruction.reg_b).wrapping_add(instruction.immediate);
    write_back(state, instruction.reg_a, value)
}

fn nand(instruction: &Instruction, state: ProcessorState) -> (ProcessorState, Effect) {
    let value = !(state.register(instruction.reg_b) & state.register(instruction.reg_c));
    write_back(state, instruction.reg_a, value)
}

fn lui(instruction: &Instruction, state: ProcessorState) -> (ProcessorState, Effect) {
    let value = ((instruction.immediate as u16) << constants::UPPER_SHIFT) as i16;
    write_back(state, instruction.reg_a, value)
}

fn sw(
    instruction: &Instruction,
    state: ProcessorState,
    memory: &mut Memory,
) -> Result<(ProcessorState, Effect), MemoryError> {
    let address = effective_address(state, instruction);
    memory.write_word(u32::from(address), state.register(instruction.reg_a) as u16)?;
    Ok((
        state.with_pc(next_pc(state)),
        Effect {
            memory_address: Some(address),
            ..Effect::default()
        },
    ))
}

fn lw(
    instruction: &Instruction,
    state: ProcessorState,
    memory: &Memory,
) -> Result<(ProcessorState, Effect), MemoryError> {
    let address = effective_address(state, instruction);
    let value = memory.read_word(u32::from(address))? as i16;
    Ok((
        state
            .with_register(instruction.reg_a, value)
            .with_pc(next_pc(state)),
        Effect {
            destination: Some(instruction.reg_a),
            memory_address: Some(address),
            ..Effect::default()
        },
    ))
}

fn beq(instruction: &Instruction, state: ProcessorState) -> (ProcessorState, Effect) {
    let target = next_pc(state).wrapping_add(instruction.immediate as u16);
    let taken = state.register(instruction.reg_a) == state.register(instruction.reg_b);
    let pc = if taken { target } else { next_pc(state) };
    (
        state.with_pc(pc),
        Effect {
            branch_target: Some(target),
            branch_taken: taken,
            ..Effect::default()
        },
    )
}

fn jalr(instruction: &Instruction, state: ProcessorState) -> (ProcessorState, Effect) {
    // Halt detection is on the ENCODED operands: `jalr r0, r0` halts
    // even though both the link write and the jump degenerate.
    let halts = instruction.reg_a == RegisterId::R0 && instruction.reg_b == RegisterId::R0;

    let link = next_pc(state) as i16;
    let target = state.register(instruction.reg_b) as u16;
    let mut next = state
        .with_register(instruction.reg_a, link)
        .with_pc(target);
    if halts {
        next = next.with_halted();
    }
    (
        next,
        Effect {
            destination: Some(instruction.reg_a),
            branch_target: Some(target),
            ..Effect::default()
        },
    )
}
