use crate::exec::{execute, Effect, Fault};
use crate::{constants, Instruction, Memory, ProcessorState};

/// Outcome of a [`Engine::run`] call: the furthest state reached and
/// the fault that stopped the run, if one did. `fault` is `None`
/// exactly when the program halted on its own.
#[derive(Debug)]
pub struct RunResult {
    pub state: ProcessorState,
    pub fault: Option<Fault>,
}

impl RunResult {
    pub fn halted(&self) -> bool {
        self.fault.is_none()
    }
}

/// Fetch/decode/dispatch loop. The engine owns its memory and is
/// otherwise stateless between steps; callers thread the
/// [`ProcessorState`] through successive calls, which keeps rewind
/// and snapshot features for outside tooling trivial.
pub struct Engine {
    memory: Memory,
}

impl Engine {
    pub fn new(memory: Memory) -> Engine {
        Engine { memory }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Executes the instruction at `state.pc()`.
    ///
    /// Fails without touching anything when the processor is halted,
    /// the PC is odd or outside memory, or the fetched word does not
    /// decode.
    pub fn step(&mut self, state: ProcessorState) -> Result<(ProcessorState, Effect), Fault> {
        if state.halted() {
            return Err(Fault::Halted);
        }

        let pc = state.pc();
        if !self
            .memory
            .check_range(u32::from(pc), u32::from(constants::WORD_BYTES))
        {
            return Err(Fault::PcOutOfRange {
                pc,
                size: self.memory.size(),
            });
        }
        if pc % constants::WORD_BYTES != 0 {
            return Err(Fault::PcMisaligned { pc });
        }

        let word = self
            .memory
            .read_word(u32::from(pc))
            .expect("validated PC read cannot fail");
        let instruction =
            Instruction::decode(word).ok_or(Fault::InvalidInstruction { word, pc })?;

        execute(&instruction, state, &mut self.memory)
    }

    /// Steps until the program halts or `limit` steps have run.
    ///
    /// Hitting the limit is reported as [`Fault::LimitReached`]; the
    /// last successful state is returned either way, so the caller
    /// may continue from it or discard it.
    pub fn run(&mut self, state: ProcessorState, limit: u64) -> RunResult {
        let mut state = state;
        let mut steps = 0u64;

        while !state.halted() {
            if steps == limit {
                return RunResult {
                    state,
                    fault: Some(Fault::LimitReached { limit }),
                };
            }
            match self.step(state) {
                Ok((next, _)) => state = next,
                Err(fault) => {
                    return RunResult {
                        state,
                        fault: Some(fault),
                    }
                }
            }
            steps += 1;
        }

        RunResult { state, fault: None }
    }

    /// [`run`](Engine::run) with the default limit of 65535 steps.
    pub fn run_to_halt(&mut self, state: ProcessorState) -> RunResult {
        self.run(state, constants::DEFAULT_STEP_LIMIT)
    }
}
