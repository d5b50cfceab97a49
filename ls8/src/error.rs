use thiserror::Error;

/// Faults that stop a running program. None of them are recoverable at the
/// instruction level; the machine stays in [`crate::State::Faulted`].
#[derive(Debug, Error)]
pub enum Fault {
    /// No handler is registered for the byte at `address`.
    #[error("unknown opcode {opcode:#010b} at {address:#04x}")]
    UnknownOpcode { opcode: u8, address: usize },
    /// An ALU-flagged byte that the ALU does not implement.
    #[error("unsupported ALU operation {0:#010b}")]
    UnsupportedOperation(u8),
    #[error("division by zero")]
    DivisionByZero,
    /// Memory access outside the address space.
    #[error("memory address {0:#x} out of bounds")]
    OutOfBounds(usize),
    /// Register access outside the register file.
    #[error("register index {0} out of bounds")]
    RegisterOutOfBounds(u8),
    /// A push would move the stack pointer into the loaded program image.
    #[error("stack overflow (sp {sp:#04x})")]
    StackOverflow { sp: u8 },
    /// A pop with nothing on the stack.
    #[error("stack underflow (sp {sp:#04x})")]
    StackUnderflow { sp: u8 },
    /// The host-imposed step limit ran out before the program halted.
    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(usize),
    #[error("output channel failed")]
    Output(#[from] std::io::Error),
}

/// Errors raised while turning a program image into memory contents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A non-comment token that is not a binary byte literal.
    #[error("line {line}: invalid byte literal '{text}'")]
    InvalidLiteral { line: usize, text: String },
    /// The image does not fit into memory.
    #[error("program of {len} bytes does not fit into {capacity} bytes of memory")]
    TooLarge { len: usize, capacity: usize },
}
