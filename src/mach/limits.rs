/// Capacity limits for a [`Runtime`](super::Runtime).
///
/// ```
/// use minic::mach::Limits;
/// let limits = Limits::new().stack(64).frames(8);
/// assert_eq!(limits.stack_len(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    stack: usize,
    frames: usize,
    program: usize,
    depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            stack: 256,
            frames: 100,
            program: 2000,
            depth: 200,
        }
    }
}

impl Limits {
    pub fn new() -> Limits {
        Limits::default()
    }

    /// Operand stack depth.
    pub fn stack(mut self, len: usize) -> Limits {
        self.stack = len;
        self
    }

    /// Call frame depth.
    pub fn frames(mut self, len: usize) -> Limits {
        self.frames = len;
        self
    }

    /// Instruction stream capacity in cells.
    pub fn program(mut self, len: usize) -> Limits {
        self.program = len;
        self
    }

    /// Nesting depth of the dispatch loop.
    pub fn depth(mut self, len: usize) -> Limits {
        self.depth = len;
        self
    }

    pub fn stack_len(&self) -> usize {
        self.stack
    }
    pub fn frames_len(&self) -> usize {
        self.frames
    }
    pub fn program_len(&self) -> usize {
        self.program
    }
    pub fn depth_len(&self) -> usize {
        self.depth
    }
}
