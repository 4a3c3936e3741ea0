pub mod registry;

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::error::ModuleFault;

pub use registry::{Instantiation, LoadFuture, ModuleRegistry, ModuleSource};

/// Named operations a game module may export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Start,
    Reset,
    SetInput,
    SetOption,
    Tick,
    Update,
    Width,
    Height,
    Cell,
    Score,
    GameOver,
    Stat,
}

impl Op {
    pub const ALL: [Op; 12] = [
        Op::Start,
        Op::Reset,
        Op::SetInput,
        Op::SetOption,
        Op::Tick,
        Op::Update,
        Op::Width,
        Op::Height,
        Op::Cell,
        Op::Score,
        Op::GameOver,
        Op::Stat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Op::Start => "start",
            Op::Reset => "reset",
            Op::SetInput => "set_input",
            Op::SetOption => "set_option",
            Op::Tick => "tick",
            Op::Update => "update",
            Op::Width => "get_width",
            Op::Height => "get_height",
            Op::Cell => "get_cell",
            Op::Score => "get_score",
            Op::GameOver => "is_game_over",
            Op::Stat => "get_stat",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of operations a module actually exports.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities(u16);

impl Capabilities {
    pub const fn none() -> Self {
        Capabilities(0)
    }

    pub fn of(ops: &[Op]) -> Self {
        ops.iter().fold(Self::none(), |caps, op| caps.with(*op))
    }

    pub fn with(self, op: Op) -> Self {
        Capabilities(self.0 | op.bit())
    }

    pub fn without(self, op: Op) -> Self {
        Capabilities(self.0 & !op.bit())
    }

    pub fn has(self, op: Op) -> bool {
        self.0 & op.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Op> {
        Op::ALL.into_iter().filter(move |op| self.has(*op))
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Op::name)).finish()
    }
}

/// A game's exported function table.
///
/// Every operation is optional. A module lists what it implements in
/// [`GameModule::capabilities`]; callers must test presence with
/// [`Capabilities::has`] before invoking anything. The default bodies only
/// exist so implementors can skip what they do not export.
///
/// Integer conventions: `tick`/`update` return 1 while alive and 0 once
/// stopped, `is_game_over` returns 0 or 1, `cell` returns a character code.
pub trait GameModule {
    fn capabilities(&self) -> Capabilities;

    fn start(&mut self) -> Result<(), ModuleFault> {
        Err(ModuleFault::Unsupported(Op::Start))
    }

    fn reset(&mut self) -> Result<(), ModuleFault> {
        Err(ModuleFault::Unsupported(Op::Reset))
    }

    fn set_input(&mut self, _code: i32) -> Result<(), ModuleFault> {
        Err(ModuleFault::Unsupported(Op::SetInput))
    }

    /// Game-specific option applied on the next `start`.
    fn set_option(&mut self, _value: i32) -> Result<(), ModuleFault> {
        Err(ModuleFault::Unsupported(Op::SetOption))
    }

    fn tick(&mut self) -> Result<i32, ModuleFault> {
        Err(ModuleFault::Unsupported(Op::Tick))
    }

    fn update(&mut self) -> Result<i32, ModuleFault> {
        Err(ModuleFault::Unsupported(Op::Update))
    }

    fn width(&mut self) -> Result<i32, ModuleFault> {
        Err(ModuleFault::Unsupported(Op::Width))
    }

    fn height(&mut self) -> Result<i32, ModuleFault> {
        Err(ModuleFault::Unsupported(Op::Height))
    }

    fn cell(&mut self, _index: i32) -> Result<i32, ModuleFault> {
        Err(ModuleFault::Unsupported(Op::Cell))
    }

    fn score(&mut self) -> Result<i32, ModuleFault> {
        Err(ModuleFault::Unsupported(Op::Score))
    }

    fn is_game_over(&mut self) -> Result<i32, ModuleFault> {
        Err(ModuleFault::Unsupported(Op::GameOver))
    }

    fn stat(&mut self, _slot: i32) -> Result<i32, ModuleFault> {
        Err(ModuleFault::Unsupported(Op::Stat))
    }
}

/// Shared reference to an instantiated module. Cloning shares the instance.
#[derive(Clone)]
pub struct ModuleHandle {
    name: Rc<str>,
    inner: Rc<RefCell<Box<dyn GameModule>>>,
}

impl ModuleHandle {
    pub fn new(name: &str, module: Box<dyn GameModule>) -> Self {
        Self {
            name: Rc::from(name),
            inner: Rc::new(RefCell::new(module)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> Capabilities {
        self.inner.borrow().capabilities()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Box<dyn GameModule>> {
        self.inner.borrow_mut()
    }

    pub fn same_instance(&self, other: &ModuleHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_track_membership() {
        let caps = Capabilities::of(&[Op::Start, Op::Cell]);
        assert!(caps.has(Op::Start));
        assert!(caps.has(Op::Cell));
        assert!(!caps.has(Op::Tick));
        assert!(!caps.without(Op::Cell).has(Op::Cell));
        assert_eq!(caps.iter().collect::<Vec<_>>(), vec![Op::Start, Op::Cell]);
    }

    #[test]
    fn unexported_ops_report_unsupported() {
        struct Bare;
        impl GameModule for Bare {
            fn capabilities(&self) -> Capabilities {
                Capabilities::none()
            }
        }
        let mut m = Bare;
        assert_eq!(m.tick(), Err(ModuleFault::Unsupported(Op::Tick)));
        assert_eq!(m.cell(0), Err(ModuleFault::Unsupported(Op::Cell)));
    }
}
