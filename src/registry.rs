use crate::builtin;
use crate::command::{Command, CommandInput, OutputBuffer};
use crate::env::Environment;
use crate::error::ShellError;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Prefix that selects the unsafe variant of a command, e.g. `_ls`.
pub const UNSAFE_PREFIX: char = '_';

/// Builds a fresh command instance.
pub type Constructor = fn() -> Rc<dyn Command>;

struct Entry {
    construct: Constructor,
    /// `Some` for shared entries: the instance is built on first use and reused.
    shared: Option<OnceCell<Rc<dyn Command>>>,
}

impl Entry {
    fn instance(&self) -> Rc<dyn Command> {
        match &self.shared {
            Some(cell) => Rc::clone(cell.get_or_init(self.construct)),
            None => (self.construct)(),
        }
    }
}

/// Maps command names to the built-ins that implement them.
///
/// [`CommandRegistry::with_builtins`] gives the registry with every built-in
/// of this crate; [`CommandRegistry::new`] starts empty.
#[derive(Default)]
pub struct CommandRegistry {
    entries: HashMap<String, Entry>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in; `pwd` is shared.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register a command constructed anew on every resolution.
    pub fn register(&mut self, name: impl Into<String>, construct: Constructor) {
        self.entries.insert(
            name.into(),
            Entry {
                construct,
                shared: None,
            },
        );
    }

    /// Register a command constructed once and reused for every resolution.
    pub fn register_shared(&mut self, name: impl Into<String>, construct: Constructor) {
        self.entries.insert(
            name.into(),
            Entry {
                construct,
                shared: Some(OnceCell::new()),
            },
        );
    }

    /// Resolve `name` to a command.
    ///
    /// A name starting with [`UNSAFE_PREFIX`] resolves to the command without
    /// the prefix, wrapped so that its recoverable failures are reported and
    /// swallowed instead of propagated.
    pub fn resolve(&self, name: &str) -> Result<Rc<dyn Command>, ShellError> {
        if let Some(inner) = name.strip_prefix(UNSAFE_PREFIX) {
            if let Some(entry) = self.entries.get(inner) {
                return Ok(Rc::new(UnsafeCommand {
                    name: inner.to_string(),
                    inner: entry.instance(),
                }));
            }
        }
        self.entries
            .get(name)
            .map(Entry::instance)
            .ok_or_else(|| ShellError::UnknownCommand(name.to_string()))
    }
}

/// Unsafe variant of a command: recoverable errors are printed to stderr and
/// execution continues as if the command had succeeded.
struct UnsafeCommand {
    name: String,
    inner: Rc<dyn Command>,
}

impl Command for UnsafeCommand {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputBuffer,
        input: &CommandInput<'_>,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        match self.inner.execute(args, out, input, env) {
            Err(e) if e.is_recoverable() => {
                log::warn!("suppressed failure of unsafe {}: {}", self.name, e);
                eprintln!("{}", e);
                Ok(())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static CONSTRUCTED: Cell<usize> = const { Cell::new(0) };
    }

    struct Counting;

    impl Command for Counting {
        fn execute(
            &self,
            args: &[String],
            out: &mut OutputBuffer,
            _input: &CommandInput<'_>,
            _env: &mut Environment,
        ) -> Result<(), ShellError> {
            out.push(args.join(","));
            Ok(())
        }
    }

    fn counting() -> Rc<dyn Command> {
        CONSTRUCTED.with(|c| c.set(c.get() + 1));
        Rc::new(Counting)
    }

    struct Failing;

    impl Command for Failing {
        fn execute(
            &self,
            _args: &[String],
            out: &mut OutputBuffer,
            _input: &CommandInput<'_>,
            _env: &mut Environment,
        ) -> Result<(), ShellError> {
            out.push("partial\n");
            Err(ShellError::NotFound("nothing here".to_string()))
        }
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let registry = CommandRegistry::new();
        assert!(matches!(
            registry.resolve("frobnicate"),
            Err(ShellError::UnknownCommand(name)) if name == "frobnicate"
        ));
        assert!(matches!(
            registry.resolve("_frobnicate"),
            Err(ShellError::UnknownCommand(name)) if name == "_frobnicate"
        ));
    }

    #[test]
    fn test_shared_entries_are_built_once() {
        CONSTRUCTED.with(|c| c.set(0));
        let mut registry = CommandRegistry::new();
        registry.register_shared("shared", counting);
        registry.register("fresh", counting);

        let a = registry.resolve("shared").unwrap();
        let b = registry.resolve("shared").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(CONSTRUCTED.with(Cell::get), 1);

        registry.resolve("fresh").unwrap();
        registry.resolve("fresh").unwrap();
        assert_eq!(CONSTRUCTED.with(Cell::get), 3);
    }

    #[test]
    fn test_unsafe_prefix_suppresses_recoverable_errors() {
        let mut registry = CommandRegistry::new();
        registry.register("fail", || -> Rc<dyn Command> { Rc::new(Failing) });
        let mut env = Environment::with_current_dir("/");
        let mut out = OutputBuffer::new();

        let safe = registry.resolve("fail").unwrap();
        assert!(safe
            .execute(&[], &mut out, &CommandInput::default(), &mut env)
            .is_err());

        let mut out = OutputBuffer::new();
        let unsafe_cmd = registry.resolve("_fail").unwrap();
        assert!(unsafe_cmd
            .execute(&[], &mut out, &CommandInput::default(), &mut env)
            .is_ok());
        assert_eq!(out.concat(), "partial\n");
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let mut registry = CommandRegistry::new();
        registry.register("cmd", || -> Rc<dyn Command> { Rc::new(Failing) });
        registry.register("cmd", counting);

        let mut env = Environment::with_current_dir("/");
        let mut out = OutputBuffer::new();
        let args = ["a".to_string(), "b".to_string()];
        registry
            .resolve("cmd")
            .unwrap()
            .execute(&args, &mut out, &CommandInput::default(), &mut env)
            .unwrap();
        assert_eq!(out.concat(), "a,b");
    }
}
