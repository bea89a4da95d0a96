use std::collections::{btree_map::Entry, BTreeMap};

use log::{debug, error};

pub type CommandResult = Result<(), String>;
pub type FnCommand<CONTEXT> = fn(&mut CONTEXT, &[&str]) -> CommandResult;

pub struct Command<CONTEXT> {
    pub name: &'static str,
    /// shown by `help`
    pub usage: &'static str,
    pub run: FnCommand<CONTEXT>,
}

impl<T> Command<T> {
    pub fn new(name: &'static str, usage: &'static str, run: FnCommand<T>) -> Self {
        Self { name, usage, run }
    }
}

pub struct CmdReactor<T> {
    commands: BTreeMap<&'static str, Command<T>>,
}

impl<T> CmdReactor<T> {
    pub fn new() -> Self {
        CmdReactor {
            commands: BTreeMap::new(),
        }
    }

    /// First registration of a name wins.
    pub fn add_commands<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Command<T>>,
    {
        for command in iter {
            match self.commands.entry(command.name) {
                Entry::Occupied(_) => error!("Already contains command: {}", command.name),
                Entry::Vacant(entry) => {
                    entry.insert(command);
                }
            }
        }
    }

    pub fn usage(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.values().map(|c| c.usage)
    }

    pub fn execute(&self, context: &mut T, command: &'_ str, args: Vec<String>) -> CommandResult {
        debug!("Executing: {} with args {:?}", command, args);

        let cmd = self
            .commands
            .get(command)
            .ok_or(format!("Command not found: {command}"))?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        (cmd.run)(context, &args)
    }
}
