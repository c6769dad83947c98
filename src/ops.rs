//! Dice commands installed into a shell.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::cancel::CancelToken;
use crate::commands::from_fn;
use crate::dice::{DiceError, Die};
use crate::error::{HandlerError, Result};
use crate::shell::Shell;

/// Key of the command that ends a dice session.
pub const EXIT_COMMAND: &str = "stop";

/// The current die plus every roll made so far.
#[derive(Debug, Default)]
pub struct DiceTable {
    die: Die,
    history: Vec<u32>,
}

impl DiceTable {
    pub fn new(die: Die) -> Self {
        Self {
            die,
            history: Vec::new(),
        }
    }

    pub fn die(&self) -> &Die {
        &self.die
    }

    pub fn roll(&mut self) -> u32 {
        let value = self.die.roll();
        self.history.push(value);
        value
    }

    /// Replace the die. History is kept across dice.
    pub fn set_sides(&mut self, sides: i64) -> std::result::Result<(), DiceError> {
        let sides = u32::try_from(sides).map_err(|_| DiceError::UnsupportedSides(sides))?;
        self.die = Die::new(sides)?;
        Ok(())
    }

    pub fn seed(&mut self, seed: i64) {
        self.die.seed(seed);
    }

    pub fn unseed(&mut self) {
        self.die.unseed();
    }

    pub fn history(&self) -> &[u32] {
        &self.history
    }

    /// Mean of all rolls, `None` before the first roll.
    pub fn average(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let sum: f64 = self.history.iter().map(|&v| f64::from(v)).sum();
        Some(sum / self.history.len() as f64)
    }
}

/// Shared handle the command closures operate on.
pub type SharedTable = Arc<Mutex<DiceTable>>;

/// Register the dice commands plus `help`, and designate `stop` as exit.
pub fn install(shell: &mut Shell, table: SharedTable) -> Result<()> {
    shell.help_command("help")?;

    let t = Arc::clone(&table);
    shell.register(
        "roll",
        "Roll the die",
        from_fn(move |_, args| {
            no_args(args)?;
            let value = lock(&t)?.roll();
            println!("{value}");
            Ok(())
        }),
    )?;

    let t = Arc::clone(&table);
    shell.register(
        "sides",
        "Replace the die: sides <4|6|8|10|12|20>",
        from_fn(move |_, args| {
            let sides = one_integer(args)?;
            lock(&t)?.set_sides(sides)?;
            println!("new die with {sides} sides");
            Ok(())
        }),
    )?;

    let t = Arc::clone(&table);
    shell.register(
        "seed",
        "Seed the die for repeatable rolls: seed <integer>",
        from_fn(move |_, args| {
            let seed = one_integer(args)?;
            lock(&t)?.seed(seed);
            println!("die seeded with {seed}");
            Ok(())
        }),
    )?;

    let t = Arc::clone(&table);
    shell.register(
        "unseed",
        "Return to unpredictable rolls",
        from_fn(move |_, args| {
            no_args(args)?;
            lock(&t)?.unseed();
            println!("die no longer seeded");
            Ok(())
        }),
    )?;

    let t = Arc::clone(&table);
    shell.register(
        "history",
        "List previous rolls",
        from_fn(move |token: &CancelToken, args| {
            no_args(args)?;
            let table = lock(&t)?;
            for (i, value) in table.history().iter().enumerate() {
                if token.is_cancelled() {
                    break;
                }
                println!("{:>4}: {value}", i + 1);
            }
            Ok(())
        }),
    )?;

    let t = Arc::clone(&table);
    shell.register(
        EXIT_COMMAND,
        "Print the average roll and quit",
        from_fn(move |_, args| {
            no_args(args)?;
            println!("{}", format_average(lock(&t)?.average()));
            Ok(())
        }),
    )?;

    shell.set_exit(EXIT_COMMAND)
}

pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("average = {avg:.6}"),
        None => "average = n/a".to_string(),
    }
}

fn lock(table: &SharedTable) -> std::result::Result<MutexGuard<'_, DiceTable>, DiceError> {
    table.lock().map_err(|_| DiceError::Poisoned)
}

fn no_args(args: &[String]) -> std::result::Result<(), HandlerError> {
    if !args.is_empty() {
        return Err(DiceError::UnexpectedArgument.into());
    }
    Ok(())
}

fn one_integer(args: &[String]) -> std::result::Result<i64, DiceError> {
    let [arg] = args else {
        return Err(DiceError::ExpectedOneArgument);
    };
    arg.parse::<i64>()
        .map_err(|_| DiceError::NotAnInteger(arg.clone()))
}
