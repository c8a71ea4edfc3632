use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use teachstack_core::command::Outcome;
use teachstack_core::parser::parse_command;
use teachstack_core::roster::Roster;
use teachstack_core::storage;

/// Run a single command line against the persisted roster. Errors propagate
/// so the process exits nonzero, which is what scripts expect.
pub fn exec_line(data: &Path, line: &str, json: bool) -> Result<()> {
    let mut roster = load(data);
    let outcome = run_one(&mut roster, data, line)?;
    if json {
        let body = serde_json::json!({
            "message": outcome.message,
            "roster": storage::StoredRoster::from_roster(&roster),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", outcome.message);
    }
    Ok(())
}

/// Interactive loop: prompt, read, parse, execute, persist when mutated.
/// Command failures are reported and the loop continues; only IO failures on
/// the terminal itself end the session early.
pub fn run_shell(data: &Path) -> Result<()> {
    let mut roster = load(data);
    println!("TeachStack shell — type 'help' for commands, 'exit' to leave");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        write!(stdout, "> ").context("failed to write prompt")?;
        stdout.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            // EOF behaves like `exit`
            break;
        }

        match run_one(&mut roster, data, &line) {
            Ok(outcome) => {
                println!("{}", outcome.message);
                if outcome.exit {
                    break;
                }
            }
            Err(e) => eprintln!("error: {e:#}"),
        }
    }
    Ok(())
}

/// One tokenize → parse → execute → persist step.
fn run_one(roster: &mut Roster, data: &Path, line: &str) -> Result<Outcome> {
    let command = parse_command(line)?;
    let outcome = command.execute(roster)?;
    if outcome.mutated {
        storage::save(data, roster)
            .with_context(|| format!("failed to save roster to {}", data.display()))?;
        tracing::debug!(path = %data.display(), "roster saved");
    }
    Ok(outcome)
}

fn load(data: &Path) -> Roster {
    let report = storage::load(data);
    if let Some(warning) = report.warning {
        tracing::warn!("{warning}");
        eprintln!("warning: {warning}");
    }
    report.roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn run_one_persists_mutations() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("roster.json");
        let mut roster = Roster::default();

        run_one(
            &mut roster,
            &data,
            "add n/Alice id/A0123456A e/alice@example.com gr/A",
        )
        .unwrap();
        assert!(data.exists());

        let report = storage::load(&data);
        assert_eq!(report.roster.active().len(), 1);
    }

    #[test]
    fn run_one_does_not_persist_queries() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("roster.json");
        let mut roster = Roster::default();

        let outcome = run_one(&mut roster, &data, "list").unwrap();
        assert!(!outcome.mutated);
        assert!(!data.exists());
    }

    #[test]
    fn failed_command_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("roster.json");
        let mut roster = Roster::default();

        run_one(
            &mut roster,
            &data,
            "add n/Alice id/A0123456A e/alice@example.com gr/A",
        )
        .unwrap();
        let before = std::fs::read_to_string(&data).unwrap();

        // duplicate id fails at execute
        assert!(run_one(
            &mut roster,
            &data,
            "add n/Bob id/A0123456A e/bob@example.com gr/B",
        )
        .is_err());
        assert_eq!(std::fs::read_to_string(&data).unwrap(), before);
    }
}
