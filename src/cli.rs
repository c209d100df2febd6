//! Decisions the `grid-runner` binary makes between parsing arguments and
//! printing a trace: log filter, level lookup, program source and exit status.

use crate::catalog::LevelCatalog;
use crate::instruction::Program;
use crate::level::Level;
use crate::outcome::ExecutionResult;
use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset, empty or unparsable.
pub const DEFAULT_LOG_DIRECTIVE: &str = "grid_robot=info";

/// Exit status for a run that reached the goal.
pub const EXIT_SOLVED: u8 = 0;

/// Exit status for a run that stopped anywhere else.
pub const EXIT_UNSOLVED: u8 = 1;

/// Builds the subscriber filter from the value of `RUST_LOG`.
///
/// A non-empty `rust_log` replaces the default entirely, so
/// `RUST_LOG=grid_robot=debug` shows the interpreter's debug events.
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

/// Picks a level by 0-based index, or by name ignoring case.
pub fn select_level<'a>(catalog: &'a LevelCatalog, selector: &str) -> anyhow::Result<&'a Level> {
    if let Ok(index) = selector.parse::<usize>() {
        match catalog.get(index) {
            Some(level) => return Ok(level),
            None => bail!("level {index} does not exist ({} levels)", catalog.len()),
        }
    }
    catalog
        .find(selector)
        .map(|(_, level)| level)
        .with_context(|| format!("no level named {selector:?}"))
}

/// Where the program to run comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramSource<'a> {
    /// The level's bundled reference solution.
    Solution,
    /// Text tokens from the command line.
    Tokens(&'a [String]),
}

/// Resolves the program to run and, when `check` is set, applies the level's
/// palette and length cap to it.
pub fn prepare_program(
    level: &Level,
    source: ProgramSource<'_>,
    check: bool,
) -> anyhow::Result<Program> {
    let program = match source {
        ProgramSource::Solution => level
            .solution()
            .cloned()
            .with_context(|| format!("level {:?} has no reference solution", level.name()))?,
        ProgramSource::Tokens(tokens) => tokens.join(" ").parse::<Program>()?,
    };

    if check {
        level
            .check_program(&program)
            .with_context(|| format!("program rejected by level {:?}", level.name()))?;
    }
    Ok(program)
}

pub fn exit_status(result: &ExecutionResult) -> u8 {
    if result.success { EXIT_SOLVED } else { EXIT_UNSOLVED }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProgramError;
    use crate::interpreter::run;
    use tracing::Level as LogLevel;
    use tracing_subscriber::layer::SubscriberExt;

    fn debug_enabled(filter: EnvFilter) -> bool {
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            tracing::enabled!(target: "grid_robot::interpreter", LogLevel::DEBUG)
        })
    }

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn rust_log_overrides_the_default_filter() {
        assert!(debug_enabled(log_filter(Some("grid_robot=debug"))));
        assert!(debug_enabled(log_filter(Some("debug"))));
    }

    #[test]
    fn default_filter_applies_only_without_rust_log() {
        assert!(!debug_enabled(log_filter(None)));
        assert!(!debug_enabled(log_filter(Some("  "))));
    }

    #[test]
    fn selects_by_index_or_name() {
        let catalog = LevelCatalog::builtin();
        assert_eq!(select_level(catalog, "0").unwrap().name(), "First steps");
        assert_eq!(select_level(catalog, "3").unwrap().name(), "Feel the wall");
        assert_eq!(select_level(catalog, "feel THE wall").unwrap().name(), "Feel the wall");
    }

    #[test]
    fn rejects_unknown_levels() {
        let catalog = LevelCatalog::builtin();
        let err = select_level(catalog, "99").unwrap_err();
        assert!(err.to_string().contains("level 99 does not exist"));
        let err = select_level(catalog, "No such level").unwrap_err();
        assert!(err.to_string().contains("no level named"));
    }

    #[test]
    fn check_can_be_skipped() {
        let level = select_level(LevelCatalog::builtin(), "0").unwrap();
        let long = tokens(&"f ".repeat(level.max_instructions() + 1));

        let err = prepare_program(level, ProgramSource::Tokens(&long), true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProgramError>(),
            Some(ProgramError::TooLong { .. })
        ));

        let program = prepare_program(level, ProgramSource::Tokens(&long), false).unwrap();
        assert_eq!(program.len(), level.max_instructions() + 1);

        // "First steps" only offers moving forward.
        let turn = tokens("r f");
        let err = prepare_program(level, ProgramSource::Tokens(&turn), true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProgramError>(),
            Some(ProgramError::Unsupported { index: 0, .. })
        ));
        assert!(prepare_program(level, ProgramSource::Tokens(&turn), false).is_ok());
    }

    #[test]
    fn unparsable_tokens_are_reported() {
        let level = select_level(LevelCatalog::builtin(), "0").unwrap();
        let bad = tokens("forward jump");
        let err = prepare_program(level, ProgramSource::Tokens(&bad), false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProgramError>(),
            Some(ProgramError::UnknownInstruction(_))
        ));
    }

    #[test]
    fn exit_status_follows_success() {
        let level = select_level(LevelCatalog::builtin(), "0").unwrap();
        let solution = prepare_program(level, ProgramSource::Solution, true).unwrap();
        assert_eq!(exit_status(&run(level, &solution)), EXIT_SOLVED);
        assert_eq!(exit_status(&run(level, &[])), EXIT_UNSOLVED);
    }
}
