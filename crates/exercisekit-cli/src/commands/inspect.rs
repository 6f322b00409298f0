//! The `exercisekit inspect` command.

use std::path::PathBuf;

use anyhow::Result;

use exercisekit_core::config::load_config_from;
use exercisekit_core::debug::DebugOverlay;
use exercisekit_core::loader::load_question_set;
use exercisekit_core::normalize::prepare_question;

pub fn execute(
    questions_path: PathBuf,
    id: Option<String>,
    force_debug: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let set = load_question_set(&questions_path)?;

    let selected: Vec<_> = set
        .questions
        .iter()
        .map(|raw| (raw, prepare_question(raw)))
        .filter(|(_, prepared)| id.as_deref().map_or(true, |id| prepared.question.id == id))
        .collect();

    if selected.is_empty() {
        match id {
            Some(id) => anyhow::bail!("no question with ID {id} in {}", questions_path.display()),
            None => {
                println!("No questions in {}", questions_path.display());
                return Ok(());
            }
        }
    }

    for (raw, prepared) in selected {
        let overlay = if force_debug {
            Some(DebugOverlay::build(raw))
        } else {
            DebugOverlay::for_environment(config.environment, raw)
        };

        match overlay {
            Some(overlay) => println!("{overlay}"),
            None => println!(
                "{}: debug overlay hidden in {} (use --debug)",
                prepared.question.id, config.environment
            ),
        }

        let kind = prepared
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "unsupported".to_string());
        println!("Widget: {kind}");
        for warning in &prepared.warnings {
            println!("  WARNING: {warning}");
        }
        println!();
    }

    Ok(())
}
