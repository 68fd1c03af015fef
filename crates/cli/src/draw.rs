//! `santa draw` / `rematch` / `verify` / `validate` / `seed`.

use std::path::{Path, PathBuf};

use secretsanta_matching::audit::{parse_matching_json, verify_matching};
use secretsanta_matching::{
    generate_matching_with, new_seed, partial_rematch_with, DrawRecord, GroupConfig, Matching,
};

use tracing::debug;

use crate::exit_codes::{EXIT_INVALID_INPUT, EXIT_VERIFY_VIOLATIONS};
use crate::CliError;

pub fn cmd_draw(
    group_path: PathBuf,
    seed: Option<String>,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let group = load_group(&group_path)?;
    let seed = seed.unwrap_or_else(new_seed);

    let people = group.participants();
    let matching = generate_matching_with(
        &group.matching,
        &people,
        &people,
        &group.forbidden_edges(),
        &seed,
    )
    .ok_or_else(|| {
        CliError::infeasible(format!("no valid draw for '{}' (seed {seed})", group.name))
    })?;

    let record = DrawRecord::new(&group.name, &seed, &matching);
    emit_record(&record, json_output, output_file.as_deref())?;

    eprintln!(
        "draw '{}': {} assignments, {} reciprocal givers (seed {})",
        group.name, record.assignments_count, record.reciprocal_givers, record.seed,
    );
    Ok(())
}

pub fn cmd_rematch(
    group_path: PathBuf,
    assignments_path: PathBuf,
    givers: Vec<String>,
    seed: Option<String>,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let group = load_group(&group_path)?;
    group.validate_rematch(&givers)?;

    let existing = load_matching(&assignments_path)?;
    let people = group.participants();
    let forbidden = group.forbidden_edges();

    let violations = verify_matching(&existing, &people, &people, &forbidden);
    if let Some(first) = violations.first() {
        return Err(CliError {
            code: EXIT_INVALID_INPUT,
            message: format!(
                "{} is not a valid draw for this group: {first}",
                assignments_path.display()
            ),
            hint: None,
        }
        .with_hint("run `santa verify` for the full list"));
    }

    let seed = seed.unwrap_or_else(new_seed);
    let matching = partial_rematch_with(
        &group.matching,
        &existing,
        &givers,
        &people,
        &people,
        &forbidden,
        &seed,
    )
    .ok_or_else(|| {
        CliError::infeasible(format!(
            "no valid rematch for {} under the current constraints (seed {seed})",
            givers.join(", ")
        ))
    })?;

    let record = DrawRecord::new(&group.name, &seed, &matching).with_rematched(&givers);
    emit_record(&record, json_output, output_file.as_deref())?;

    eprintln!(
        "rematch '{}': {} giver(s) redrawn, {} reciprocal givers (seed {})",
        group.name,
        givers.len(),
        record.reciprocal_givers,
        record.seed,
    );
    Ok(())
}

pub fn cmd_verify(
    group_path: PathBuf,
    assignments_path: PathBuf,
    json_output: bool,
) -> Result<(), CliError> {
    let group = load_group(&group_path)?;
    let matching = load_matching(&assignments_path)?;
    let people = group.participants();

    let violations = verify_matching(&matching, &people, &people, &group.forbidden_edges());

    if json_output {
        let report = serde_json::json!({
            "valid": violations.is_empty(),
            "assignments": matching.len(),
            "violations": violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    for violation in &violations {
        eprintln!("  {violation}");
    }

    if violations.is_empty() {
        eprintln!("valid: {} assignments for '{}'", matching.len(), group.name);
        Ok(())
    } else {
        Err(CliError {
            code: EXIT_VERIFY_VIOLATIONS,
            message: format!("{} rule violation(s)", violations.len()),
            hint: None,
        })
    }
}

pub fn cmd_validate(group_path: PathBuf) -> Result<(), CliError> {
    let group = load_group(&group_path)?;
    let couples = group
        .members
        .iter()
        .filter_map(|m| m.couple_key())
        .collect::<std::collections::HashSet<_>>()
        .len();
    eprintln!(
        "valid: group '{}' with {} member(s), {} couple(s), {} forbidden pair(s)",
        group.name,
        group.members.len(),
        couples,
        group.forbidden.len(),
    );
    Ok(())
}

pub fn cmd_seed() -> Result<(), CliError> {
    println!("{}", new_seed());
    Ok(())
}

fn load_group(path: &Path) -> Result<GroupConfig, CliError> {
    let group = GroupConfig::from_path(path)?;
    debug!(
        path = %path.display(),
        group = %group.name,
        members = group.members.len(),
        forbidden = group.forbidden.len(),
        "group loaded"
    );
    Ok(group)
}

fn load_matching(path: &Path) -> Result<Matching, CliError> {
    let input = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    let matching = parse_matching_json(&input)?;
    debug!(path = %path.display(), assignments = matching.len(), "assignments loaded");
    Ok(matching)
}

/// JSON to file and/or stdout; plain `giver -> receiver` lines otherwise.
fn emit_record(
    record: &DrawRecord,
    json_output: bool,
    output_file: Option<&Path>,
) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(record)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

    if let Some(path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    } else if output_file.is_none() {
        for a in &record.assignments {
            println!("{} -> {}", a.giver_id, a.receiver_id);
        }
    }
    Ok(())
}
