//! Command handlers: one session per invocation

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::application::render::{plan_tree, render_document, EMPTY_SUMMARY};
use crate::application::services::PrintTarget;
use crate::cli::args::{Cli, Commands, ConfigCommands, MedsCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{CatalogSource, DomainError, EntryForm, EntryId};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::SelectionItem;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    // Commands that need no session
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => return _config(command, cli.project_dir.as_deref()),
        _ => {}
    }

    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings, &project_dir);

    match command {
        Commands::Meds { command } => match command {
            MedsCommands::List => _meds_list(&container),
            MedsCommands::Find { text } => _meds_find(&container, text),
        },
        Commands::Add {
            med,
            directions,
            instructions,
            notes,
        } => _add(
            &container,
            med.as_deref(),
            EntryForm::new(directions.as_str(), instructions.as_str(), notes.as_str()),
        ),
        Commands::Remove { id } => _remove(&container, *id),
        Commands::Clear => _clear(&container),
        Commands::List => _list(&container),
        Commands::Show { summary } => _show(&container, *summary),
        Commands::Print { output, yes } => _print(&container, output.as_deref(), *yes),
        Commands::Info => _info(&container),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn resolve_project_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(d) if d.is_dir() => Ok(d.to_path_buf()),
        Some(d) => Err(CliError::InvalidArgs(format!(
            "project directory does not exist: {}",
            d.display()
        ))),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

#[instrument(skip(container))]
fn _meds_list(container: &ServiceContainer) -> CliResult<()> {
    let session = container.handout_session();
    let catalog = session.catalog();
    output::header(&format!(
        "Catalog: {} ({} medications)",
        catalog.source(),
        catalog.len()
    ));
    for med in catalog.medications() {
        output::info(&med.name);
        if !med.aliases.is_empty() {
            output::detail(&format!("aliases: {}", med.aliases.join(", ")));
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _meds_find(container: &ServiceContainer, text: &str) -> CliResult<()> {
    let mut session = container.handout_session();
    let Some(med) = session.select(text).cloned() else {
        return Err(ApplicationError::from(DomainError::MedicationNotFound(text.to_string())).into());
    };
    output::success(&med.name);
    if !med.image.is_empty() {
        output::detail(&format!("image: {}", med.image));
    }
    if !med.aliases.is_empty() {
        output::detail(&format!("aliases: {}", med.aliases.join(", ")));
    }
    debug!("selection view: {}", session.selection_view());
    Ok(())
}

#[instrument(skip(container))]
fn _add(container: &ServiceContainer, med: Option<&str>, form: EntryForm) -> CliResult<()> {
    let mut session = container.handout_session();

    match med {
        Some(text) => {
            if session.select(text).is_none() {
                output::warning(&format!("no medication matches '{}'", text));
            }
        }
        None => {
            let items: Vec<SelectionItem> = session
                .catalog()
                .names()
                .into_iter()
                .map(|name| SelectionItem {
                    display: name.to_string(),
                    value: name.to_string(),
                })
                .collect();
            let picked = container
                .selector
                .select_one(&items, "Medication> ")
                .map_err(|message| InfraError::Selector { message })?;
            if let Some(item) = picked {
                session.select(&item.value);
            }
        }
    }

    session.update_form(form);
    let entry = session.add_medication_to_plan()?;
    output::action("Added", &format!("{} [{}]", entry.name, entry.id));
    output::detail(&format!("{} in plan", session.plan().len()));
    Ok(())
}

#[instrument(skip(container))]
fn _remove(container: &ServiceContainer, id: EntryId) -> CliResult<()> {
    let mut session = container.handout_session();
    if session.remove_medication_from_plan(id) {
        output::action("Removed", &id);
    } else {
        output::warning(&format!("no entry with id {}", id));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _clear(container: &ServiceContainer) -> CliResult<()> {
    let mut session = container.handout_session();
    session.clear_all();
    output::success("Treatment plan cleared");
    Ok(())
}

#[instrument(skip(container))]
fn _list(container: &ServiceContainer) -> CliResult<()> {
    let session = container.handout_session();
    if session.plan().is_empty() {
        output::info(EMPTY_SUMMARY);
    } else {
        output::info(&plan_tree(session.plan()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer, summary: bool) -> CliResult<()> {
    let session = container.handout_session();
    let views = session.views();
    output::info(if summary {
        &views.summary
    } else {
        &views.handout
    });
    Ok(())
}

#[instrument(skip(container))]
fn _print(container: &ServiceContainer, out: Option<&Path>, yes: bool) -> CliResult<()> {
    let session = container.handout_session();

    if session.plan().is_empty()
        && !yes
        && !confirm("No medications in treatment plan. Print anyway?")?
    {
        output::info("Print cancelled");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    let document = render_document(session.plan(), &container.settings.title, today);

    let target = match (out, &container.settings.print_command) {
        (Some(path), _) => PrintTarget::File(path.to_path_buf()),
        (None, Some(command)) => PrintTarget::Command(command.clone()),
        (None, None) => PrintTarget::Stdout,
    };
    debug!("print: target={:?}", target);

    container.print_service().print(&document, &target)?;
    match &target {
        PrintTarget::File(path) => output::action("Written", &path.display()),
        PrintTarget::Command(command) => output::action("Sent", command),
        PrintTarget::Stdout => output::info(&document),
    }
    Ok(())
}

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
fn confirm(question: &str) -> CliResult<bool> {
    output::prompt(&format!("{question} [y/N]"));
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| InfraError::io("read confirmation", e))?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[instrument(skip(container))]
fn _info(container: &ServiceContainer) -> CliResult<()> {
    let session = container.handout_session();
    let settings = &container.settings;

    output::header("medhandout");
    output::info(&format!("Project:  {}", container.project_dir.display()));
    let source = match session.catalog().source() {
        CatalogSource::DataFile(path) => path.display().to_string(),
        CatalogSource::BuiltIn => format!(
            "built-in list ({} not loaded)",
            settings.data_file_in(&container.project_dir).display()
        ),
    };
    output::info(&format!(
        "Catalog:  {} ({} medications)",
        source,
        session.catalog().len()
    ));
    if settings.persist {
        output::info(&format!(
            "Draft:    {} [{}]",
            settings.storage_dir.display(),
            settings.storage_key
        ));
    } else {
        output::info("Draft:    not persisted");
    }
    output::info(&format!("Plan:     {} entries", session.plan().len()));
    for entry in session.plan() {
        output::entry(&entry.id, &entry.name);
    }
    Ok(())
}

#[instrument]
fn _config(command: &ConfigCommands, project_dir: Option<&Path>) -> CliResult<()> {
    let project_dir = resolve_project_dir(project_dir)?;
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(&project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(&project_dir)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::info(&format!("global: {}", p.display())),
                None => output::info("global: (unavailable)"),
            }
            output::info(&format!(
                "local:  {}",
                local_config_path(&project_dir).display()
            ));
        }
    }
    Ok(())
}
