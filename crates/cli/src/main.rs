use anyhow::{anyhow, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use notecraft_core::config::{library_path_from_env_value, template_dir_from_env_value};
use notecraft_core::{
    add_section, convert_library_template, delete_section, derive_workflow_steps,
    duplicate_section, edit_section, find_catalog_entry, infer_fields, move_down, move_up,
    read_library_file, reorder, CoreConfig, FieldMapping, FileTemplateStore, NewSection,
    SectionId, SectionPatch, Template, TemplateId, TemplateRegistry, TemplateStore,
    SECTION_CATALOG,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "notecraft")]
#[command(about = "Clinical note template authoring CLI")]
struct Cli {
    /// Directory holding authored template files (overrides NOTECRAFT_TEMPLATE_DIR)
    #[arg(long, global = true)]
    template_dir: Option<String>,
    /// Library file to import templates from (overrides NOTECRAFT_LIBRARY)
    #[arg(long, global = true)]
    library: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the predefined sections available to add-section
    Catalog,
    /// List template names known from the template directory and library
    Types,
    /// Show a template's sections in order
    Show {
        /// Template name or id
        template: String,
    },
    /// Print the record fields inferred for a template
    Fields {
        /// Template name or id
        template: String,
    },
    /// Print the workflow steps derived from a template
    Steps {
        /// Template name or id
        template: String,
    },
    /// Print the full field mapping for a template as JSON
    Mapping {
        /// Template name
        template: String,
    },
    /// Create an empty template
    NewTemplate {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        specialty: String,
        /// Associated visit type (repeatable)
        #[arg(long = "visit-type")]
        visit_types: Vec<String>,
    },
    /// Save every library template into the template directory
    ImportLibrary,
    /// Append a section from the catalog
    AddSection {
        /// Template name or id
        template: String,
        /// Catalog entry name
        catalog_name: String,
    },
    /// Append a free-text section
    AddCustomSection {
        /// Template name or id
        template: String,
        name: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Rename a section
    RenameSection {
        /// Template name or id
        template: String,
        /// Section name or id
        section: String,
        new_name: String,
    },
    /// Update a section's attributes
    EditSection {
        /// Template name or id
        template: String,
        /// Section name or id
        section: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Replacement item, in order (repeatable; replaces every existing item)
        #[arg(long = "item")]
        items: Vec<String>,
        /// Remove every item from a list section
        #[arg(long, conflicts_with = "items")]
        clear_items: bool,
    },
    /// Delete a section
    DeleteSection {
        /// Template name or id
        template: String,
        /// Section name or id
        section: String,
    },
    /// Duplicate a section directly after the original
    DuplicateSection {
        /// Template name or id
        template: String,
        /// Section name or id
        section: String,
    },
    /// Move a section one place up
    MoveUp {
        /// Template name or id
        template: String,
        /// Section name or id
        section: String,
    },
    /// Move a section one place down
    MoveDown {
        /// Template name or id
        template: String,
        /// Section name or id
        section: String,
    },
    /// Move the section at one position to another (0-based)
    Reorder {
        /// Template name or id
        template: String,
        from: usize,
        to: usize,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notecraft=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CoreConfig::new(
        template_dir_from_env_value(
            cli.template_dir
                .or_else(|| std::env::var("NOTECRAFT_TEMPLATE_DIR").ok()),
        ),
        library_path_from_env_value(cli.library.or_else(|| std::env::var("NOTECRAFT_LIBRARY").ok())),
    )?;
    tracing::debug!(
        template_dir = %config.template_dir().display(),
        library = ?config.library_path(),
        "resolved configuration"
    );
    let mut store = FileTemplateStore::new(config.template_dir());

    let Some(command) = cli.command else {
        println!("Use 'notecraft --help' for commands");
        return Ok(());
    };

    match command {
        Commands::Catalog => {
            for entry in SECTION_CATALOG {
                println!(
                    "{} [{}] - {}",
                    entry.name, entry.section_type, entry.description
                );
            }
        }
        Commands::Types => {
            let registry = load_registry(&config, &store)?;
            let types = registry.list_types();
            if types.is_empty() {
                println!("No templates found.");
            }
            for name in types {
                println!("{name}");
            }
        }
        Commands::Show { template } => {
            let template = find_template(&load_registry(&config, &store)?, &template)?;
            print_template(&template);
        }
        Commands::Fields { template } => {
            let template = find_template(&load_registry(&config, &store)?, &template)?;
            for field in infer_fields(&template) {
                println!("{field}");
            }
        }
        Commands::Steps { template } => {
            let template = find_template(&load_registry(&config, &store)?, &template)?;
            for (index, step) in derive_workflow_steps(&template).iter().enumerate() {
                let editable = if step.is_editable { "" } else { " (fixed)" };
                println!("{:>3}. {}{} [{}]", index + 1, step.name, editable, step.id);
            }
        }
        Commands::Mapping { template } => {
            let registry = load_registry(&config, &store)?;
            let mapping: FieldMapping = registry
                .ehr_field_mappings(&template)
                .ok_or_else(|| anyhow!("no active template named '{template}'"))?;
            println!("{}", mapping.to_json_pretty()?);
        }
        Commands::NewTemplate {
            name,
            description,
            specialty,
            visit_types,
        } => {
            let template = visit_types.iter().fold(
                Template::new(&name)?
                    .with_description(description)
                    .with_specialty(specialty),
                |template, visit_type| template.with_visit_type(visit_type),
            );
            store.on_save(&template)?;
            println!("Created template '{}' with id {}", template.name, template.id);
        }
        Commands::ImportLibrary => {
            let path = config
                .library_path()
                .ok_or_else(|| anyhow!("no library configured (set NOTECRAFT_LIBRARY or --library)"))?;
            let imported_at = Utc::now();
            let mut count = 0usize;
            for item in read_library_file(path)? {
                store.on_save(&convert_library_template(&item, imported_at))?;
                count += 1;
            }
            println!("Imported {count} library templates");
        }
        Commands::AddSection {
            template,
            catalog_name,
        } => {
            let entry = find_catalog_entry(&catalog_name)
                .ok_or_else(|| anyhow!("no catalog section named '{catalog_name}'"))?;
            mutate(&mut store, &template, |t| {
                Ok(add_section(t, NewSection::FromCatalog(entry))?)
            })?;
        }
        Commands::AddCustomSection {
            template,
            name,
            content,
        } => {
            mutate(&mut store, &template, |t| {
                Ok(add_section(t, NewSection::Custom { name, content })?)
            })?;
        }
        Commands::RenameSection {
            template,
            section,
            new_name,
        } => {
            mutate(&mut store, &template, |t| {
                let id = resolve_section(t, &section)?;
                Ok(edit_section(t, &id, SectionPatch::rename(new_name))?)
            })?;
        }
        Commands::EditSection {
            template,
            section,
            name,
            description,
            content,
            items,
            clear_items,
        } => {
            let patch = SectionPatch {
                name,
                description,
                content,
                items: replacement_items(items, clear_items),
            };
            mutate(&mut store, &template, |t| {
                let id = resolve_section(t, &section)?;
                Ok(edit_section(t, &id, patch)?)
            })?;
        }
        Commands::DeleteSection { template, section } => {
            mutate(&mut store, &template, |t| {
                let id = resolve_section(t, &section)?;
                Ok(delete_section(t, &id))
            })?;
        }
        Commands::DuplicateSection { template, section } => {
            mutate(&mut store, &template, |t| {
                let id = resolve_section(t, &section)?;
                Ok(duplicate_section(t, &id)?)
            })?;
        }
        Commands::MoveUp { template, section } => {
            mutate(&mut store, &template, |t| {
                let id = resolve_section(t, &section)?;
                Ok(move_up(t, &id)?)
            })?;
        }
        Commands::MoveDown { template, section } => {
            mutate(&mut store, &template, |t| {
                let id = resolve_section(t, &section)?;
                Ok(move_down(t, &id)?)
            })?;
        }
        Commands::Reorder { template, from, to } => {
            mutate(&mut store, &template, |t| Ok(reorder(t, from, to)?))?;
        }
    }

    Ok(())
}

/// Builds the registry from the template directory and the configured library, if any.
fn load_registry(config: &CoreConfig, store: &FileTemplateStore) -> anyhow::Result<TemplateRegistry> {
    let library = match config.library_path() {
        Some(path) => read_library_file(path)?,
        None => Vec::new(),
    };
    Ok(TemplateRegistry::from_sources(store, library)?)
}

/// Looks a template up by id, then by name.
fn find_template(registry: &TemplateRegistry, key: &str) -> anyhow::Result<Template> {
    if let Ok(id) = TemplateId::parse(key) {
        if let Some(template) = registry.get(&id) {
            return Ok(template.clone());
        }
    }
    Ok(registry.get_by_name(key)?.clone())
}

/// Loads a stored template by id or name, applies `operation`, and saves the result.
fn mutate<F>(store: &mut FileTemplateStore, key: &str, operation: F) -> anyhow::Result<()>
where
    F: FnOnce(&Template) -> anyhow::Result<Template>,
{
    let template = match TemplateId::parse(key) {
        Ok(id) => store.load(&id)?,
        Err(_) => store
            .load_all()?
            .into_iter()
            .find(|t| t.name.as_str() == key)
            .ok_or_else(|| anyhow!("no stored template named '{key}'"))?,
    };

    let next = operation(&template)?;
    if next == template {
        println!("No change.");
        return Ok(());
    }
    store
        .on_save(&next)
        .with_context(|| format!("saving template '{}'", next.name))?;
    print_template(&next);
    Ok(())
}

/// Items to patch in: an empty list when clearing, `None` when no item was given.
fn replacement_items(items: Vec<String>, clear: bool) -> Option<Vec<String>> {
    if clear {
        return Some(Vec::new());
    }
    (!items.is_empty()).then_some(items)
}

/// Resolves a section by id, then by exact name (first match in template order).
fn resolve_section(template: &Template, key: &str) -> anyhow::Result<SectionId> {
    if let Ok(id) = SectionId::parse(key) {
        return Ok(id);
    }
    template
        .sections
        .iter()
        .find(|s| s.name.as_str() == key)
        .map(|s| s.id)
        .ok_or_else(|| anyhow!("no section named '{key}' in '{}'", template.name))
}

fn print_template(template: &Template) {
    println!("{} [{}]", template.name, template.id);
    if !template.specialty.is_empty() {
        println!("  specialty: {}", template.specialty);
    }
    if !template.visit_types.is_empty() {
        let visit_types: Vec<&str> = template.visit_types.iter().map(String::as_str).collect();
        println!("  visit types: {}", visit_types.join(", "));
    }
    if template.sections.is_empty() {
        println!("  (no sections)");
    }
    for (index, section) in template.sections.iter().enumerate() {
        println!(
            "  {}. {} <{}> [{}]",
            index,
            section.name,
            section.section_type(),
            section.id
        );
        for entry in section.entries() {
            println!("       - {}", entry.label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stored(store: &mut FileTemplateStore, name: &str, sections: &[&str]) -> Template {
        let template = sections.iter().fold(Template::new(name).unwrap(), |t, s| {
            add_section(&t, NewSection::FromCatalog(find_catalog_entry(s).unwrap())).unwrap()
        });
        store.on_save(&template).unwrap();
        template
    }

    #[test]
    fn resolve_section_by_name_or_id() {
        let template = add_section(
            &Template::new("T").unwrap(),
            NewSection::FromCatalog(find_catalog_entry("Plan").unwrap()),
        )
        .unwrap();
        let id = template.sections.ids()[0];

        assert_eq!(resolve_section(&template, "Plan").unwrap(), id);
        assert_eq!(resolve_section(&template, &id.to_string()).unwrap(), id);
        assert!(resolve_section(&template, "Assessment").is_err());
    }

    #[test]
    fn mutate_saves_changed_template() {
        let temp = TempDir::new().unwrap();
        let mut store = FileTemplateStore::new(temp.path());
        let template = stored(&mut store, "Visit", &["Plan", "Assessment"]);

        mutate(&mut store, "Visit", |t| {
            let id = resolve_section(t, "Assessment")?;
            Ok(move_up(t, &id)?)
        })
        .unwrap();

        let reloaded = store.load(&template.id).unwrap();
        let names: Vec<&str> = reloaded.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Assessment", "Plan"]);
    }

    #[test]
    fn item_flags_keep_commas_and_can_clear() {
        let cli = Cli::try_parse_from([
            "notecraft",
            "edit-section",
            "Visit",
            "Plan",
            "--item",
            "Rest, fluids",
            "--item",
            "Review in 2 weeks",
        ])
        .unwrap();
        let Some(Commands::EditSection {
            items, clear_items, ..
        }) = cli.command
        else {
            panic!("expected edit-section");
        };
        assert_eq!(
            replacement_items(items, clear_items),
            Some(vec!["Rest, fluids".to_string(), "Review in 2 weeks".to_string()])
        );

        assert_eq!(replacement_items(Vec::new(), true), Some(Vec::new()));
        assert_eq!(replacement_items(Vec::new(), false), None);
        assert!(Cli::try_parse_from([
            "notecraft",
            "edit-section",
            "Visit",
            "Plan",
            "--item",
            "Rest",
            "--clear-items",
        ])
        .is_err());
    }

    #[test]
    fn clearing_items_empties_a_list_section() {
        let temp = TempDir::new().unwrap();
        let mut store = FileTemplateStore::new(temp.path());
        let template = stored(&mut store, "Visit", &["Physical Exam"]);
        assert!(!template.sections.at(0).unwrap().body.items().unwrap().is_empty());

        let patch = SectionPatch {
            items: replacement_items(Vec::new(), true),
            ..SectionPatch::default()
        };
        mutate(&mut store, "Visit", |t| {
            let id = resolve_section(t, "Physical Exam")?;
            Ok(edit_section(t, &id, patch)?)
        })
        .unwrap();

        let reloaded = store.load(&template.id).unwrap();
        assert!(reloaded.sections.at(0).unwrap().body.items().unwrap().is_empty());
    }

    #[test]
    fn mutate_unknown_template_fails() {
        let temp = TempDir::new().unwrap();
        let mut store = FileTemplateStore::new(temp.path());
        assert!(mutate(&mut store, "Missing", |t| Ok(t.clone())).is_err());
    }

    #[test]
    fn find_template_by_id_and_name() {
        let temp = TempDir::new().unwrap();
        let mut store = FileTemplateStore::new(temp.path());
        let template = stored(&mut store, "Visit", &["Chief Complaint"]);
        let registry = TemplateRegistry::from_sources(&store, Vec::new()).unwrap();

        assert_eq!(find_template(&registry, "Visit").unwrap().id, template.id);
        assert_eq!(
            find_template(&registry, &template.id.to_string()).unwrap().id,
            template.id
        );
        assert!(find_template(&registry, "Other").is_err());
    }
}
