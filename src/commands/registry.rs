//! Registry commands - resolve content types and list definitions

use crate::{
    RelicError, output,
    registry::{Category, Registry},
};
use colored::Colorize;

type Result<T> = std::result::Result<T, RelicError>;

/// Execute the resolve command
///
/// With `as_path`, `input` is a file name and the resolved MIME type is
/// printed; otherwise `input` is a content type and the syntax id is printed.
pub fn resolve(registry: &Registry, input: &str, as_path: bool, quiet: bool) {
    let (content_type, def) = if as_path {
        let content_type = registry.resolve_content_type_for_path(input);
        (content_type, registry.resolve(Some(content_type)))
    } else {
        (input, registry.resolve(Some(input)))
    };

    if quiet {
        println!("{}", if as_path { content_type } else { def.syntax });
    } else {
        println!(
            "{input} -> {} ({}, {}, {})",
            def.syntax.bold(),
            def.label,
            content_type,
            def.category.to_string().yellow()
        );
    }
}

/// Execute the types command
///
/// # Errors
/// Returns `InvalidInput` if `category` names no category.
pub fn types(registry: &Registry, category: Option<&str>, quiet: bool) -> Result<()> {
    let definitions: Vec<_> = match category {
        Some(name) => {
            let category = Category::from_name(name);
            if category == Category::Unknown && !name.trim().eq_ignore_ascii_case("unknown") {
                return Err(RelicError::InvalidInput(format!("Unknown category '{name}'")));
            }
            registry.by_category(category).collect()
        }
        None => registry.definitions().iter().collect(),
    };

    if !quiet {
        println!("{} file types:", definitions.len());
    }
    for def in definitions {
        println!("{}", output::definition_row(def, quiet));
    }
    Ok(())
}
